use std::borrow::Cow;

use gpui::{AssetSource, SharedString};
use rust_embed::RustEmbed;

/// Icons compiled into the binary and served to GPUI by relative path (`icons/plus.svg`).
#[derive(RustEmbed)]
#[folder = "assets"]
#[include = "icons/*.svg"]
pub struct Assets;

impl AssetSource for Assets {
    fn load(&self, path: &str) -> gpui::Result<Option<Cow<'static, [u8]>>> {
        Ok(Self::get(path).map(|file| file.data))
    }

    fn list(&self, path: &str) -> gpui::Result<Vec<SharedString>> {
        Ok(Self::iter()
            .filter(|entry| entry.starts_with(path))
            .map(SharedString::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::IconName;

    #[test]
    fn every_icon_name_resolves_to_an_embedded_file() {
        for name in IconName::ALL {
            let data = Assets
                .load(name.path())
                .expect("load must not fail")
                .unwrap_or_else(|| panic!("missing embedded icon {}", name.path()));
            assert!(data.starts_with(b"<svg"));
        }
    }

    #[test]
    fn listing_is_filtered_by_prefix() {
        let icons = Assets.list("icons/").expect("list must not fail");
        assert!(icons.len() >= IconName::ALL.len());
        assert!(Assets.list("fonts/").expect("list").is_empty());
    }
}
