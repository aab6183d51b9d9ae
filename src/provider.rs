use std::sync::Arc;

use crate::motion::MotionConfig;
use crate::theme::Theme;

/// App-wide theme and motion settings, installed once as a GPUI global.
#[derive(Clone, Default)]
pub struct GalleryProvider {
    theme: Option<Theme>,
    motion: Option<MotionConfig>,
}

#[derive(Clone)]
struct ProviderGlobal {
    theme: Arc<Theme>,
    motion: MotionConfig,
}

impl gpui::Global for ProviderGlobal {}

impl GalleryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_theme(mut self, configure: impl FnOnce(Theme) -> Theme) -> Self {
        let current = self.theme.take().unwrap_or_default();
        self.theme = Some(configure(current));
        self
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn install(self, cx: &mut gpui::App) {
        if cx.has_global::<ProviderGlobal>() {
            let global = cx.global_mut::<ProviderGlobal>();
            if let Some(theme) = self.theme {
                global.theme = Arc::new(theme);
            }
            if let Some(motion) = self.motion {
                global.motion = motion;
            }
            return;
        }

        cx.set_global(ProviderGlobal {
            theme: Arc::new(self.theme.unwrap_or_default()),
            motion: self.motion.unwrap_or_default(),
        });
    }

    pub fn theme(cx: &gpui::App) -> Arc<Theme> {
        cx.try_global::<ProviderGlobal>()
            .map(|global| global.theme.clone())
            .unwrap_or_else(|| Arc::new(Theme::default()))
    }

    pub fn motion(cx: &gpui::App) -> MotionConfig {
        cx.try_global::<ProviderGlobal>()
            .map(|global| global.motion)
            .unwrap_or_default()
    }
}
