/// Icons shipped in `assets/icons`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IconName {
    Plus,
    Trash,
    Sparkle,
    ChevronDown,
    Check,
}

impl IconName {
    pub const ALL: [IconName; 5] = [
        IconName::Plus,
        IconName::Trash,
        IconName::Sparkle,
        IconName::ChevronDown,
        IconName::Check,
    ];

    pub fn path(self) -> &'static str {
        match self {
            IconName::Plus => "icons/plus.svg",
            IconName::Trash => "icons/trash.svg",
            IconName::Sparkle => "icons/sparkle.svg",
            IconName::ChevronDown => "icons/chevron-down.svg",
            IconName::Check => "icons/check.svg",
        }
    }
}
