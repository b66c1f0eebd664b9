use crossterm::style::Color;

/// Design tokens for the coordinator's console output.
///
/// All colors and icons are sourced from this module.
pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const PROGRESS: &str = "●";
    pub const SKIPPED: &str = "○";
    pub const ARROW: &str = "↳";
    pub const WATCH: &str = "⟳";
    pub const DEPLOY: &str = "📦";
    pub const STATUS: &str = "📊";
    pub const LOCK: &str = "🔒";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const PROGRESS: &str = "[..]";
    pub const SKIPPED: &str = "[SKIP]";
    pub const ARROW: &str = "[>]";
    pub const WATCH: &str = "[~]";
    pub const DEPLOY: &str = "[DEPLOY]";
    pub const STATUS: &str = "[STATUS]";
    pub const LOCK: &str = "[LOCK]";
}
