use ratatui::style::Color;

use taskdeck_core::model::Priority;
use taskdeck_core::ThemePreference;

/// Resolved colors for the active theme. Both palettes share the indigo
/// accent; only the surfaces and text contrast flip.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub(crate) text: Color,
    pub(crate) muted: Color,
    pub(crate) border: Color,
    pub(crate) accent: Color,
    pub(crate) highlight_bg: Color,
    pub(crate) success: Color,
    pub(crate) warning: Color,
    pub(crate) danger: Color,
    pub(crate) info: Color,
}

impl Palette {
    pub(crate) fn for_preference(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Dark => Self {
                text: Color::Rgb(226, 232, 240),
                muted: Color::Rgb(120, 130, 150),
                border: Color::Rgb(71, 85, 105),
                accent: Color::Rgb(129, 140, 248),
                highlight_bg: Color::Rgb(49, 46, 129),
                success: Color::Rgb(74, 222, 128),
                warning: Color::Rgb(250, 204, 21),
                danger: Color::Rgb(248, 113, 113),
                info: Color::Rgb(96, 165, 250),
            },
            ThemePreference::Light => Self {
                text: Color::Rgb(30, 41, 59),
                muted: Color::Rgb(100, 116, 139),
                border: Color::Rgb(148, 163, 184),
                accent: Color::Rgb(79, 70, 229),
                highlight_bg: Color::Rgb(224, 231, 255),
                success: Color::Rgb(22, 163, 74),
                warning: Color::Rgb(202, 138, 4),
                danger: Color::Rgb(220, 38, 38),
                info: Color::Rgb(37, 99, 235),
            },
        }
    }

    pub(crate) fn priority(&self, priority: Priority) -> Color {
        match priority {
            Priority::P1 => self.danger,
            Priority::P2 => self.warning,
            Priority::P3 => self.info,
        }
    }
}
