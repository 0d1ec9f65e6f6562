use crossterm::tty::IsTty;
use ratatui::style::Color;
use std::env;
use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorLevel {
    None,
    Ansi16,
    Ansi256,
    TrueColor,
}

#[derive(Clone, Copy, Debug)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub color_level: ColorLevel,
}

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub primary: Color, // Main accent
    pub on_primary: Color,
    pub secondary: Color, // Secondary accent
    pub on_secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub dim: Color,
    pub border: Color,
    pub highlight: Color,
    pub surface: Color,
    pub color_level: ColorLevel,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ThemeMode::Dark, ColorLevel::Ansi16)
    }
}

impl ThemeSettings {
    #[must_use]
    pub fn resolve() -> Self {
        let color_level = ColorLevel::detect();
        let mode = ThemeMode::resolve(color_level);
        Self { mode, color_level }
    }
}

impl ThemeMode {
    #[must_use]
    fn from_env_override() -> Option<Self> {
        env_theme_override("LAZARUS_THEME").or_else(|| env_theme_override("CLITHEME"))
    }

    #[must_use]
    fn resolve(color_level: ColorLevel) -> Self {
        if let Some(mode) = Self::from_env_override() {
            return mode;
        }

        if color_level == ColorLevel::None {
            return ThemeMode::Dark;
        }

        theme_from_colorfgbg().unwrap_or(ThemeMode::Dark)
    }

    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

impl ColorLevel {
    #[must_use]
    pub fn detect() -> Self {
        if env::var_os("NO_COLOR").is_some() {
            return ColorLevel::None;
        }

        if !io::stdout().is_tty() {
            return ColorLevel::None;
        }

        let colorterm = env::var("COLORTERM")
            .unwrap_or_default()
            .to_ascii_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorLevel::TrueColor;
        }

        let term = env::var("TERM").unwrap_or_default();
        if term.contains("256color") {
            return ColorLevel::Ansi256;
        }

        ColorLevel::Ansi16
    }
}

impl Theme {
    #[must_use]
    pub fn for_mode(mode: ThemeMode, color_level: ColorLevel) -> Self {
        let mut theme = match (mode, color_level) {
            (ThemeMode::Dark, ColorLevel::TrueColor) => Self::dark_truecolor(),
            (ThemeMode::Dark, ColorLevel::Ansi256) => Self::dark_ansi256(),
            (ThemeMode::Dark, ColorLevel::Ansi16) => Self::dark_ansi16(),
            (ThemeMode::Light, ColorLevel::TrueColor) => Self::light_truecolor(),
            (ThemeMode::Light, ColorLevel::Ansi256) => Self::light_ansi256(),
            (ThemeMode::Light, ColorLevel::Ansi16) => Self::light_ansi16(),
            (_, ColorLevel::None) => Self::monochrome(),
        };
        theme.color_level = color_level;
        theme
    }

    #[must_use]
    pub fn is_monochrome(&self) -> bool {
        self.color_level == ColorLevel::None
    }

    /// Every slot is `Reset`; styling falls back to modifiers only.
    fn monochrome() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::Reset,
            primary: Color::Reset,
            on_primary: Color::Reset,
            secondary: Color::Reset,
            on_secondary: Color::Reset,
            success: Color::Reset,
            warning: Color::Reset,
            error: Color::Reset,
            info: Color::Reset,
            dim: Color::Reset,
            border: Color::Reset,
            highlight: Color::Reset,
            surface: Color::Reset,
            color_level: ColorLevel::None,
        }
    }

    fn dark_truecolor() -> Self {
        Self {
            bg: Color::Rgb(18, 22, 28),
            fg: Color::Rgb(226, 232, 240),
            primary: Color::Rgb(56, 189, 248),
            on_primary: Color::Rgb(18, 22, 28),
            secondary: Color::Rgb(100, 116, 139),
            on_secondary: Color::Rgb(226, 232, 240),
            success: Color::Rgb(74, 222, 128),
            warning: Color::Rgb(250, 204, 21),
            error: Color::Rgb(248, 113, 113),
            info: Color::Rgb(165, 180, 252),
            dim: Color::Rgb(71, 85, 105),
            border: Color::Rgb(100, 116, 139),
            highlight: Color::Rgb(51, 65, 85),
            surface: Color::Rgb(30, 37, 46),
            color_level: ColorLevel::TrueColor,
        }
    }

    fn dark_ansi256() -> Self {
        Self {
            bg: Color::Indexed(234),
            fg: Color::Indexed(253),
            primary: Color::Indexed(81),
            on_primary: Color::Indexed(234),
            secondary: Color::Indexed(102),
            on_secondary: Color::Indexed(253),
            success: Color::Indexed(114),
            warning: Color::Indexed(221),
            error: Color::Indexed(210),
            info: Color::Indexed(147),
            dim: Color::Indexed(240),
            border: Color::Indexed(102),
            highlight: Color::Indexed(238),
            surface: Color::Indexed(236),
            color_level: ColorLevel::Ansi256,
        }
    }

    fn dark_ansi16() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            primary: Color::Cyan,
            on_primary: Color::Black,
            secondary: Color::Blue,
            on_secondary: Color::White,
            success: Color::LightGreen,
            warning: Color::Yellow,
            error: Color::LightRed,
            info: Color::LightBlue,
            dim: Color::DarkGray,
            border: Color::DarkGray,
            highlight: Color::DarkGray,
            surface: Color::Black,
            color_level: ColorLevel::Ansi16,
        }
    }

    fn light_truecolor() -> Self {
        Self {
            bg: Color::Rgb(250, 250, 250),
            fg: Color::Rgb(30, 41, 59),
            primary: Color::Rgb(2, 132, 199),
            on_primary: Color::Rgb(250, 250, 250),
            secondary: Color::Rgb(100, 116, 139),
            on_secondary: Color::Rgb(250, 250, 250),
            success: Color::Rgb(22, 130, 60),
            warning: Color::Rgb(180, 130, 10),
            error: Color::Rgb(185, 28, 28),
            info: Color::Rgb(67, 56, 202),
            dim: Color::Rgb(148, 163, 184),
            border: Color::Rgb(203, 213, 225),
            highlight: Color::Rgb(226, 232, 240),
            surface: Color::Rgb(241, 245, 249),
            color_level: ColorLevel::TrueColor,
        }
    }

    fn light_ansi256() -> Self {
        Self {
            bg: Color::Indexed(231),
            fg: Color::Indexed(236),
            primary: Color::Indexed(31),
            on_primary: Color::Indexed(231),
            secondary: Color::Indexed(245),
            on_secondary: Color::Indexed(231),
            success: Color::Indexed(28),
            warning: Color::Indexed(172),
            error: Color::Indexed(124),
            info: Color::Indexed(61),
            dim: Color::Indexed(249),
            border: Color::Indexed(252),
            highlight: Color::Indexed(254),
            surface: Color::Indexed(255),
            color_level: ColorLevel::Ansi256,
        }
    }

    fn light_ansi16() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            primary: Color::Blue,
            on_primary: Color::White,
            secondary: Color::Magenta,
            on_secondary: Color::White,
            success: Color::Green,
            warning: Color::LightRed,
            error: Color::Red,
            info: Color::Cyan,
            dim: Color::DarkGray,
            border: Color::Gray,
            highlight: Color::Gray,
            surface: Color::White,
            color_level: ColorLevel::Ansi16,
        }
    }
}

fn env_theme_override(var: &str) -> Option<ThemeMode> {
    let value = env::var(var).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "dark" => Some(ThemeMode::Dark),
        "light" => Some(ThemeMode::Light),
        _ => None,
    }
}

fn theme_from_colorfgbg() -> Option<ThemeMode> {
    let value = env::var("COLORFGBG").ok()?;
    let bg = value.split(';').next_back()?;
    let bg = bg.parse::<u8>().ok()?;
    Some(if bg <= 6 || bg == 8 {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ThemeMode::Dark.toggle(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggle().toggle(), ThemeMode::Light);
    }

    #[test]
    fn test_for_mode_stamps_color_level() {
        for level in [
            ColorLevel::None,
            ColorLevel::Ansi16,
            ColorLevel::Ansi256,
            ColorLevel::TrueColor,
        ] {
            assert_eq!(Theme::for_mode(ThemeMode::Dark, level).color_level, level);
            assert_eq!(Theme::for_mode(ThemeMode::Light, level).color_level, level);
        }
    }

    #[test]
    fn test_no_color_palette_is_monochrome() {
        let theme = Theme::for_mode(ThemeMode::Dark, ColorLevel::None);
        assert!(theme.is_monochrome());
        assert_eq!(theme.primary, Color::Reset);
    }
}
