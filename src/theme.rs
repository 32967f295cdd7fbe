use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Guess the terminal background from COLORFGBG (set by many terminal
    /// emulators). Returns None when the variable is absent or unparseable.
    pub fn detect() -> Option<Self> {
        std::env::var("COLORFGBG").ok().and_then(|v| Self::from_colorfgbg(&v))
    }

    fn from_colorfgbg(value: &str) -> Option<Self> {
        // Format is "<fg>;<bg>" or "<fg>;<default>;<bg>"; the last field is
        // the background color number. 7 and 15 are the light backgrounds.
        let bg = value.rsplit(';').next()?;
        match bg.trim().parse::<u8>().ok()? {
            7 | 15 => Some(Theme::Light),
            _ => Some(Theme::Dark),
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette {
                border: Color::DarkGray,
                border_focused: Color::Cyan,
                dim: Color::DarkGray,
                user: Color::Cyan,
                bot: Color::Yellow,
                success: Color::Green,
                error: Color::Red,
                loading: Color::Yellow,
                bar_bg: Color::DarkGray,
                bar_fg: Color::White,
            },
            Theme::Light => Palette {
                border: Color::Gray,
                border_focused: Color::Blue,
                dim: Color::Gray,
                user: Color::Blue,
                bot: Color::Magenta,
                success: Color::Green,
                error: Color::Red,
                loading: Color::Blue,
                bar_bg: Color::Blue,
                bar_fg: Color::White,
            },
        }
    }
}

/// Render colors derived from the active theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub border: Color,
    pub border_focused: Color,
    pub dim: Color,
    pub user: Color,
    pub bot: Color,
    pub success: Color,
    pub error: Color,
    pub loading: Color,
    pub bar_bg: Color,
    pub bar_fg: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_both_cases() {
        assert_eq!(Theme::from_str("light"), Some(Theme::Light));
        assert_eq!(Theme::from_str("Dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_str("DARK"), Some(Theme::Dark));
        assert_eq!(Theme::from_str("solarized"), None);
        assert_eq!(Theme::from_str(""), None);
    }

    #[test]
    fn test_as_str_round_trips() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::from_str(theme.as_str()), Some(theme));
        }
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle().toggle(), Theme::Light);
        assert_eq!(Theme::Dark.toggle().toggle(), Theme::Dark);
    }

    #[test]
    fn test_from_colorfgbg() {
        assert_eq!(Theme::from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("0;default;7"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("12;8"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("garbage"), None);
        assert_eq!(Theme::from_colorfgbg(""), None);
    }
}
