use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Edge lines between tree nodes
    pub edge: Color,
    /// Empty board slot placeholder
    pub empty_slot: Color,
    /// Placed piece color
    pub placed: Color,
    /// Tray piece color
    pub piece: Color,
    /// Cursor cell background
    pub cursor_bg: Color,
    /// Picked-up piece highlight
    pub selected: Color,
    /// Error message color
    pub error: Color,
    /// Win banner color
    pub success: Color,
    /// Status text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            edge: Color::Rgb { r: 90, g: 95, b: 115 },
            empty_slot: Color::Rgb { r: 110, g: 115, b: 135 },
            placed: Color::Rgb { r: 80, g: 180, b: 255 },
            piece: Color::Rgb { r: 255, g: 255, b: 255 },
            cursor_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            selected: Color::Rgb { r: 255, g: 180, b: 70 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            edge: Color::Rgb { r: 150, g: 150, b: 170 },
            empty_slot: Color::Rgb { r: 140, g: 140, b: 160 },
            placed: Color::Rgb { r: 30, g: 100, b: 200 },
            piece: Color::Rgb { r: 0, g: 0, b: 0 },
            cursor_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            selected: Color::Rgb { r: 200, g: 120, b: 20 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }
}
