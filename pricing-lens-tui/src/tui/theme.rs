use ratatui::style::Color;

pub const THEME_NAMES: [&str; 5] = ["dark", "light", "nord", "catppuccin", "colorblind"];

pub struct Theme {
    pub name: &'static str,
    pub bg: Color,
    pub fg: Color,
    pub highlight: Color,
    pub bar: Color,
    pub line: Color,
    pub optimum: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            bar: Color::Cyan,
            line: Color::Cyan,
            optimum: Color::Yellow,
            error: Color::Red,
            warning: Color::LightYellow,
            success: Color::LightGreen,
        }
    }
    pub fn light() -> Self {
        Self {
            name: "light",
            bg: Color::White,
            fg: Color::Black,
            highlight: Color::Blue,
            bar: Color::Blue,
            line: Color::DarkGray,
            optimum: Color::Magenta,
            error: Color::Red,
            warning: Color::LightYellow,
            success: Color::Green,
        }
    }
    pub fn nord() -> Self {
        Self {
            name: "nord",
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            highlight: Color::Rgb(136, 192, 208),
            bar: Color::Rgb(129, 161, 193),
            line: Color::Rgb(136, 192, 208),
            optimum: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
            warning: Color::Rgb(235, 203, 139),
            success: Color::Rgb(163, 190, 140),
        }
    }
    pub fn catppuccin() -> Self {
        Self {
            name: "catppuccin",
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(205, 214, 244),
            highlight: Color::Rgb(137, 180, 250),
            bar: Color::Rgb(137, 220, 235),
            line: Color::Rgb(180, 190, 254),
            optimum: Color::Rgb(249, 226, 175),
            error: Color::Rgb(243, 139, 168),
            warning: Color::Rgb(250, 179, 135),
            success: Color::Rgb(166, 227, 161),
        }
    }
    pub fn colorblind() -> Self {
        Self {
            name: "colorblind",
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            bar: Color::Rgb(0x00, 0x80, 0xFF),
            line: Color::Rgb(0x00, 0x80, 0xFF),
            optimum: Color::Yellow,
            error: Color::Rgb(0xFF, 0x8C, 0x00),  // orange instead of red
            warning: Color::LightYellow,
            success: Color::Rgb(0x00, 0x80, 0xFF), // blue instead of green
        }
    }
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "nord" => Self::nord(),
            "catppuccin" => Self::catppuccin(),
            "colorblind" => Self::colorblind(),
            _ => Self::dark(),
        }
    }
    pub fn next(&self) -> Self {
        let i = THEME_NAMES.iter().position(|n| *n == self.name).unwrap_or(0);
        Self::from_name(THEME_NAMES[(i + 1) % THEME_NAMES.len()])
    }
}
