use ratatui::style::Color;

#[derive(Clone, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub warning: Color,
    pub user_color: Color,
    pub assistant_color: Color,
    pub notice_color: Color,
    pub border: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            fg: Color::Rgb(220, 220, 220),
            accent: Color::Rgb(122, 162, 247),
            muted: Color::Rgb(110, 110, 110),
            error: Color::Rgb(247, 118, 142),
            warning: Color::Rgb(224, 175, 104),
            user_color: Color::Cyan,
            assistant_color: Color::Green,
            notice_color: Color::Yellow,
            border: Color::Rgb(60, 60, 60),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            fg: Color::Rgb(40, 40, 40),
            accent: Color::Rgb(38, 99, 199),
            muted: Color::Rgb(140, 140, 140),
            error: Color::Rgb(200, 40, 60),
            warning: Color::Rgb(170, 110, 0),
            user_color: Color::Rgb(0, 110, 150),
            assistant_color: Color::Rgb(30, 120, 40),
            notice_color: Color::Rgb(150, 100, 0),
            border: Color::Rgb(190, 190, 190),
        }
    }

    /// Monochrome amber, for old-school terminals.
    pub fn amber() -> Self {
        Self {
            name: "amber",
            fg: Color::Rgb(255, 176, 0),
            accent: Color::Rgb(255, 204, 102),
            muted: Color::Rgb(153, 105, 0),
            error: Color::Rgb(255, 120, 60),
            warning: Color::Rgb(255, 204, 102),
            user_color: Color::Rgb(255, 204, 102),
            assistant_color: Color::Rgb(255, 176, 0),
            notice_color: Color::Rgb(204, 140, 0),
            border: Color::Rgb(102, 70, 0),
        }
    }

    /// Look up a theme; unknown names fall back to `dark`.
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "amber" => Self::amber(),
            _ => Self::dark(),
        }
    }

    pub fn exists(name: &str) -> bool {
        Self::all_names().contains(&name)
    }

    pub fn all_names() -> &'static [&'static str] {
        &["dark", "light", "amber"]
    }
}
