use catppuccin::PALETTE;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Application theme.
///
/// Holds the palette colors the UI draws with. Semantic accessors such as
/// [`Theme::header`] map UI roles onto palette entries, so widgets never pick
/// raw palette colors for structural elements.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,

    pub surface0: Color,
    pub surface1: Color,
    pub surface2: Color,

    pub overlay1: Color,

    pub text: Color,
    pub subtext0: Color,

    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub sky: Color,
    pub blue: Color,
    pub lavender: Color,

    pub border_type: BorderType,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            surface0: catppuccin_to_color(&c.surface0),
            surface1: catppuccin_to_color(&c.surface1),
            surface2: catppuccin_to_color(&c.surface2),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            mauve: catppuccin_to_color(&c.mauve),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            yellow: catppuccin_to_color(&c.yellow),
            green: catppuccin_to_color(&c.green),
            sky: catppuccin_to_color(&c.sky),
            blue: catppuccin_to_color(&c.blue),
            lavender: catppuccin_to_color(&c.lavender),
            border_type: BorderType::Rounded,
        }
    }

    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    /// Accent color by name, as used by the table's `pagination.color`.
    ///
    /// Unknown names fall back to the primary accent.
    #[must_use]
    pub fn accent(&self, name: &str) -> Color {
        match name.to_ascii_lowercase().as_str() {
            "info" => self.sky,
            "success" => self.green,
            "warning" => self.yellow,
            "error" => self.red,
            "secondary" => self.mauve,
            "dark" => self.overlay1,
            "light" => self.text,
            _ => self.primary(),
        }
    }

    #[must_use]
    pub const fn primary(&self) -> Color {
        self.blue
    }

    #[must_use]
    pub const fn error(&self) -> Color {
        self.red
    }

    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn border_focused(&self) -> Color {
        self.lavender
    }

    #[must_use]
    pub const fn selection_bg(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn header(&self) -> Color {
        self.yellow
    }

    #[must_use]
    pub const fn muted(&self) -> Color {
        self.overlay1
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Built-in theme names.
pub const THEMES: [&str; 4] = [
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappé",
    "Catppuccin Latte",
];

/// Look up a theme by name. Returns the default theme if not found.
pub fn theme_from_name(name: &str) -> Theme {
    match name {
        "Catppuccin Macchiato" => Theme::catppuccin_macchiato(),
        "Catppuccin Frappé" => Theme::catppuccin_frappe(),
        "Catppuccin Latte" => Theme::catppuccin_latte(),
        "Catppuccin Mocha" => Theme::catppuccin_mocha(),
        other => {
            tracing::warn!(theme = other, "unknown theme, using default");
            Theme::default()
        }
    }
}
