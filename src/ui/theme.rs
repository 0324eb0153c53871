use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub secondary: ColorSpec,
    pub accent: ColorSpec,
    pub banner: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_secondary: ColorSpec,
    pub text_muted: ColorSpec,

    // Background colors
    pub background: ColorSpec,
    pub surface: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,
    pub info: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,

    // Footer mode colors
    pub footer_home: ColorSpec,
    pub footer_step: ColorSpec,
    pub footer_dialog: ColorSpec,
    pub footer_request: ColorSpec,
    pub footer_submit: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Theme {
    /// Tokyo Night theme.
    ///
    pub fn tokyo_night() -> Self {
        let blue = ColorSpec::rgb(125, 207, 255);
        let green = ColorSpec::rgb(158, 206, 106);
        let magenta = ColorSpec::rgb(255, 159, 196);
        let yellow = ColorSpec::rgb(255, 202, 40);
        let red = ColorSpec::rgb(247, 118, 142);
        let comment = ColorSpec::rgb(117, 121, 148);
        let background = ColorSpec::rgb(26, 27, 38);
        Theme {
            name: "tokyo-night".to_string(),
            primary: blue.clone(),
            secondary: green.clone(),
            accent: magenta.clone(),
            banner: magenta,
            text: ColorSpec::rgb(169, 177, 214),
            text_secondary: ColorSpec::rgb(192, 202, 245),
            text_muted: comment.clone(),
            background: background.clone(),
            surface: ColorSpec::rgb(36, 40, 59),
            success: green.clone(),
            warning: yellow.clone(),
            error: red.clone(),
            info: blue.clone(),
            border_active: blue.clone(),
            border_normal: comment,
            highlight_bg: blue.clone(),
            highlight_fg: background,
            footer_home: blue.clone(),
            footer_step: green,
            footer_dialog: red,
            footer_request: yellow,
            footer_submit: blue,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}
