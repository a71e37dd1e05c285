//! CSS color values
//!
//! [§ 4.3.6 Colors](https://www.w3.org/TR/CSS2/syndata.html#color-units)

use serde::{Deserialize, Serialize};

/// sRGB color represented as RGBA components.
///
/// Serializes as `"#rrggbbaa"`. Deserializes from `"#rgb"`, `"#rrggbb"`, `"#rrggbbaa"`, a basic named
/// color, or `"transparent"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Fully transparent black, the initial `background-color`.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns true when painting this color has no visible effect.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let short = |i: usize| channel(&hex[i..=i].repeat(2));
        match hex.len() {
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: channel(&hex[6..8])?,
            }),
            _ => None,
        }
    }

    /// [§ 4.3.6 Colors](https://www.w3.org/TR/CSS2/syndata.html#color-units)
    ///
    /// The sixteen HTML 4 keywords plus `orange` and `transparent`.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "silver" => Self::rgb(192, 192, 192),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "maroon" => Self::rgb(128, 0, 0),
            "red" => Self::rgb(255, 0, 0),
            "purple" => Self::rgb(128, 0, 128),
            "fuchsia" => Self::rgb(255, 0, 255),
            "green" => Self::rgb(0, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "olive" => Self::rgb(128, 128, 0),
            "yellow" => Self::rgb(255, 255, 0),
            "navy" => Self::rgb(0, 0, 128),
            "blue" => Self::rgb(0, 0, 255),
            "teal" => Self::rgb(0, 128, 128),
            "aqua" => Self::rgb(0, 255, 255),
            "orange" => Self::rgb(255, 165, 0),
            _ => return None,
        };
        Some(color)
    }
}

impl TryFrom<String> for ColorValue {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let parsed = if trimmed.starts_with('#') {
            Self::from_hex(trimmed)
        } else {
            Self::from_named(trimmed)
        };
        parsed.ok_or_else(|| format!("unrecognized color '{value}'"))
    }
}

impl From<ColorValue> for String {
    fn from(color: ColorValue) -> Self {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color.r, color.g, color.b, color.a
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(ColorValue::from_hex("#f00"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(
            ColorValue::from_hex("#00ff0080"),
            Some(ColorValue {
                r: 0,
                g: 255,
                b: 0,
                a: 128
            })
        );
        assert_eq!(ColorValue::from_hex("#12"), None);
    }

    #[test]
    fn test_named_and_transparent() {
        assert_eq!(ColorValue::from_named("Navy"), Some(ColorValue::rgb(0, 0, 128)));
        assert!(ColorValue::from_named("transparent").is_some_and(ColorValue::is_transparent));
        assert_eq!(ColorValue::try_from("chartreuse".to_string()).ok(), None);
    }
}
