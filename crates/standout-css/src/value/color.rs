//! Color values.
//!
//! Supports several ways of writing a color:
//!
//! - Keywords: the sixteen basic CSS colors, `transparent`, `currentColor`
//! - Hex: `"#ff6b35"` or `"#fff"` (3 or 6 digit)
//! - Functions: `rgb(255, 107, 53)`, `rgba(255, 107, 53, 0.5)`,
//!   `hsl(120, 50%, 50%)`, `hsla(120, 50%, 50%, 0.5)`
//!
//! Parsing is strict: anything else is a [`StyleError::InvalidColor`].
//!
//! # Example
//!
//! ```rust
//! use standout_css::{hsl, Color, CssValue};
//!
//! assert_eq!(hsl(0.0, 100.0, 50.0).to_css().unwrap(), "hsl(0,100%,50%)");
//! assert_eq!(Color::parse("#f00").unwrap().to_css().unwrap(), "rgb(255,0,0)");
//! assert!(Color::parse("reddish").is_err());
//! ```

use std::sync::Arc;

use super::{format_number, CssValue, PropertyValue};
use crate::error::StyleError;

/// Keyword colors accepted by [`Color::parse`].
const KEYWORDS: &[&str] = &[
    "aqua",
    "black",
    "blue",
    "fuchsia",
    "gray",
    "green",
    "lime",
    "maroon",
    "navy",
    "olive",
    "purple",
    "red",
    "silver",
    "teal",
    "white",
    "yellow",
    "transparent",
    "currentColor",
];

/// A CSS color.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// A keyword color, emitted verbatim.
    Keyword(&'static str),
    /// Red, green, blue and an optional alpha in `0..=1`.
    Rgb {
        red: u8,
        green: u8,
        blue: u8,
        alpha: Option<f64>,
    },
    /// Hue in degrees, saturation and lightness in percent, optional alpha.
    Hsl {
        hue: f64,
        saturation: f64,
        lightness: f64,
        alpha: Option<f64>,
    },
}

/// Creates an opaque RGB color.
pub fn rgb(red: u8, green: u8, blue: u8) -> Color {
    Color::Rgb {
        red,
        green,
        blue,
        alpha: None,
    }
}

/// Creates an RGB color with alpha. Alpha is clamped to `0..=1`.
pub fn rgba(red: u8, green: u8, blue: u8, alpha: f64) -> Color {
    Color::Rgb {
        red,
        green,
        blue,
        alpha: Some(clamp(alpha, 1.0)),
    }
}

/// Creates an opaque HSL color.
///
/// Hue wraps around 360 degrees; saturation and lightness are percentages
/// clamped to `0..=100`.
pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Color {
    Color::Hsl {
        hue: wrap_degrees(hue),
        saturation: clamp(saturation, 100.0),
        lightness: clamp(lightness, 100.0),
        alpha: None,
    }
}

/// Creates an HSL color with alpha.
pub fn hsla(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Color {
    Color::Hsl {
        hue: wrap_degrees(hue),
        saturation: clamp(saturation, 100.0),
        lightness: clamp(lightness, 100.0),
        alpha: Some(clamp(alpha, 1.0)),
    }
}

impl Color {
    /// Parses a color from a string.
    pub fn parse(s: &str) -> Result<Self, StyleError> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(s, hex);
        }

        if s.ends_with(')') {
            if let Some((name, args)) = s.split_once('(') {
                return Self::parse_function(s, name.trim(), &args[..args.len() - 1]);
            }
        }

        Self::parse_keyword(s)
    }

    fn parse_hex(input: &str, hex: &str) -> Result<Self, StyleError> {
        let digit = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid(input, "not a hex digit"))
        };

        match hex.len() {
            // #rgb -> #rrggbb
            3 if hex.is_ascii() => Ok(rgb(digit(0..1)? * 17, digit(1..2)? * 17, digit(2..3)? * 17)),
            6 if hex.is_ascii() => Ok(rgb(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
            _ => Err(invalid(input, "hex colors must have 3 or 6 digits")),
        }
    }

    fn parse_function(input: &str, name: &str, args: &str) -> Result<Self, StyleError> {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let number = |part: &str| {
            part.strip_suffix('%')
                .unwrap_or(part)
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(input, &format!("'{}' is not a number", part)))
        };
        let channel = |part: &str| -> Result<u8, StyleError> {
            let n = number(part)?;
            if !(0.0..=255.0).contains(&n) {
                return Err(invalid(input, &format!("channel {} out of range (0-255)", n)));
            }
            Ok(n.round() as u8)
        };

        match (name.to_ascii_lowercase().as_str(), parts.len()) {
            ("rgb", 3) => Ok(rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?)),
            ("rgba", 4) => Ok(rgba(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
                number(parts[3])?,
            )),
            ("hsl", 3) => Ok(hsl(number(parts[0])?, number(parts[1])?, number(parts[2])?)),
            ("hsla", 4) => Ok(hsla(
                number(parts[0])?,
                number(parts[1])?,
                number(parts[2])?,
                number(parts[3])?,
            )),
            ("rgb" | "rgba" | "hsl" | "hsla", n) => Err(invalid(
                input,
                &format!("{}() does not take {} components", name, n),
            )),
            _ => Err(invalid(input, &format!("unknown color function '{}'", name))),
        }
    }

    fn parse_keyword(name: &str) -> Result<Self, StyleError> {
        KEYWORDS
            .iter()
            .find(|keyword| keyword.eq_ignore_ascii_case(name))
            .map(|keyword| Color::Keyword(*keyword))
            .ok_or_else(|| invalid(name, "unknown color name"))
    }

    /// Returns a copy with the given alpha.
    pub fn fade(&self, alpha: f64) -> Self {
        let alpha = Some(clamp(alpha, 1.0));
        match self.clone() {
            Color::Keyword(_) => self.clone(),
            Color::Rgb {
                red, green, blue, ..
            } => Color::Rgb {
                red,
                green,
                blue,
                alpha,
            },
            Color::Hsl {
                hue,
                saturation,
                lightness,
                ..
            } => Color::Hsl {
                hue,
                saturation,
                lightness,
                alpha,
            },
        }
    }
}

impl CssValue for Color {
    fn type_tag(&self) -> &'static str {
        "color"
    }

    fn to_css(&self) -> Result<String, StyleError> {
        Ok(match self {
            Color::Keyword(name) => name.to_string(),
            Color::Rgb {
                red,
                green,
                blue,
                alpha: None,
            } => format!("rgb({},{},{})", red, green, blue),
            Color::Rgb {
                red,
                green,
                blue,
                alpha: Some(a),
            } => format!("rgba({},{},{},{})", red, green, blue, round(*a, 5)),
            Color::Hsl {
                hue,
                saturation,
                lightness,
                alpha,
            } => {
                let body = format!(
                    "{},{}%,{}%",
                    round(*hue, 2),
                    round(*saturation, 2),
                    round(*lightness, 2)
                );
                match alpha {
                    None => format!("hsl({})", body),
                    Some(a) => format!("hsla({},{})", body, round(*a, 5)),
                }
            }
        })
    }
}

impl From<Color> for PropertyValue {
    fn from(color: Color) -> Self {
        PropertyValue::Typed(Arc::new(color))
    }
}

fn invalid(value: &str, reason: &str) -> StyleError {
    StyleError::InvalidColor {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn clamp(value: f64, max: f64) -> f64 {
    value.clamp(0.0, max)
}

fn wrap_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

fn round(value: f64, places: i32) -> String {
    let factor = 10f64.powi(places);
    format_number((value * factor).round() / factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn test_parse_keywords_case_insensitive() {
        assert_eq!(Color::parse("red").unwrap(), Color::Keyword("red"));
        assert_eq!(Color::parse("RED").unwrap(), Color::Keyword("red"));
        assert_eq!(
            Color::parse("currentcolor").unwrap(),
            Color::Keyword("currentColor")
        );
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#fff").unwrap(), rgb(255, 255, 255));
        assert_eq!(Color::parse("#ff6b35").unwrap(), rgb(255, 107, 53));
        assert_eq!(Color::parse("  #FF6B35 ").unwrap(), rgb(255, 107, 53));
    }

    #[test]
    fn test_parse_hex_rejects_bad_input() {
        assert!(Color::parse("#ff").is_err());
        assert!(Color::parse("#gggggg").is_err());
        assert!(Color::parse("#ééé").is_err());
    }

    #[test]
    fn test_parse_functions() {
        assert_eq!(Color::parse("rgb(1, 2, 3)").unwrap(), rgb(1, 2, 3));
        assert_eq!(
            Color::parse("rgba(1,2,3,0.5)").unwrap(),
            rgba(1, 2, 3, 0.5)
        );
        assert_eq!(
            Color::parse("hsl(120, 50%, 25%)").unwrap(),
            hsl(120.0, 50.0, 25.0)
        );
    }

    #[test]
    fn test_parse_function_errors() {
        assert!(Color::parse("rgb(1, 2)").is_err());
        assert!(Color::parse("rgb(1, 2, 300)").is_err());
        assert!(Color::parse("cmyk(1, 2, 3, 4)").is_err());
    }

    #[test]
    fn test_parse_unknown_name_is_error() {
        let err = Color::parse("reddish").unwrap_err();
        assert!(matches!(err, StyleError::InvalidColor { .. }));
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn test_hsl_renders() {
        assert_eq!(hsl(0.0, 100.0, 50.0).to_css().unwrap(), "hsl(0,100%,50%)");
        assert_eq!(
            hsla(0.0, 100.0, 50.0, 0.1).to_css().unwrap(),
            "hsla(0,100%,50%,0.1)"
        );
    }

    #[test]
    fn test_hue_wraps_and_channels_clamp() {
        assert_eq!(hsl(370.0, 150.0, -5.0).to_css().unwrap(), "hsl(10,100%,0%)");
        assert_eq!(rgba(0, 0, 0, 2.0).to_css().unwrap(), "rgba(0,0,0,1)");
    }

    #[test]
    fn test_fade_adds_alpha() {
        assert_eq!(rgb(0, 0, 0).fade(0.25).to_css().unwrap(), "rgba(0,0,0,0.25)");
        assert_eq!(
            Color::Keyword("red").fade(0.5).to_css().unwrap(),
            "red"
        );
    }
}
