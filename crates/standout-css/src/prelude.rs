//! Commonly used items in one import.
//!
//! ```rust
//! use standout_css::prelude::*;
//!
//! let sheet = StyleSheet::with_config(SheetConfig::default().with_debug(false));
//! let class = sheet
//!     .style([StyleDescription::new().set("color", rgb(255, 0, 0))])
//!     .unwrap();
//! assert_eq!(sheet.get_styles(), format!(".{}{{color:rgb(255,0,0)}}", class));
//! ```

// Descriptions and helpers
pub use crate::{classes, extend, media, KeyframesDescription, MediaQuery, StyleDescription};

// Values
pub use crate::{hsl, hsla, rgb, rgba, Color, PropertyValue};

// Sheets
pub use crate::{SheetConfig, StyleError, StyleSheet, StylesTarget, TextTarget, TickScheduler};
