//! # Standout CSS - Typed Styles Compiled to Deduplicated CSS
//!
//! `standout-css` turns typed style descriptions into CSS rules with
//! generated, content-addressed class names. Identical descriptions always
//! produce the same class name, so output rendered on a server matches what
//! a client computes for the same styles.
//!
//! ## Core Concepts
//!
//! - [`StyleDescription`]: declarations plus the `$nest`, `$unique`,
//!   `$debugName` and `$priority` directives
//! - [`StyleRegistry`]: compiled rules, deduplicated and serialized in
//!   insertion order
//! - [`StyleSheet`]: a registry with raw CSS, an output target and deferred
//!   flushing
//! - Typed values: [`Color`], [`css_function`], [`linear_gradient`]
//!
//! ## Quick Start
//!
//! ```rust
//! use standout_css::{StyleDescription, StyleSheet, SheetConfig};
//!
//! let sheet = StyleSheet::with_config(SheetConfig::default().with_debug(false));
//!
//! let button = sheet
//!     .style([StyleDescription::new()
//!         .set("color", "white")
//!         .set("backgroundColor", "blue")
//!         .nest("&:hover", StyleDescription::new().set("backgroundColor", "navy"))])
//!     .unwrap();
//!
//! assert_eq!(
//!     sheet.get_styles(),
//!     format!(
//!         ".{c}{{background-color:blue;color:white}}.{c}:hover{{background-color:navy}}",
//!         c = button
//!     )
//! );
//! ```
//!
//! ## The Default Sheet
//!
//! The free functions ([`style`](fn@style), [`css_rule`], [`keyframes`],
//! [`get_styles`], ...) operate on one process-wide [`StyleSheet`]. Its
//! deferred flushes run when [`tick`] is called.
//!
//! ## Descriptions from Data
//!
//! Descriptions can be read from JSON or YAML, with directive keys spelled
//! as in the object form:
//!
//! ```rust
//! use standout_css::StyleDescription;
//!
//! let description = StyleDescription::from_yaml(r#"
//! color: red
//! $debugName: alert
//! $nest:
//!   "&:hover":
//!     color: darkred
//! "#).unwrap();
//! assert_eq!(description.debug_name(), Some("alert"));
//! ```

mod error;
pub mod prelude;
pub mod registry;
pub mod sheet;
pub mod style;
mod util;
pub mod value;

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

// Error type
pub use error::StyleError;

// Description and composition helpers
pub use style::{
    classes, extend, media, KeyframesDescription, MediaLength, MediaQuery, MediaType,
    Orientation, StyleDescription,
};

// Values
pub use value::{
    css_function, hsl, hsla, linear_gradient, repeating_linear_gradient, rgb, rgba, Color,
    CssFunction, CssValue, PropertyValue,
};

// Registry and sheets
pub use registry::StyleRegistry;
pub use sheet::{
    detect_debug_mode, is_debug_mode, set_debug_mode_detector, DebugMode, ImmediateScheduler,
    Scheduler, SheetConfig, StyleSheet, StylesTarget, Task, TextTarget, TickScheduler,
};

static DEFAULT_SCHEDULER: Lazy<TickScheduler> = Lazy::new(TickScheduler::new);

static DEFAULT_SHEET: Lazy<StyleSheet> = Lazy::new(|| {
    StyleSheet::with_config(SheetConfig::default().with_scheduler(DEFAULT_SCHEDULER.clone()))
});

/// The process-wide sheet behind the free functions.
pub fn default_sheet() -> &'static StyleSheet {
    &DEFAULT_SHEET
}

/// Runs the default sheet's pending flushes. Returns how many callbacks ran.
pub fn tick() -> usize {
    DEFAULT_SCHEDULER.tick()
}

/// Registers merged `descriptions` on the default sheet.
///
/// ```rust
/// use standout_css::{get_styles, reinit, style, StyleDescription};
///
/// reinit();
/// let class = style([StyleDescription::new().set("color", "red")]).unwrap();
/// assert!(get_styles().contains(&class));
/// ```
pub fn style<I, D>(descriptions: I) -> Result<String, StyleError>
where
    I: IntoIterator<Item = D>,
    D: Into<Option<StyleDescription>>,
{
    DEFAULT_SHEET.style(descriptions)
}

/// Registers merged `descriptions` against a literal selector.
pub fn css_rule<I, D>(selector: &str, descriptions: I) -> Result<(), StyleError>
where
    I: IntoIterator<Item = D>,
    D: Into<Option<StyleDescription>>,
{
    DEFAULT_SHEET.css_rule(selector, descriptions)
}

/// Registers `@keyframes` and returns the animation name.
pub fn keyframes(frames: &KeyframesDescription) -> Result<String, StyleError> {
    DEFAULT_SHEET.keyframes(frames)
}

/// Appends one `@font-face` block per description.
pub fn font_face<I>(faces: I) -> Result<(), StyleError>
where
    I: IntoIterator<Item = StyleDescription>,
{
    DEFAULT_SHEET.font_face(faces)
}

/// Appends CSS text verbatim, ahead of generated rules.
pub fn css_raw(css: &str) {
    DEFAULT_SHEET.css_raw(css)
}

/// Registers named styles, using each name as its debug name.
pub fn stylesheet<I, K>(named: I) -> Result<HashMap<String, String>, StyleError>
where
    I: IntoIterator<Item = (K, StyleDescription)>,
    K: Into<String>,
{
    DEFAULT_SHEET.stylesheet(named)
}

pub fn get_styles() -> String {
    DEFAULT_SHEET.get_styles()
}

pub fn set_styles_target(target: Arc<dyn StylesTarget>) {
    DEFAULT_SHEET.set_styles_target(target)
}

pub fn force_render_styles() {
    DEFAULT_SHEET.force_render_styles()
}

/// Clears the default sheet. Mostly useful between tests.
pub fn reinit() {
    DEFAULT_SHEET.reinit()
}
