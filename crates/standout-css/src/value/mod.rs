//! Property values and their conversion to CSS text.
//!
//! Every declaration in a [`StyleDescription`](crate::StyleDescription) holds a
//! [`PropertyValue`]. Most values are plain strings or numbers; richer values
//! (colors, gradients, arbitrary CSS functions) implement [`CssValue`] and
//! render themselves on demand.
//!
//! ## Fallback Chains
//!
//! A [`PropertyValue::List`] used directly as a property value is a fallback
//! chain: the normalizer emits one declaration per element, in order, all
//! with the same property name.
//!
//! ```rust
//! use standout_css::{style, get_styles, reinit, StyleDescription};
//!
//! reinit();
//! let class = style([StyleDescription::new()
//!     .set("display", vec!["-webkit-flex", "flex"])]).unwrap();
//! assert_eq!(get_styles(), format!(".{class}{{display:-webkit-flex;display:flex}}"));
//! ```
//!
//! Numbers are printed in their shortest form and never receive a unit.

mod color;
mod function;

pub use color::{hsl, hsla, rgb, rgba, Color};
pub use function::{css_function, linear_gradient, repeating_linear_gradient, CssFunction};

use std::fmt;
use std::sync::Arc;

use crate::error::StyleError;

/// A value that knows how to render itself as CSS text.
///
/// Implementors carry a type tag (`"color"`, `"gradient"`, ...) used in error
/// messages. Rendering failures are programming errors in the helper and
/// propagate to the caller of the registration function.
pub trait CssValue: fmt::Debug + Send + Sync {
    /// Short tag naming the kind of value.
    fn type_tag(&self) -> &'static str;

    /// Renders the value as CSS text.
    fn to_css(&self) -> Result<String, StyleError>;
}

/// The value side of a declaration.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// Absent value. Skipped by [`extend`](crate::extend) and the normalizer.
    Null,
    /// Boolean. `false` is skipped like `Null`.
    Bool(bool),
    /// Number, printed without a unit.
    Number(f64),
    /// Text, used verbatim. The empty string is skipped.
    Text(String),
    /// Fallback chain as a property value, space-joined inside typed values.
    List(Vec<PropertyValue>),
    /// A typed value helper.
    Typed(Arc<dyn CssValue>),
}

impl PropertyValue {
    /// Wraps a typed value helper.
    pub fn typed(value: impl CssValue + 'static) -> Self {
        PropertyValue::Typed(Arc::new(value))
    }

    /// Returns true for values that composition ignores: null, `false`, the
    /// empty string and NaN. Zero is not falsy.
    pub fn is_falsy(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::Bool(b) => !b,
            PropertyValue::Text(s) => s.is_empty(),
            PropertyValue::Number(n) => n.is_nan(),
            PropertyValue::List(_) | PropertyValue::Typed(_) => false,
        }
    }

    /// Converts a JSON scalar or array into a value.
    ///
    /// Objects are rejected; nested selectors are handled by the description
    /// parser before values are reached.
    pub fn from_json(key: &str, value: &serde_json::Value) -> Result<Self, StyleError> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(PropertyValue::Null),
            Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(PropertyValue::Number)
                .ok_or_else(|| StyleError::InvalidDescription {
                    key: key.to_string(),
                    message: format!("number {} is out of range", n),
                }),
            Value::String(s) => Ok(PropertyValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| PropertyValue::from_json(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(PropertyValue::List),
            Value::Object(_) => Err(StyleError::InvalidDescription {
                key: key.to_string(),
                message: "expected a property value, found a map".to_string(),
            }),
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::Null, PropertyValue::Null) => true,
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a == b,
            (PropertyValue::Number(a), PropertyValue::Number(b)) => a == b,
            (PropertyValue::Text(a), PropertyValue::Text(b)) => a == b,
            (PropertyValue::List(a), PropertyValue::List(b)) => a == b,
            (PropertyValue::Typed(a), PropertyValue::Typed(b)) => {
                a.type_tag() == b.type_tag() && a.to_css().ok() == b.to_css().ok()
            }
            _ => false,
        }
    }
}

/// Converts a value to CSS text.
///
/// Typed values render through [`CssValue::to_css`], numbers print in their
/// shortest form, and lists are joined by single spaces (the color-stop
/// convention). Callers that need fallback semantics expand lists first.
pub fn stringify(value: &PropertyValue) -> Result<String, StyleError> {
    match value {
        PropertyValue::Null => Ok(String::new()),
        PropertyValue::Bool(b) => Ok(b.to_string()),
        PropertyValue::Number(n) => Ok(format_number(*n)),
        PropertyValue::Text(s) => Ok(s.clone()),
        PropertyValue::List(items) => {
            let parts = items.iter().map(stringify).collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(" "))
        }
        PropertyValue::Typed(typed) => typed.to_css(),
    }
}

/// Formats a number the way CSS expects it: no trailing `.0`, no `-0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{}", n)
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<&String> for PropertyValue {
    fn from(s: &String) -> Self {
        PropertyValue::Text(s.clone())
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(n: $ty) -> Self {
                    PropertyValue::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        PropertyValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropertyValue::Null)
    }
}
