//! CSS function values: `name(param,param)`.
//!
//! Most CSS functions follow the same shape, so a single [`CssFunction`] type
//! covers gradients and any ad-hoc function a caller needs. Parameters are
//! stringified lazily, so they may themselves be typed values.

use std::sync::Arc;

use super::{stringify, CssValue, PropertyValue};
use crate::error::StyleError;

/// Renders `name(param,param,...)` with every parameter stringified.
///
/// ```rust
/// use standout_css::{css_function, hsl};
///
/// let value = css_function("translate", &["10px".into(), 0.into()]).unwrap();
/// assert_eq!(value, "translate(10px,0)");
///
/// let color = css_function("drop-shadow", &["0 0 2px".into(), hsl(0.0, 0.0, 0.0).into()]).unwrap();
/// assert_eq!(color, "drop-shadow(0 0 2px,hsl(0,0%,0%))");
/// ```
pub fn css_function(name: &str, params: &[PropertyValue]) -> Result<String, StyleError> {
    let params = params.iter().map(stringify).collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{}({})", name, params.join(",")))
}

/// A deferred CSS function call, rendered when the declaration is compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct CssFunction {
    kind: &'static str,
    name: String,
    params: Vec<PropertyValue>,
}

impl CssFunction {
    /// Creates a function value with the generic `function` tag.
    pub fn new(name: impl Into<String>, params: Vec<PropertyValue>) -> Self {
        Self {
            kind: "function",
            name: name.into(),
            params,
        }
    }

    fn gradient(name: &str, position: PropertyValue, stops: Vec<PropertyValue>) -> Self {
        let mut params = Vec::with_capacity(stops.len() + 1);
        params.push(position);
        params.extend(stops);
        Self {
            kind: "gradient",
            name: name.to_string(),
            params,
        }
    }

    /// The CSS function name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CssValue for CssFunction {
    fn type_tag(&self) -> &'static str {
        self.kind
    }

    fn to_css(&self) -> Result<String, StyleError> {
        css_function(&self.name, &self.params)
    }
}

impl From<CssFunction> for PropertyValue {
    fn from(function: CssFunction) -> Self {
        PropertyValue::Typed(Arc::new(function))
    }
}

/// `linear-gradient(position, stops...)`.
///
/// A stop is a color, or a list `[color, length]` rendered as `color length`.
///
/// ```rust
/// use standout_css::{hsl, linear_gradient, CssValue, PropertyValue};
///
/// let gradient = linear_gradient(
///     "top left",
///     vec![hsl(0.0, 100.0, 50.0).into(), PropertyValue::from(vec!["blue", "40%"])],
/// );
/// assert_eq!(
///     gradient.to_css().unwrap(),
///     "linear-gradient(top left,hsl(0,100%,50%),blue 40%)"
/// );
/// ```
pub fn linear_gradient(position: impl Into<PropertyValue>, stops: Vec<PropertyValue>) -> CssFunction {
    CssFunction::gradient("linear-gradient", position.into(), stops)
}

/// `repeating-linear-gradient(position, stops...)`.
pub fn repeating_linear_gradient(
    position: impl Into<PropertyValue>,
    stops: Vec<PropertyValue>,
) -> CssFunction {
    CssFunction::gradient("repeating-linear-gradient", position.into(), stops)
}
