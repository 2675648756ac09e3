//! Style and keyframe descriptions.
//!
//! A [`StyleDescription`] mixes plain CSS declarations with a small, fixed set
//! of directives. In Rust the directives are explicit fields; in JSON and YAML
//! they are reserved keys recognized by exact match:
//!
//! | Key          | Field                                | Effect                                  |
//! |--------------|--------------------------------------|-----------------------------------------|
//! | `$nest`      | [`nest`](StyleDescription::nest)     | Nested selectors and at-rules           |
//! | `$unique`    | [`unique`](StyleDescription::unique) | Never share this rule with other selectors |
//! | `$debugName` | [`with_debug_name`](StyleDescription::with_debug_name) | Readable class name prefix in debug mode |
//! | `$priority`  | [`with_priority`](StyleDescription::with_priority) | Repeat the selector to raise specificity |
//!
//! Any other key is a declaration. For convenience, a map-valued key that
//! contains `&` or starts with `@` is read as a nested selector even outside
//! `$nest`.
//!
//! ```rust
//! use standout_css::StyleDescription;
//!
//! let from_yaml = StyleDescription::from_yaml(r#"
//! color: red
//! $nest:
//!   "&:hover":
//!     color: blue
//! "#).unwrap();
//!
//! let built = StyleDescription::new()
//!     .set("color", "red")
//!     .nest("&:hover", StyleDescription::new().set("color", "blue"));
//!
//! assert_eq!(from_yaml, built);
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::StyleError;
use crate::value::PropertyValue;

/// Directive key for nested selectors.
pub const NEST_KEY: &str = "$nest";
/// Directive key disabling rule sharing.
pub const UNIQUE_KEY: &str = "$unique";
/// Directive key for the readable class name prefix.
pub const DEBUG_NAME_KEY: &str = "$debugName";
/// Directive key for selector repetition.
pub const PRIORITY_KEY: &str = "$priority";

/// A nested, directive-carrying style description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDescription {
    pub(crate) declarations: Vec<(String, PropertyValue)>,
    pub(crate) nest: Vec<(String, StyleDescription)>,
    pub(crate) unique: Option<bool>,
    pub(crate) debug_name: Option<String>,
    pub(crate) priority: Option<u32>,
}

impl StyleDescription {
    /// Creates an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a declaration, returning `self` for chaining.
    ///
    /// Setting an existing property replaces its value in place.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Adds a nested selector or at-rule, returning `self` for chaining.
    ///
    /// The selector is relative to the enclosing rule: `&` stands for the
    /// parent selector, and `@media`/`@supports` wrap the child in an at-rule.
    pub fn nest(mut self, selector: impl Into<String>, child: StyleDescription) -> Self {
        self.insert_nested(selector, child);
        self
    }

    /// Marks the rule as unique (never comma-joined with identical rules).
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    /// Sets the readable prefix used for the class name in debug mode.
    pub fn with_debug_name(mut self, name: impl Into<String>) -> Self {
        self.debug_name = Some(name.into());
        self
    }

    /// Sets the selector repetition count.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a declaration in place.
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<PropertyValue>) {
        let property = property.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some(slot) => slot.1 = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// Sets a nested selector in place.
    pub fn insert_nested(&mut self, selector: impl Into<String>, child: StyleDescription) {
        let selector = selector.into();
        match self.nest.iter_mut().find(|(name, _)| *name == selector) {
            Some(slot) => slot.1 = child,
            None => self.nest.push((selector, child)),
        }
    }

    /// Looks up a declaration value.
    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Looks up a nested description by selector.
    pub fn get_nested(&self, selector: &str) -> Option<&StyleDescription> {
        self.nest
            .iter()
            .find(|(name, _)| name == selector)
            .map(|(_, child)| child)
    }

    /// Declarations in insertion order.
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.declarations.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Nested selectors in insertion order.
    pub fn nested(&self) -> impl Iterator<Item = (&str, &StyleDescription)> {
        self.nest.iter().map(|(name, child)| (name.as_str(), child))
    }

    /// Whether `$unique` is set.
    pub fn is_unique(&self) -> bool {
        self.unique.unwrap_or(false)
    }

    /// The `$debugName`, if any.
    pub fn debug_name(&self) -> Option<&str> {
        self.debug_name.as_deref()
    }

    /// The `$priority`, zero when absent.
    pub fn priority(&self) -> u32 {
        self.priority.unwrap_or(0)
    }

    /// Returns true when the description has neither declarations nor nesting.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.nest.is_empty()
    }

    /// Builds a description from a JSON value.
    pub fn from_json(value: &Value) -> Result<Self, StyleError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(StyleError::InvalidDescription {
                key: String::new(),
                message: format!("expected a map, found {}", json_kind(other)),
            }),
        }
    }

    /// Parses a description from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, StyleError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Parses a description from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, StyleError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_json(&value)
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self, StyleError> {
        let mut description = Self::new();

        for (key, value) in map {
            match key.as_str() {
                NEST_KEY => match value {
                    Value::Null | Value::Bool(false) => {}
                    Value::Object(nested) => {
                        for (selector, child) in nested {
                            if is_skipped(child) {
                                continue;
                            }
                            description.insert_nested(selector, Self::from_json(child)?);
                        }
                    }
                    other => return Err(expected(key, "a map of selectors", other)),
                },
                UNIQUE_KEY => match value {
                    Value::Null => {}
                    Value::Bool(b) => description.unique = Some(*b),
                    other => return Err(expected(key, "a boolean", other)),
                },
                DEBUG_NAME_KEY => match value {
                    Value::Null => {}
                    Value::String(s) => description.debug_name = Some(s.clone()),
                    other => return Err(expected(key, "a string", other)),
                },
                PRIORITY_KEY => match value {
                    Value::Null => {}
                    Value::Number(n) => {
                        let priority = n
                            .as_u64()
                            .and_then(|p| u32::try_from(p).ok())
                            .ok_or_else(|| expected(key, "a non-negative integer", value))?;
                        description.priority = Some(priority);
                    }
                    other => return Err(expected(key, "a non-negative integer", other)),
                },
                _ if value.is_object() && is_nested_selector(key) => {
                    description.insert_nested(key, Self::from_json(value)?);
                }
                _ => description.insert(key, PropertyValue::from_json(key, value)?),
            }
        }

        Ok(description)
    }
}

impl<'de> Deserialize<'de> for StyleDescription {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        StyleDescription::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Animation keyframes: offset label (`from`, `to`, `50%`) to declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframesDescription {
    pub(crate) frames: Vec<(String, StyleDescription)>,
    pub(crate) debug_name: Option<String>,
}

impl KeyframesDescription {
    /// Creates empty keyframes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the frame at `offset`.
    pub fn frame(mut self, offset: impl Into<String>, declarations: StyleDescription) -> Self {
        let offset = offset.into();
        match self.frames.iter_mut().find(|(name, _)| *name == offset) {
            Some(slot) => slot.1 = declarations,
            None => self.frames.push((offset, declarations)),
        }
        self
    }

    /// Sets the readable prefix used for the animation name in debug mode.
    pub fn with_debug_name(mut self, name: impl Into<String>) -> Self {
        self.debug_name = Some(name.into());
        self
    }

    /// Frames in insertion order.
    pub fn frames(&self) -> impl Iterator<Item = (&str, &StyleDescription)> {
        self.frames.iter().map(|(offset, frame)| (offset.as_str(), frame))
    }

    /// The `$debugName`, if any.
    pub fn debug_name(&self) -> Option<&str> {
        self.debug_name.as_deref()
    }

    /// Builds keyframes from a JSON value.
    pub fn from_json(value: &Value) -> Result<Self, StyleError> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(expected("", "a map of offsets", other)),
        };

        let mut keyframes = Self::new();
        for (key, value) in map {
            if key == DEBUG_NAME_KEY {
                match value {
                    Value::Null => {}
                    Value::String(s) => keyframes.debug_name = Some(s.clone()),
                    other => return Err(expected(key, "a string", other)),
                }
                continue;
            }
            if is_skipped(value) {
                continue;
            }
            keyframes = keyframes.frame(key, StyleDescription::from_json(value)?);
        }
        Ok(keyframes)
    }

    /// Parses keyframes from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, StyleError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_json(&value)
    }
}

impl<'de> Deserialize<'de> for KeyframesDescription {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        KeyframesDescription::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Selector keys that nest rather than declare.
pub(crate) fn is_nested_selector(key: &str) -> bool {
    key.contains('&') || key.starts_with('@')
}

fn is_skipped(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Bool(false))
}

fn expected(key: &str, what: &str, found: &Value) -> StyleError {
    StyleError::InvalidDescription {
        key: key.to_string(),
        message: format!("expected {}, found {}", what, json_kind(found)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_replaces_in_place() {
        let description = StyleDescription::new()
            .set("color", "red")
            .set("margin", 0)
            .set("color", "blue");

        let names: Vec<_> = description.declarations().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["color", "margin"]);
        assert_eq!(description.get("color"), Some(&PropertyValue::from("blue")));
    }

    #[test]
    fn test_directives_default() {
        let description = StyleDescription::new();
        assert!(!description.is_unique());
        assert_eq!(description.debug_name(), None);
        assert_eq!(description.priority(), 0);
        assert!(description.is_empty());
    }

    #[test]
    fn test_from_json_directives() {
        let description = StyleDescription::from_json(&json!({
            "$debugName": "button",
            "$unique": true,
            "$priority": 2,
            "color": "red",
            "$nest": { "&:hover": { "color": "blue" } }
        }))
        .unwrap();

        assert_eq!(description.debug_name(), Some("button"));
        assert!(description.is_unique());
        assert_eq!(description.priority(), 2);
        assert_eq!(description.get("color"), Some(&PropertyValue::from("red")));
        assert_eq!(
            description.get_nested("&:hover"),
            Some(&StyleDescription::new().set("color", "blue"))
        );
    }

    #[test]
    fn test_from_json_preserves_nested_order() {
        let description = StyleDescription::from_json_str(
            r#"{"$nest": {"&:focus": {"color": "red"}, "&&:hover": {"color": "green"}}}"#,
        )
        .unwrap();
        let selectors: Vec<_> = description.nested().map(|(selector, _)| selector).collect();
        assert_eq!(selectors, vec!["&:focus", "&&:hover"]);
    }

    #[test]
    fn test_from_json_bare_nested_selector() {
        let description = StyleDescription::from_json(&json!({
            "@media print": { "display": "none" }
        }))
        .unwrap();
        assert!(description.get_nested("@media print").is_some());
        assert!(description.get("@media print").is_none());
    }

    #[test]
    fn test_from_json_rejects_bad_directives() {
        assert!(StyleDescription::from_json(&json!({"$priority": -1})).is_err());
        assert!(StyleDescription::from_json(&json!({"$unique": "yes"})).is_err());
        assert!(StyleDescription::from_json(&json!({"$nest": 3})).is_err());
        assert!(StyleDescription::from_json(&json!(["color"])).is_err());
    }

    #[test]
    fn test_from_yaml_matches_builder() {
        let description = StyleDescription::from_yaml("fontSize: 14pt\nmargin: 0\n").unwrap();
        let expected = StyleDescription::new().set("fontSize", "14pt").set("margin", 0);
        assert_eq!(description, expected);
    }

    #[test]
    fn test_keyframes_from_yaml() {
        let keyframes = KeyframesDescription::from_yaml(
            "$debugName: fade-in\nfrom:\n  opacity: 0\nto:\n  opacity: 1\n",
        )
        .unwrap();
        assert_eq!(keyframes.debug_name(), Some("fade-in"));
        let offsets: Vec<_> = keyframes.frames().map(|(offset, _)| offset).collect();
        assert_eq!(offsets, vec!["from", "to"]);
    }

    #[test]
    fn test_deserialize_inside_other_types() {
        #[derive(Deserialize)]
        struct Named {
            button: StyleDescription,
        }

        let named: Named = serde_json::from_str(r#"{"button": {"color": "red"}}"#).unwrap();
        assert_eq!(named.button, StyleDescription::new().set("color", "red"));
    }
}
