//! Directive processing.
//!
//! [`normalize`] turns a [`StyleDescription`] into a [`NormalizedStyle`]:
//! every value is rendered to text, property names are hyphenated, and the
//! configuration directives are consumed. What remains is pure data for the
//! flattener.

use super::description::StyleDescription;
use crate::error::StyleError;
use crate::util::hyphenate;
use crate::value::{stringify, PropertyValue};

/// Deepest `$nest` chain accepted before giving up.
pub const MAX_NESTING_DEPTH: usize = 128;

/// A single `property:value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A description with directives resolved and values rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedStyle {
    /// Declarations in insertion order, fallbacks expanded.
    pub declarations: Vec<Declaration>,
    /// Nested selectors in insertion order.
    pub nested: Vec<(String, NormalizedStyle)>,
    /// `$unique` flag for this rule.
    pub unique: bool,
    /// `$debugName`, only kept in debug mode.
    pub debug_name: Option<String>,
}

/// Resolves directives and renders values.
///
/// `$priority: N` wraps the fully processed result (including its own
/// `$nest`) under `&` repeated `N + 1` times. `$debugName` survives only when
/// `debug` is set.
pub fn normalize(description: &StyleDescription, debug: bool) -> Result<NormalizedStyle, StyleError> {
    normalize_at(description, debug, 0)
}

fn normalize_at(
    description: &StyleDescription,
    debug: bool,
    depth: usize,
) -> Result<NormalizedStyle, StyleError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(StyleError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }

    let mut normalized = NormalizedStyle::default();

    for (property, value) in &description.declarations {
        if value.is_falsy() {
            continue;
        }
        let property = hyphenate(property);
        match value {
            PropertyValue::List(fallbacks) => {
                for fallback in fallbacks.iter().filter(|v| !v.is_falsy()) {
                    normalized
                        .declarations
                        .push(Declaration::new(property.clone(), stringify(fallback)?));
                }
            }
            _ => normalized
                .declarations
                .push(Declaration::new(property, stringify(value)?)),
        }
    }

    for (selector, child) in &description.nest {
        let child = normalize_at(child, debug, depth + 1)?;
        normalized.nested.push((selector.clone(), child));
    }

    normalized.unique = description.is_unique();
    if debug {
        normalized.debug_name = description
            .debug_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
    }

    let priority = description.priority() as usize;
    if priority > 0 {
        let debug_name = normalized.debug_name.take();
        normalized = NormalizedStyle {
            nested: vec![("&".repeat(priority + 1), normalized)],
            debug_name,
            ..NormalizedStyle::default()
        };
    }

    Ok(normalized)
}
