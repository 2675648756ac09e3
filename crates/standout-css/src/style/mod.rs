//! Style descriptions and the stages that compile them.
//!
//! ## Pipeline
//!
//! 1. [`extend`]: merge partial descriptions (later wins, `$nest` merges deep)
//! 2. [`normalize`]: resolve directives and render values to text
//! 3. [`flatten`]: resolve nested selectors into top-level rules
//!
//! The [`StyleRegistry`](crate::StyleRegistry) runs these stages on every
//! registration; they are public for callers who want the intermediate
//! forms (for example to inspect what a description compiles to).
//!
//! ## Example
//!
//! ```rust
//! use standout_css::style::{extend, normalize, Declaration};
//! use standout_css::StyleDescription;
//!
//! let merged = extend([
//!     StyleDescription::new().set("backgroundColor", "grey"),
//!     StyleDescription::new().set("backgroundColor", "red"),
//! ]);
//! let normalized = normalize(&merged, false).unwrap();
//! assert_eq!(normalized.declarations, vec![Declaration::new("background-color", "red")]);
//! ```

mod description;
mod extend;
mod flatten;
mod normalize;

pub use description::{
    KeyframesDescription, StyleDescription, DEBUG_NAME_KEY, NEST_KEY, PRIORITY_KEY, UNIQUE_KEY,
};
pub use extend::{classes, extend, media, MediaLength, MediaQuery, MediaType, Orientation};
pub use flatten::{flatten, flatten_at_rule, AtRuleBlock, FlatNode, FlatRule};
pub use normalize::{normalize, Declaration, NormalizedStyle, MAX_NESTING_DEPTH};
