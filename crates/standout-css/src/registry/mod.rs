//! The style registry: compiled rules with content-addressed class names.
//!
//! A [`StyleRegistry`] owns every rule registered so far and renders them as
//! one CSS string. Registration is idempotent: the same description always
//! yields the same class name and never duplicates output.
//!
//! ## Naming
//!
//! A style's class name is derived from its compiled CSS, so identical
//! descriptions share a class across calls and across processes:
//!
//! - `f<hash>` normally
//! - `<debugName>_f<hash>` when debug naming is on and `$debugName` is set
//!
//! Keyframes are named the same way and returned as animation names.
//!
//! ## Sharing
//!
//! Within one style, selectors with identical declaration blocks share a
//! single rule (`.f1,.f1>*{color:red}`) unless marked `$unique`. Across
//! styles, only the root blocks are shared; nested selectors stay scoped to
//! the class that declared them.
//!
//! ```rust
//! use standout_css::{StyleDescription, StyleRegistry};
//!
//! let mut registry = StyleRegistry::new();
//! let red = StyleDescription::new().set("color", "red");
//!
//! let first = registry.register_style(&red, false).unwrap();
//! let second = registry.register_style(&red, false).unwrap();
//! assert_eq!(first, second);
//! assert_eq!(registry.serialize(), format!(".{}{{color:red}}", first));
//! ```

mod rule_set;

use log::trace;

use crate::error::StyleError;
use crate::style::{
    flatten, flatten_at_rule, normalize, Declaration, FlatNode, KeyframesDescription,
    StyleDescription,
};
use crate::util::{class_selector, string_hash};

use rule_set::{frames_css, sort_declarations, RuleSet, Sharing};

/// Root placeholder used while hashing, before the class name is known.
const HASH_ROOT: &str = "&";

/// All rules registered so far, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    rules: RuleSet,
    version: u64,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change counter. Bumped whenever serialized output changes, reset to
    /// zero by [`reinit`](Self::reinit).
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of top-level blocks.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compiles `description` and registers it under a generated class name.
    ///
    /// Returns the class name (unescaped, ready for a `class` attribute).
    /// `debug` enables `$debugName` prefixes.
    pub fn register_style(
        &mut self,
        description: &StyleDescription,
        debug: bool,
    ) -> Result<String, StyleError> {
        let normalized = normalize(description, debug)?;

        let mut hashed = RuleSet::default();
        hashed.insert_nodes(flatten(HASH_ROOT, &normalized), Sharing::ByDeclarations);
        // A `$unique` root is stored apart from shared blocks, so it must not
        // reuse the class of the same declarations without the flag.
        let marker = if normalized.unique { "$unique;" } else { "" };
        let hash = string_hash(&format!("{}{}", marker, hashed.to_css()));

        let class_name = match &normalized.debug_name {
            Some(name) => format!("{}_f{}", name, hash),
            None => format!("f{}", hash),
        };
        let root = class_selector(&class_name)?;

        let mut compiled = RuleSet::default();
        compiled.insert_nodes(flatten(&root, &normalized), Sharing::ByDeclarations);
        if self.rules.merge_style(compiled, &root) {
            self.bump();
        }

        trace!("registered style {}", class_name);
        Ok(class_name)
    }

    /// Registers `description` against a literal selector.
    ///
    /// Repeated registrations for the same selector merge into one rule,
    /// later values replacing earlier ones for the same property.
    ///
    /// An at-rule selector (`@media print`, `@page`) wraps its body instead:
    /// own declarations go straight inside the block and nested keys become
    /// top-level selectors within it.
    pub fn register_rule(
        &mut self,
        selector: &str,
        description: &StyleDescription,
    ) -> Result<(), StyleError> {
        let normalized = normalize(description, false)?;

        let nodes = if selector.starts_with('@') {
            vec![FlatNode::AtRule(flatten_at_rule(selector, &normalized))]
        } else {
            flatten(selector, &normalized)
        };
        let mut compiled = RuleSet::default();
        compiled.insert_nodes(nodes, Sharing::BySelector);
        if self.rules.merge_rules(compiled) {
            self.bump();
        }

        trace!("registered rule {}", selector);
        Ok(())
    }

    /// Appends an `@font-face` block.
    ///
    /// Font faces never deduplicate and cannot nest. A description with no
    /// declarations is ignored.
    pub fn register_font_face(&mut self, description: &StyleDescription) -> Result<(), StyleError> {
        self.register_font_faces([description])
    }

    /// Appends one `@font-face` block per description.
    ///
    /// Every face is compiled before any is stored: if one fails, none are
    /// registered.
    pub fn register_font_faces<'a, I>(&mut self, faces: I) -> Result<(), StyleError>
    where
        I: IntoIterator<Item = &'a StyleDescription>,
    {
        let compiled = faces
            .into_iter()
            .map(compile_font_face)
            .collect::<Result<Vec<_>, _>>()?;

        for declarations in compiled.into_iter().filter(|d| !d.is_empty()) {
            self.rules.push_unkeyed("@font-face", declarations);
            self.bump();
        }
        Ok(())
    }

    /// Registers an `@keyframes` block and returns its generated name.
    ///
    /// Frames are kept in insertion order; frames without declarations are
    /// dropped. Nested selectors are rejected.
    pub fn register_keyframes(
        &mut self,
        keyframes: &KeyframesDescription,
        debug: bool,
    ) -> Result<String, StyleError> {
        let mut frames = Vec::new();
        for (offset, frame) in keyframes.frames() {
            let normalized = normalize(frame, false)?;
            if let Some((selector, _)) = normalized.nested.first() {
                return Err(StyleError::UnexpectedNesting {
                    context: "@keyframes".to_string(),
                    selector: selector.clone(),
                });
            }
            if !normalized.declarations.is_empty() {
                frames.push((offset.to_string(), sort_declarations(normalized.declarations)));
            }
        }

        let hash = string_hash(&frames_css(&frames));
        let name = match keyframes.debug_name().filter(|name| debug && !name.is_empty()) {
            Some(debug_name) => format!("{}_f{}", debug_name, hash),
            None => format!("f{}", hash),
        };
        if frames.is_empty() {
            return Ok(name);
        }

        if self.rules.insert_keyframes(name.clone(), frames) {
            self.bump();
        }

        trace!("registered keyframes {}", name);
        Ok(name)
    }

    /// Renders every registered block in insertion order.
    pub fn serialize(&self) -> String {
        self.rules.to_css()
    }

    /// Drops all rules and resets the version.
    pub fn reinit(&mut self) {
        self.rules = RuleSet::default();
        self.version = 0;
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

fn compile_font_face(description: &StyleDescription) -> Result<Vec<Declaration>, StyleError> {
    let normalized = normalize(description, false)?;
    if let Some((selector, _)) = normalized.nested.first() {
        return Err(StyleError::UnexpectedNesting {
            context: "@font-face".to_string(),
            selector: selector.clone(),
        });
    }
    Ok(normalized.declarations)
}
