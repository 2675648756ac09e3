//! Keyed, insertion-ordered storage for compiled rules.

use std::collections::HashMap;

use crate::style::{Declaration, FlatNode, FlatRule};

/// How flattened rules are folded into a [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sharing {
    /// Rules with identical declaration blocks share one entry and list
    /// every selector. `$unique` rules opt out.
    ByDeclarations,
    /// Rules with the same selector share one entry; later declarations
    /// replace earlier ones for the same property.
    BySelector,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RuleEntry {
    Style {
        selectors: Vec<String>,
        declarations: Vec<Declaration>,
        unique: bool,
    },
    Block {
        rule: String,
        body: RuleSet,
    },
    Keyframes {
        name: String,
        frames: Vec<(String, Vec<Declaration>)>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RuleSet {
    entries: Vec<RuleEntry>,
    index: HashMap<String, usize>,
}

/// Sorts declarations by property name, keeping fallback order.
pub(crate) fn sort_declarations(mut declarations: Vec<Declaration>) -> Vec<Declaration> {
    declarations.sort_by(|a, b| a.property.cmp(&b.property));
    declarations
}

/// Renders `a:1;b:2`.
pub(crate) fn declarations_css(declarations: &[Declaration]) -> String {
    let mut out = String::new();
    for (i, declaration) in declarations.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(&declaration.property);
        out.push(':');
        out.push_str(&declaration.value);
    }
    out
}

/// Renders keyframe frames as `from{...}to{...}`.
pub(crate) fn frames_css(frames: &[(String, Vec<Declaration>)]) -> String {
    let mut out = String::new();
    for (offset, declarations) in frames {
        out.push_str(offset);
        out.push('{');
        out.push_str(&declarations_css(declarations));
        out.push('}');
    }
    out
}

fn key(parts: &[&str]) -> String {
    parts.join("\u{1}")
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folds flattened output into this set.
    pub fn insert_nodes(&mut self, nodes: Vec<FlatNode>, sharing: Sharing) {
        for node in nodes {
            match node {
                FlatNode::Rule(rule) => self.insert_rule(rule, sharing),
                FlatNode::AtRule(block) => {
                    let mut body = RuleSet::default();
                    body.insert_nodes(block.children, sharing);
                    self.insert_block(block.rule, body);
                }
            }
        }
    }

    fn insert_rule(&mut self, rule: FlatRule, sharing: Sharing) {
        if rule.declarations.is_empty() {
            return;
        }
        let declarations = sort_declarations(rule.declarations);

        match sharing {
            Sharing::ByDeclarations => {
                let block = declarations_css(&declarations);
                let entry_key = if rule.unique {
                    key(&["u", rule.selector.as_str(), block.as_str()])
                } else {
                    key(&["s", block.as_str()])
                };
                match self.index.get(&entry_key) {
                    Some(&position) => {
                        add_selectors(&mut self.entries[position], [rule.selector]);
                    }
                    None => self.push(
                        Some(entry_key),
                        RuleEntry::Style {
                            selectors: vec![rule.selector],
                            declarations,
                            unique: rule.unique,
                        },
                    ),
                }
            }
            Sharing::BySelector => {
                let entry_key = key(&["r", rule.selector.as_str()]);
                match self.index.get(&entry_key) {
                    Some(&position) => {
                        merge_declarations(&mut self.entries[position], declarations);
                    }
                    None => self.push(
                        Some(entry_key),
                        RuleEntry::Style {
                            selectors: vec![rule.selector],
                            declarations,
                            unique: false,
                        },
                    ),
                }
            }
        }
    }

    /// Adds an at-rule block unless an identical one is already present.
    /// Returns whether the set changed.
    fn insert_block(&mut self, rule: String, body: RuleSet) -> bool {
        if body.is_empty() {
            return false;
        }
        let entry_key = key(&["b", rule.as_str(), body.to_css().as_str()]);
        if self.index.contains_key(&entry_key) {
            return false;
        }
        self.push(Some(entry_key), RuleEntry::Block { rule, body });
        true
    }

    /// Merges the compiled rules of one style, rooted at `root_selector`.
    ///
    /// The root rule shares its entry with any other style owning the same
    /// declaration block. Everything else is scoped to its own selectors.
    /// Returns whether the set changed.
    pub fn merge_style(&mut self, compiled: RuleSet, root_selector: &str) -> bool {
        let mut changed = false;
        for entry in compiled.entries {
            match entry {
                RuleEntry::Style {
                    selectors,
                    declarations,
                    unique,
                } => {
                    let block = declarations_css(&declarations);
                    let shared = !unique && selectors.iter().any(|s| s == root_selector);
                    let entry_key = if shared {
                        key(&["s", block.as_str()])
                    } else {
                        key(&["c", selectors.join(",").as_str(), block.as_str()])
                    };
                    match self.index.get(&entry_key) {
                        Some(&position) if shared => {
                            changed |= add_selectors(&mut self.entries[position], selectors);
                        }
                        Some(_) => {}
                        None => {
                            self.push(
                                Some(entry_key),
                                RuleEntry::Style {
                                    selectors,
                                    declarations,
                                    unique,
                                },
                            );
                            changed = true;
                        }
                    }
                }
                RuleEntry::Block { rule, body } => changed |= self.insert_block(rule, body),
                RuleEntry::Keyframes { name, frames } => {
                    changed |= self.insert_keyframes(name, frames)
                }
            }
        }
        changed
    }

    /// Merges rules registered against literal selectors. Returns whether
    /// the set changed.
    pub fn merge_rules(&mut self, compiled: RuleSet) -> bool {
        let mut changed = false;
        for entry in compiled.entries {
            match entry {
                RuleEntry::Style {
                    selectors,
                    declarations,
                    unique,
                } => {
                    let entry_key = key(&["r", selectors.join(",").as_str()]);
                    match self.index.get(&entry_key) {
                        Some(&position) => {
                            changed |= merge_declarations(&mut self.entries[position], declarations);
                        }
                        None => {
                            self.push(
                                Some(entry_key),
                                RuleEntry::Style {
                                    selectors,
                                    declarations,
                                    unique,
                                },
                            );
                            changed = true;
                        }
                    }
                }
                RuleEntry::Block { rule, body } => changed |= self.insert_block(rule, body),
                RuleEntry::Keyframes { name, frames } => {
                    changed |= self.insert_keyframes(name, frames)
                }
            }
        }
        changed
    }

    /// Adds a named `@keyframes` block unless one with `name` exists.
    pub fn insert_keyframes(&mut self, name: String, frames: Vec<(String, Vec<Declaration>)>) -> bool {
        let entry_key = key(&["k", name.as_str()]);
        if self.index.contains_key(&entry_key) {
            return false;
        }
        self.push(Some(entry_key), RuleEntry::Keyframes { name, frames });
        true
    }

    /// Appends an unkeyed block. Used for `@font-face`, which never dedups.
    pub fn push_unkeyed(&mut self, selector: &str, declarations: Vec<Declaration>) {
        self.push(
            None,
            RuleEntry::Style {
                selectors: vec![selector.to_string()],
                declarations: sort_declarations(declarations),
                unique: true,
            },
        );
    }

    fn push(&mut self, entry_key: Option<String>, entry: RuleEntry) {
        if let Some(entry_key) = entry_key {
            self.index.insert(entry_key, self.entries.len());
        }
        self.entries.push(entry);
    }

    /// Serializes every entry in insertion order.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        self.write_css(&mut out);
        out
    }

    fn write_css(&self, out: &mut String) {
        // Declarations written straight into an at-rule body (`@page{margin:0}`)
        // need a `;` before whatever follows them.
        let mut open_declarations = false;
        for entry in &self.entries {
            let start = out.len();
            match entry {
                RuleEntry::Style {
                    selectors,
                    declarations,
                    ..
                } => {
                    if declarations.is_empty() {
                        continue;
                    }
                    if selectors.iter().all(String::is_empty) {
                        if open_declarations {
                            out.push(';');
                        }
                        out.push_str(&declarations_css(declarations));
                        open_declarations = true;
                        continue;
                    }
                    out.push_str(&selectors.join(","));
                    out.push('{');
                    out.push_str(&declarations_css(declarations));
                    out.push('}');
                }
                RuleEntry::Block { rule, body } => {
                    let inner = body.to_css();
                    if inner.is_empty() {
                        continue;
                    }
                    out.push_str(rule);
                    out.push('{');
                    out.push_str(&inner);
                    out.push('}');
                }
                RuleEntry::Keyframes { name, frames } => {
                    out.push_str("@keyframes ");
                    out.push_str(name);
                    out.push('{');
                    out.push_str(&frames_css(frames));
                    out.push('}');
                }
            }
            if open_declarations && out.len() > start {
                out.insert(start, ';');
                open_declarations = false;
            }
        }
    }
}

fn add_selectors(entry: &mut RuleEntry, incoming: impl IntoIterator<Item = String>) -> bool {
    let mut changed = false;
    if let RuleEntry::Style { selectors, .. } = entry {
        for selector in incoming {
            if !selectors.contains(&selector) {
                selectors.push(selector);
                changed = true;
            }
        }
    }
    changed
}

fn merge_declarations(entry: &mut RuleEntry, incoming: Vec<Declaration>) -> bool {
    let RuleEntry::Style { declarations, .. } = entry else {
        return false;
    };
    let before = declarations.clone();
    declarations.retain(|existing| !incoming.iter().any(|d| d.property == existing.property));
    declarations.extend(incoming);
    *declarations = sort_declarations(std::mem::take(declarations));
    *declarations != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{flatten, flatten_at_rule, normalize};
    use crate::StyleDescription;

    fn compile(root: &str, description: &StyleDescription, sharing: Sharing) -> RuleSet {
        let mut set = RuleSet::default();
        set.insert_nodes(flatten(root, &normalize(description, false).unwrap()), sharing);
        set
    }

    #[test]
    fn test_identical_blocks_share_an_entry() {
        let set = compile(
            ".c",
            &StyleDescription::new()
                .set("color", "red")
                .nest("&>*", StyleDescription::new().set("color", "red")),
            Sharing::ByDeclarations,
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.to_css(), ".c,.c>*{color:red}");
    }

    #[test]
    fn test_unique_blocks_stay_separate() {
        let placeholder = StyleDescription::new().unique(true).set("color", "grey");
        let set = compile(
            ".c",
            &StyleDescription::new()
                .nest("&::-webkit-input-placeholder", placeholder.clone())
                .nest("&::-moz-placeholder", placeholder.clone())
                .nest("&::-ms-input-placeholder", placeholder),
            Sharing::ByDeclarations,
        );
        assert_eq!(
            set.to_css(),
            ".c::-webkit-input-placeholder{color:grey}\
             .c::-moz-placeholder{color:grey}\
             .c::-ms-input-placeholder{color:grey}"
        );
    }

    #[test]
    fn test_declarations_sorted_with_stable_fallbacks() {
        let set = compile(
            "a",
            &StyleDescription::new()
                .set("display", vec!["-webkit-flex", "flex"])
                .set("color", "red"),
            Sharing::ByDeclarations,
        );
        assert_eq!(set.to_css(), "a{color:red;display:-webkit-flex;display:flex}");
    }

    #[test]
    fn test_empty_rules_and_blocks_skipped() {
        let set = compile(
            ".c",
            &StyleDescription::new().nest("@media print", StyleDescription::new()),
            Sharing::ByDeclarations,
        );
        assert!(set.is_empty());
        assert_eq!(set.to_css(), "");
    }

    #[test]
    fn test_by_selector_replaces_properties() {
        let mut set = compile(
            "body",
            &StyleDescription::new().set("color", "blue").set("margin", 0),
            Sharing::BySelector,
        );
        let later = compile(
            "body",
            &StyleDescription::new().set("color", "green"),
            Sharing::BySelector,
        );
        assert!(set.merge_rules(later));
        assert_eq!(set.to_css(), "body{color:green;margin:0}");
    }

    #[test]
    fn test_merge_style_shares_root_only() {
        let mut global = RuleSet::default();
        let first = compile(
            ".a",
            &StyleDescription::new()
                .set("color", "red")
                .nest("&:hover", StyleDescription::new().set("color", "blue")),
            Sharing::ByDeclarations,
        );
        let second = compile(
            ".b",
            &StyleDescription::new()
                .set("color", "red")
                .nest("&:hover", StyleDescription::new().set("color", "blue")),
            Sharing::ByDeclarations,
        );
        assert!(global.merge_style(first.clone(), ".a"));
        assert!(global.merge_style(second, ".b"));
        assert!(!global.merge_style(first, ".a"));
        assert_eq!(
            global.to_css(),
            ".a,.b{color:red}.a:hover{color:blue}.b:hover{color:blue}"
        );
    }

    #[test]
    fn test_bare_declarations_inside_block() {
        let mut set = RuleSet::default();
        set.insert_nodes(
            vec![FlatNode::AtRule(flatten_at_rule(
                "@page",
                &normalize(
                    &StyleDescription::new()
                        .set("margin", 0)
                        .nest("@top-left", StyleDescription::new().set("content", "'x'")),
                    false,
                )
                .unwrap(),
            ))],
            Sharing::BySelector,
        );
        assert_eq!(set.to_css(), "@page{margin:0;@top-left{content:'x'}}");
    }

    #[test]
    fn test_keyframes_keyed_by_name() {
        let mut set = RuleSet::default();
        let frames = vec![
            ("from".to_string(), vec![Declaration::new("color", "red")]),
            ("to".to_string(), vec![Declaration::new("color", "blue")]),
        ];
        assert!(set.insert_keyframes("fx".to_string(), frames.clone()));
        assert!(!set.insert_keyframes("fx".to_string(), frames));
        assert_eq!(set.to_css(), "@keyframes fx{from{color:red}to{color:blue}}");
    }

    #[test]
    fn test_unkeyed_entries_always_append() {
        let mut set = RuleSet::default();
        let declarations = vec![Declaration::new("font-family", "Bitstream")];
        set.push_unkeyed("@font-face", declarations.clone());
        set.push_unkeyed("@font-face", declarations);
        assert_eq!(
            set.to_css(),
            "@font-face{font-family:Bitstream}@font-face{font-family:Bitstream}"
        );
    }
}
