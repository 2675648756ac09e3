//! Selector composition.
//!
//! [`flatten`] resolves a [`NormalizedStyle`] tree into top-level rules. It
//! emits one rule per (selector, declaration source) pair and never
//! deduplicates; sharing identical blocks is the registry's job.
//!
//! At-rules are not selectors: a nested `@media` or `@supports` key becomes
//! an [`AtRuleBlock`] whose children are flattened against the same parent
//! selector.

use super::normalize::{Declaration, NormalizedStyle};
use crate::util::compose_selector;

/// A resolved selector with its declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub unique: bool,
}

/// An at-rule wrapping flattened rules.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRuleBlock {
    pub rule: String,
    pub children: Vec<FlatNode>,
}

/// One unit of flattened output.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatNode {
    Rule(FlatRule),
    AtRule(AtRuleBlock),
}

/// Flattens `normalized` relative to `root_selector`.
///
/// ```rust
/// use standout_css::style::{flatten, normalize, FlatNode};
/// use standout_css::StyleDescription;
///
/// let description = StyleDescription::new()
///     .set("color", "red")
///     .nest("&:hover", StyleDescription::new().set("color", "blue"));
/// let nodes = flatten(".button", &normalize(&description, false).unwrap());
///
/// let selectors: Vec<_> = nodes
///     .iter()
///     .filter_map(|node| match node {
///         FlatNode::Rule(rule) => Some(rule.selector.as_str()),
///         FlatNode::AtRule(_) => None,
///     })
///     .collect();
/// assert_eq!(selectors, vec![".button", ".button:hover"]);
/// ```
pub fn flatten(root_selector: &str, normalized: &NormalizedStyle) -> Vec<FlatNode> {
    let mut nodes = Vec::new();
    flatten_into(root_selector, normalized, &mut nodes);
    nodes
}

/// Flattens a description registered directly under an at-rule.
///
/// There is no parent selector: the at-rule's own declarations form a bare
/// block, `&` is dropped from nested keys and any other key becomes a
/// top-level selector inside the at-rule.
///
/// ```rust
/// use standout_css::style::{flatten_at_rule, normalize, FlatNode};
/// use standout_css::StyleDescription;
///
/// let print = StyleDescription::new().nest("body", StyleDescription::new().set("color", "black"));
/// let block = flatten_at_rule("@media print", &normalize(&print, false).unwrap());
///
/// assert_eq!(block.rule, "@media print");
/// assert!(matches!(&block.children[1], FlatNode::Rule(rule) if rule.selector == "body"));
/// ```
pub fn flatten_at_rule(rule: &str, normalized: &NormalizedStyle) -> AtRuleBlock {
    let mut children = vec![FlatNode::Rule(FlatRule {
        selector: String::new(),
        declarations: normalized.declarations.clone(),
        unique: normalized.unique,
    })];

    for (nested, child) in &normalized.nested {
        if nested.starts_with('@') {
            children.push(FlatNode::AtRule(flatten_at_rule(nested, child)));
        } else {
            let selector = nested.replace('&', "");
            flatten_into(selector.trim(), child, &mut children);
        }
    }

    AtRuleBlock {
        rule: rule.to_string(),
        children,
    }
}

fn flatten_into(selector: &str, normalized: &NormalizedStyle, out: &mut Vec<FlatNode>) {
    out.push(FlatNode::Rule(FlatRule {
        selector: selector.to_string(),
        declarations: normalized.declarations.clone(),
        unique: normalized.unique,
    }));

    for (nested, child) in &normalized.nested {
        if nested.starts_with('@') {
            out.push(FlatNode::AtRule(AtRuleBlock {
                rule: nested.clone(),
                children: flatten(selector, child),
            }));
        } else {
            let composed = compose_selector(selector, nested);
            flatten_into(&composed, child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::normalize::normalize;
    use crate::StyleDescription;

    fn rule(selector: &str, declarations: &[(&str, &str)]) -> FlatNode {
        FlatNode::Rule(FlatRule {
            selector: selector.to_string(),
            declarations: declarations
                .iter()
                .map(|(p, v)| Declaration::new(*p, *v))
                .collect(),
            unique: false,
        })
    }

    fn flat(description: &StyleDescription) -> Vec<FlatNode> {
        flatten("&", &normalize(description, false).unwrap())
    }

    #[test]
    fn test_root_rule_first() {
        let nodes = flat(&StyleDescription::new().set("color", "red"));
        assert_eq!(nodes, vec![rule("&", &[("color", "red")])]);
    }

    #[test]
    fn test_pseudo_and_child_selectors() {
        let nodes = flat(
            &StyleDescription::new()
                .set("color", "red")
                .nest("&>*", StyleDescription::new().set("color", "blue"))
                .nest("&:hover", StyleDescription::new().set("color", "green")),
        );
        assert_eq!(
            nodes,
            vec![
                rule("&", &[("color", "red")]),
                rule("&>*", &[("color", "blue")]),
                rule("&:hover", &[("color", "green")]),
            ]
        );
    }

    #[test]
    fn test_media_wraps_rules_with_same_parent() {
        let nodes = flatten(
            ".component",
            &normalize(
                &StyleDescription::new().nest(
                    "@media (min-width: 400px)",
                    StyleDescription::new()
                        .set("color", "red")
                        .nest("&:hover", StyleDescription::new().set("color", "green")),
                ),
                false,
            )
            .unwrap(),
        );

        assert_eq!(
            nodes,
            vec![
                rule(".component", &[]),
                FlatNode::AtRule(AtRuleBlock {
                    rule: "@media (min-width: 400px)".to_string(),
                    children: vec![
                        rule(".component", &[("color", "red")]),
                        rule(".component:hover", &[("color", "green")]),
                    ],
                }),
            ]
        );
    }

    #[test]
    fn test_deep_nesting_composes() {
        let nodes = flat(&StyleDescription::new().nest(
            "&:hover",
            StyleDescription::new().nest("&&", StyleDescription::new().set("background", "green")),
        ));
        assert_eq!(
            nodes,
            vec![
                rule("&", &[]),
                rule("&:hover", &[]),
                rule("&:hover&:hover", &[("background", "green")]),
            ]
        );
    }

    #[test]
    fn test_at_rule_root_is_not_a_selector() {
        let block = flatten_at_rule(
            "@media print",
            &normalize(
                &StyleDescription::new()
                    .set("margin", 0)
                    .nest("body", StyleDescription::new().set("color", "black"))
                    .nest("&:first", StyleDescription::new().set("color", "grey")),
                false,
            )
            .unwrap(),
        );

        assert_eq!(
            block,
            AtRuleBlock {
                rule: "@media print".to_string(),
                children: vec![
                    rule("", &[("margin", "0")]),
                    rule("body", &[("color", "black")]),
                    rule(":first", &[("color", "grey")]),
                ],
            }
        );
    }

    #[test]
    fn test_unique_flag_carried() {
        let nodes = flat(&StyleDescription::new().nest(
            "&::placeholder",
            StyleDescription::new().unique(true).set("color", "grey"),
        ));
        match &nodes[1] {
            FlatNode::Rule(rule) => assert!(rule.unique),
            other => panic!("expected a rule, got {:?}", other),
        }
    }
}
