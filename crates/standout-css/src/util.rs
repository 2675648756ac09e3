//! Small text helpers shared by the compiler stages.

use crate::error::StyleError;

/// Converts a camelCase property name to CSS form.
///
/// `backgroundColor` becomes `background-color`, vendor prefixes gain their
/// leading dash (`WebkitTransition`, `msTransform`). Custom properties
/// (`--brand`) and names that are already lowercase pass through.
pub fn hyphenate(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }

    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }

    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}

/// Deterministic string hash rendered in base 36.
///
/// djb2 with xor, walking UTF-16 code units from the end, in 32-bit
/// arithmetic. Stable across processes and platforms.
pub fn string_hash(input: &str) -> String {
    let units: Vec<u16> = input.encode_utf16().collect();
    let mut value: i32 = 5381;
    for unit in units.iter().rev() {
        value = value.wrapping_mul(33) ^ i32::from(*unit);
    }
    to_base36(value as u32)
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Builds `.name` with the identifier escaped for use in a selector.
pub fn class_selector(class_name: &str) -> Result<String, StyleError> {
    let mut selector = String::from(".");
    cssparser::serialize_identifier(class_name, &mut selector)?;
    Ok(selector)
}

/// Splits a selector list on top-level commas.
///
/// Commas inside parentheses or brackets (`:is(a, b)`, `[title="a,b"]`)
/// do not split.
pub fn split_selector_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in selector.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(selector[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(selector[start..].trim());
    parts
}

/// Composes a nested selector with its parent.
///
/// `&` is replaced textually by the parent; a selector without `&` is read
/// as a descendant of the parent. Both sides may be lists, which expand
/// pairwise.
pub fn compose_selector(parent: &str, selector: &str) -> String {
    let parents = split_selector_list(parent);
    let children = split_selector_list(selector);

    let mut composed = Vec::with_capacity(parents.len() * children.len());
    for parent in &parents {
        for child in &children {
            if child.contains('&') {
                composed.push(child.replace('&', parent));
            } else {
                composed.push(format!("{} {}", parent, child));
            }
        }
    }
    composed.join(",")
}
