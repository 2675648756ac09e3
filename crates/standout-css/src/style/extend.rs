//! Composition helpers: [`extend`], [`classes`] and [`media`].

use serde::Deserialize;

use super::description::StyleDescription;
use crate::value::format_number;

/// Merges descriptions into one, left to right.
///
/// - Declarations: the last truthy value wins, keeping the position of the
///   first write.
/// - `$nest`: selectors already present are merged recursively, new
///   selectors are appended.
/// - `$unique`, `$debugName`, `$priority`: the last truthy value wins.
/// - `None` descriptions and falsy values (`null`, `false`, `""`) are
///   skipped. Zero is kept.
///
/// ```rust
/// use standout_css::{extend, StyleDescription};
///
/// let is_active = false;
/// let merged = extend([
///     Some(StyleDescription::new().set("color", "grey")),
///     is_active.then(|| StyleDescription::new().set("color", "green")),
///     Some(StyleDescription::new().set("color", "red")),
/// ]);
/// assert_eq!(merged, StyleDescription::new().set("color", "red"));
/// ```
pub fn extend<I, D>(descriptions: I) -> StyleDescription
where
    I: IntoIterator<Item = D>,
    D: Into<Option<StyleDescription>>,
{
    let mut result = StyleDescription::new();
    for description in descriptions.into_iter().filter_map(Into::into) {
        merge_into(&mut result, description);
    }
    result
}

fn merge_into(result: &mut StyleDescription, description: StyleDescription) {
    for (property, value) in description.declarations {
        if value.is_falsy() {
            continue;
        }
        result.insert(property, value);
    }

    for (selector, child) in description.nest {
        match result.nest.iter_mut().find(|(existing, _)| *existing == selector) {
            Some((_, previous)) => merge_into(previous, child),
            None => result.nest.push((selector, child)),
        }
    }

    if let Some(true) = description.unique {
        result.unique = Some(true);
    }
    if let Some(name) = description.debug_name.filter(|name| !name.is_empty()) {
        result.debug_name = Some(name);
    }
    if let Some(priority) = description.priority.filter(|p| *p > 0) {
        result.priority = Some(priority);
    }
}

/// Joins class names with a space, skipping `None` and empty tokens.
///
/// ```rust
/// use standout_css::classes;
///
/// let is_disabled = false;
/// assert_eq!(classes(["a", "b"]), "a b");
/// assert_eq!(classes::<_, _, &str>([Some("a"), is_disabled.then_some("b"), Some("c")]), "a c");
/// ```
pub fn classes<I, T, S>(tokens: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Into<Option<S>>,
    S: AsRef<str>,
{
    let tokens: Vec<S> = tokens
        .into_iter()
        .filter_map(Into::into)
        .filter(|token| !token.as_ref().is_empty())
        .collect();
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Media type for [`MediaQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Screen,
    Print,
    All,
}

impl MediaType {
    fn as_str(self) -> &'static str {
        match self {
            MediaType::Screen => "screen",
            MediaType::Print => "print",
            MediaType::All => "all",
        }
    }
}

/// Orientation for [`MediaQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

/// A length in a media query: numbers are pixels, text is used verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MediaLength {
    Px(f64),
    Raw(String),
}

impl MediaLength {
    fn is_set(&self) -> bool {
        match self {
            MediaLength::Px(n) => *n != 0.0 && !n.is_nan(),
            MediaLength::Raw(s) => !s.is_empty(),
        }
    }

    fn to_css(&self) -> String {
        match self {
            MediaLength::Px(n) => format!("{}px", format_number(*n)),
            MediaLength::Raw(s) => s.clone(),
        }
    }
}

impl From<f64> for MediaLength {
    fn from(n: f64) -> Self {
        MediaLength::Px(n)
    }
}

impl From<i32> for MediaLength {
    fn from(n: i32) -> Self {
        MediaLength::Px(n as f64)
    }
}

impl From<u32> for MediaLength {
    fn from(n: u32) -> Self {
        MediaLength::Px(n as f64)
    }
}

impl From<&str> for MediaLength {
    fn from(s: &str) -> Self {
        MediaLength::Raw(s.to_string())
    }
}

impl From<String> for MediaLength {
    fn from(s: String) -> Self {
        MediaLength::Raw(s)
    }
}

/// Structured media query for [`media`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaQuery {
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub orientation: Option<Orientation>,
    pub min_width: Option<MediaLength>,
    pub max_width: Option<MediaLength>,
    pub min_height: Option<MediaLength>,
    pub max_height: Option<MediaLength>,
}

impl MediaQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn min_width(mut self, length: impl Into<MediaLength>) -> Self {
        self.min_width = Some(length.into());
        self
    }

    pub fn max_width(mut self, length: impl Into<MediaLength>) -> Self {
        self.max_width = Some(length.into());
        self
    }

    pub fn min_height(mut self, length: impl Into<MediaLength>) -> Self {
        self.min_height = Some(length.into());
        self
    }

    pub fn max_height(mut self, length: impl Into<MediaLength>) -> Self {
        self.max_height = Some(length.into());
        self
    }

    /// Renders the `@media ...` at-rule text.
    pub fn to_at_rule(&self) -> String {
        let mut sections: Vec<String> = Vec::new();
        if let Some(media_type) = self.media_type {
            sections.push(media_type.as_str().to_string());
        }
        if let Some(orientation) = self.orientation {
            sections.push(orientation.as_str().to_string());
        }

        let features = [
            ("min-width", &self.min_width),
            ("max-width", &self.max_width),
            ("min-height", &self.min_height),
            ("max-height", &self.max_height),
        ];
        for (feature, length) in features {
            if let Some(length) = length.as_ref().filter(|l| l.is_set()) {
                sections.push(format!("({}: {})", feature, length.to_css()));
            }
        }

        format!("@media {}", sections.join(" and "))
    }
}

/// Wraps the merged descriptions in a `$nest` entry for the media query.
///
/// ```rust
/// use standout_css::{media, MediaQuery, StyleDescription};
///
/// let responsive = media(
///     &MediaQuery::new().min_width(400),
///     [StyleDescription::new().set("color", "red")],
/// );
/// assert!(responsive.get_nested("@media (min-width: 400px)").is_some());
/// ```
pub fn media<I, D>(query: &MediaQuery, descriptions: I) -> StyleDescription
where
    I: IntoIterator<Item = D>,
    D: Into<Option<StyleDescription>>,
{
    StyleDescription::new().nest(query.to_at_rule(), extend(descriptions))
}
