//! Output targets that receive rendered CSS.

use std::sync::{Arc, Mutex, PoisonError};

/// Anything that can hold the sheet's CSS text, such as a `<style>` element.
pub trait StylesTarget: Send + Sync {
    fn set_text_content(&self, css: &str);
    fn text_content(&self) -> String;
}

/// In-memory target. Clones share the same buffer.
///
/// ```rust
/// use standout_css::{StylesTarget, TextTarget};
///
/// let target = TextTarget::new();
/// let handle = target.clone();
/// target.set_text_content("a{color:red}");
/// assert_eq!(handle.text_content(), "a{color:red}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextTarget {
    text: Arc<Mutex<String>>,
}

impl TextTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StylesTarget for TextTarget {
    fn set_text_content(&self, css: &str) {
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = css.to_string();
    }

    fn text_content(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
