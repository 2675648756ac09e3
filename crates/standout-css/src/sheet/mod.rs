//! Style sheets: a registry, raw CSS and an output target kept in sync.
//!
//! A [`StyleSheet`] is what application code talks to. It merges partial
//! descriptions with [`extend`], registers them, and keeps an attached
//! [`StylesTarget`] up to date through a deferred [`Scheduler`] so a burst of
//! registrations costs one write.
//!
//! ```rust
//! use std::sync::Arc;
//! use standout_css::{SheetConfig, StyleDescription, StyleSheet, StylesTarget, TextTarget, TickScheduler};
//!
//! let scheduler = TickScheduler::new();
//! let sheet = StyleSheet::with_config(
//!     SheetConfig::default().with_debug(false).with_scheduler(scheduler.clone()),
//! );
//! let target = TextTarget::new();
//! sheet.set_styles_target(Arc::new(target.clone()));
//!
//! let class = sheet.style([StyleDescription::new().set("color", "red")]).unwrap();
//! assert_eq!(target.text_content(), "");
//!
//! scheduler.tick();
//! assert_eq!(target.text_content(), format!(".{}{{color:red}}", class));
//! ```
//!
//! Handles are cheap to clone and share the same state. Targets must not
//! call back into the sheet that writes to them.

mod debug_mode;
mod flush;
mod target;

pub use debug_mode::{detect_debug_mode, is_debug_mode, set_debug_mode_detector, DebugMode};
pub use flush::{ImmediateScheduler, Scheduler, Task, TickScheduler};
pub use target::{StylesTarget, TextTarget};

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

use crate::error::StyleError;
use crate::registry::StyleRegistry;
use crate::style::{extend, KeyframesDescription, StyleDescription};
use flush::ChangeTracker;

/// Construction options for a [`StyleSheet`].
#[derive(Clone)]
pub struct SheetConfig {
    /// Create an in-memory target on the first flush when none is attached.
    pub auto_generate_target: bool,
    /// Force debug naming on or off. `None` asks [`detect_debug_mode`] on
    /// every registration.
    pub debug: Option<bool>,
    /// Where deferred flushes run.
    pub scheduler: Arc<dyn Scheduler>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            auto_generate_target: false,
            debug: None,
            scheduler: Arc::new(TickScheduler::new()),
        }
    }
}

impl SheetConfig {
    pub fn with_auto_generate_target(mut self, enabled: bool) -> Self {
        self.auto_generate_target = enabled;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Arc::new(scheduler);
        self
    }
}

impl fmt::Debug for SheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetConfig")
            .field("auto_generate_target", &self.auto_generate_target)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

struct SheetState {
    registry: StyleRegistry,
    raw: String,
    target: Option<Arc<dyn StylesTarget>>,
    auto_generate_target: bool,
    debug: Option<bool>,
    tracker: ChangeTracker,
}

impl SheetState {
    fn debug_enabled(&self) -> bool {
        self.debug.unwrap_or_else(detect_debug_mode)
    }

    fn render(&self) -> String {
        let mut css = self.raw.clone();
        css.push_str(&self.registry.serialize());
        css
    }

    fn can_flush(&self) -> bool {
        self.target.is_some() || self.auto_generate_target
    }

    /// Renders for the current target, generating one if allowed, and marks
    /// the output as flushed. The caller performs the write.
    fn take_flush(&mut self) -> Option<(Arc<dyn StylesTarget>, String)> {
        let target = match &self.target {
            Some(target) => Arc::clone(target),
            None if self.auto_generate_target => {
                let generated: Arc<dyn StylesTarget> = Arc::new(TextTarget::new());
                self.target = Some(Arc::clone(&generated));
                debug!("generated in-memory styles target");
                generated
            }
            None => return None,
        };
        let css = self.render();
        self.tracker.flushed(self.registry.version());
        Some((target, css))
    }
}

/// A registry plus its output plumbing.
#[derive(Clone)]
pub struct StyleSheet {
    inner: Arc<Mutex<SheetState>>,
    scheduler: Arc<dyn Scheduler>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("StyleSheet")
            .field("version", &state.registry.version())
            .field("rules", &state.registry.len())
            .field("has_target", &state.target.is_some())
            .finish_non_exhaustive()
    }
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::with_config(SheetConfig::default())
    }

    pub fn with_config(config: SheetConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SheetState {
                registry: StyleRegistry::new(),
                raw: String::new(),
                target: None,
                auto_generate_target: config.auto_generate_target,
                debug: config.debug,
                tracker: ChangeTracker::default(),
            })),
            scheduler: config.scheduler,
        }
    }

    fn state(&self) -> MutexGuard<'_, SheetState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merges `descriptions` and returns the generated class name.
    pub fn style<I, D>(&self, descriptions: I) -> Result<String, StyleError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Option<StyleDescription>>,
    {
        let description = extend(descriptions);
        let class_name = {
            let mut state = self.state();
            let debug = state.debug_enabled();
            state.registry.register_style(&description, debug)?
        };
        self.style_updated();
        Ok(class_name)
    }

    /// Registers merged `descriptions` against a literal selector.
    pub fn css_rule<I, D>(&self, selector: &str, descriptions: I) -> Result<(), StyleError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Option<StyleDescription>>,
    {
        let description = extend(descriptions);
        self.state().registry.register_rule(selector, &description)?;
        self.style_updated();
        Ok(())
    }

    /// Registers `@keyframes` and returns the animation name.
    pub fn keyframes(&self, frames: &KeyframesDescription) -> Result<String, StyleError> {
        let name = {
            let mut state = self.state();
            let debug = state.debug_enabled();
            state.registry.register_keyframes(frames, debug)?
        };
        self.style_updated();
        Ok(name)
    }

    /// Appends one `@font-face` block per description. If any face is
    /// rejected, none are added.
    pub fn font_face<I>(&self, faces: I) -> Result<(), StyleError>
    where
        I: IntoIterator<Item = StyleDescription>,
    {
        let faces: Vec<StyleDescription> = faces.into_iter().collect();
        self.state().registry.register_font_faces(&faces)?;
        self.style_updated();
        Ok(())
    }

    /// Appends CSS text verbatim. Raw text always precedes generated rules.
    pub fn css_raw(&self, css: &str) {
        if css.is_empty() {
            return;
        }
        {
            let mut state = self.state();
            state.raw.push_str(css);
            state.tracker.mark_raw_change();
        }
        self.style_updated();
    }

    /// Registers each named style using its name as the debug name.
    ///
    /// ```rust
    /// use standout_css::{SheetConfig, StyleDescription, StyleSheet};
    ///
    /// let sheet = StyleSheet::with_config(SheetConfig::default().with_debug(true));
    /// let classes = sheet
    ///     .stylesheet([("button", StyleDescription::new().set("color", "red"))])
    ///     .unwrap();
    /// assert!(classes["button"].starts_with("button_f"));
    /// ```
    pub fn stylesheet<I, K>(&self, named: I) -> Result<HashMap<String, String>, StyleError>
    where
        I: IntoIterator<Item = (K, StyleDescription)>,
        K: Into<String>,
    {
        let mut classes = HashMap::new();
        for (name, description) in named {
            let name = name.into();
            let class_name = self.style([description.with_debug_name(name.clone())])?;
            classes.insert(name, class_name);
        }
        Ok(classes)
    }

    /// Raw CSS followed by every registered rule.
    pub fn get_styles(&self) -> String {
        self.state().render()
    }

    /// Attaches `target`, clearing the previous one, and writes the current
    /// styles to it immediately.
    pub fn set_styles_target(&self, target: Arc<dyn StylesTarget>) {
        let (previous, css) = {
            let mut state = self.state();
            let previous = state.target.replace(Arc::clone(&target));
            state.tracker.issue_token();
            let css = state.render();
            let version = state.registry.version();
            state.tracker.flushed(version);
            (previous, css)
        };
        if let Some(previous) = previous {
            previous.set_text_content("");
        }
        target.set_text_content(&css);
        debug!("attached styles target ({} bytes)", css.len());
    }

    /// The attached target, including one generated on demand.
    pub fn styles_target(&self) -> Option<Arc<dyn StylesTarget>> {
        self.state().target.clone()
    }

    /// Writes pending styles now instead of waiting for the scheduler.
    pub fn force_render_styles(&self) {
        let flush = {
            let mut state = self.state();
            state.tracker.issue_token();
            state.take_flush()
        };
        if let Some((target, css)) = flush {
            target.set_text_content(&css);
        }
    }

    /// Drops every rule and raw string and empties the target.
    pub fn reinit(&self) {
        let target = {
            let mut state = self.state();
            state.registry.reinit();
            state.raw.clear();
            state.tracker.reset();
            state.target.clone()
        };
        if let Some(target) = target {
            target.set_text_content("");
        }
        debug!("style sheet reinitialized");
    }

    /// Registry change counter.
    pub fn version(&self) -> u64 {
        self.state().registry.version()
    }

    fn style_updated(&self) {
        let token = {
            let mut state = self.state();
            let version = state.registry.version();
            if !state.tracker.needs_flush(version) || !state.can_flush() {
                return;
            }
            state.tracker.issue_token()
        };

        trace!("scheduling styles flush {}", token);
        let sheet = Arc::downgrade(&self.inner);
        self.scheduler.schedule(Box::new(move || {
            let Some(sheet) = sheet.upgrade() else {
                return;
            };
            let flush = {
                let mut state = sheet.lock().unwrap_or_else(PoisonError::into_inner);
                if !state.tracker.is_current(token) {
                    trace!("skipping superseded styles flush {}", token);
                    return;
                }
                state.take_flush()
            };
            if let Some((target, css)) = flush {
                target.set_text_content(&css);
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> StyleDescription {
        StyleDescription::new().set("color", "red")
    }

    fn sheet_with_ticks() -> (StyleSheet, TickScheduler) {
        let scheduler = TickScheduler::new();
        let sheet = StyleSheet::with_config(
            SheetConfig::default()
                .with_debug(false)
                .with_scheduler(scheduler.clone()),
        );
        (sheet, scheduler)
    }

    #[test]
    fn test_style_merges_descriptions() {
        let (sheet, _) = sheet_with_ticks();
        let merged = sheet
            .style([red(), StyleDescription::new().set("color", "blue")])
            .unwrap();
        let blue = sheet
            .style([StyleDescription::new().set("color", "blue")])
            .unwrap();
        assert_eq!(merged, blue);
    }

    #[test]
    fn test_style_skips_none_descriptions() {
        let (sheet, _) = sheet_with_ticks();
        let margin = StyleDescription::new().set("margin", 0);
        let sparse = sheet
            .style([Some(red()), None, None, Some(margin.clone())])
            .unwrap();
        let css = sheet.get_styles();

        assert_eq!(sparse, sheet.style([red(), margin]).unwrap());
        assert_eq!(sheet.get_styles(), css);
        assert_eq!(css, format!(".{}{{color:red;margin:0}}", sparse));
    }

    #[test]
    fn test_no_target_schedules_nothing() {
        let (sheet, scheduler) = sheet_with_ticks();
        sheet.style([red()]).unwrap();
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_burst_collapses_into_one_write() {
        let (sheet, scheduler) = sheet_with_ticks();
        let target = TextTarget::new();
        sheet.set_styles_target(Arc::new(target.clone()));

        let a = sheet.style([red()]).unwrap();
        let b = sheet
            .style([StyleDescription::new().set("margin", 0)])
            .unwrap();
        assert_eq!(target.text_content(), "");
        assert_eq!(scheduler.pending(), 2);

        scheduler.tick();
        assert_eq!(
            target.text_content(),
            format!(".{}{{color:red}}.{}{{margin:0}}", a, b)
        );
    }

    #[test]
    fn test_superseded_callback_does_not_write() {
        let (sheet, scheduler) = sheet_with_ticks();
        let target = TextTarget::new();
        sheet.set_styles_target(Arc::new(target.clone()));

        sheet.style([red()]).unwrap();
        sheet.force_render_styles();
        let rendered = target.text_content();

        target.set_text_content("untouched");
        scheduler.tick();
        assert_eq!(target.text_content(), "untouched");
        assert!(!rendered.is_empty());
    }

    #[test]
    fn test_unchanged_registration_schedules_nothing() {
        let (sheet, scheduler) = sheet_with_ticks();
        sheet.set_styles_target(Arc::new(TextTarget::new()));
        sheet.style([red()]).unwrap();
        scheduler.tick();

        sheet.style([red()]).unwrap();
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_set_target_flushes_and_clears_previous() {
        let (sheet, _) = sheet_with_ticks();
        let class = sheet.style([red()]).unwrap();

        let first = TextTarget::new();
        sheet.set_styles_target(Arc::new(first.clone()));
        assert_eq!(first.text_content(), format!(".{}{{color:red}}", class));

        let second = TextTarget::new();
        sheet.set_styles_target(Arc::new(second.clone()));
        assert_eq!(first.text_content(), "");
        assert_eq!(second.text_content(), format!(".{}{{color:red}}", class));
    }

    #[test]
    fn test_auto_generated_target() {
        let sheet = StyleSheet::with_config(
            SheetConfig::default()
                .with_debug(false)
                .with_auto_generate_target(true)
                .with_scheduler(ImmediateScheduler),
        );
        assert!(sheet.styles_target().is_none());

        let class = sheet.style([red()]).unwrap();
        let target = sheet.styles_target().unwrap();
        assert_eq!(target.text_content(), format!(".{}{{color:red}}", class));
    }

    #[test]
    fn test_raw_css_precedes_rules() {
        let (sheet, _) = sheet_with_ticks();
        let class = sheet.style([red()]).unwrap();
        sheet.css_raw("body{margin:0}");
        sheet.css_raw("");
        assert_eq!(
            sheet.get_styles(),
            format!("body{{margin:0}}.{}{{color:red}}", class)
        );
    }

    #[test]
    fn test_raw_css_triggers_flush() {
        let sheet = StyleSheet::with_config(
            SheetConfig::default().with_scheduler(ImmediateScheduler),
        );
        let target = TextTarget::new();
        sheet.set_styles_target(Arc::new(target.clone()));
        sheet.css_raw("a{color:red}");
        assert_eq!(target.text_content(), "a{color:red}");
    }

    #[test]
    fn test_reinit_empties_target() {
        let sheet = StyleSheet::with_config(
            SheetConfig::default()
                .with_debug(false)
                .with_scheduler(ImmediateScheduler),
        );
        let target = TextTarget::new();
        sheet.set_styles_target(Arc::new(target.clone()));
        sheet.style([red()]).unwrap();
        assert!(!target.text_content().is_empty());

        sheet.reinit();
        assert_eq!(sheet.get_styles(), "");
        assert_eq!(target.text_content(), "");
        assert_eq!(sheet.version(), 0);

        let class = sheet.style([red()]).unwrap();
        assert_eq!(target.text_content(), format!(".{}{{color:red}}", class));
    }

    #[test]
    fn test_stylesheet_debug_names() {
        let debug_sheet =
            StyleSheet::with_config(SheetConfig::default().with_debug(true));
        let plain_sheet =
            StyleSheet::with_config(SheetConfig::default().with_debug(false));

        let named = debug_sheet.stylesheet([("sample", red())]).unwrap();
        let plain = plain_sheet.stylesheet([("sample", red())]).unwrap();

        assert!(named["sample"].starts_with("sample_f"));
        assert!(plain["sample"].starts_with('f'));
    }

    #[test]
    fn test_keyframes_and_font_face() {
        let (sheet, _) = sheet_with_ticks();
        let name = sheet
            .keyframes(
                &KeyframesDescription::new()
                    .frame("from", red())
                    .frame("to", StyleDescription::new().set("color", "blue")),
            )
            .unwrap();
        sheet
            .font_face([StyleDescription::new().set("fontFamily", "Vera")])
            .unwrap();
        assert_eq!(
            sheet.get_styles(),
            format!(
                "@keyframes {}{{from{{color:red}}to{{color:blue}}}}@font-face{{font-family:Vera}}",
                name
            )
        );
    }

    #[test]
    fn test_rejected_font_face_leaves_target_in_sync() {
        let sheet = StyleSheet::with_config(
            SheetConfig::default().with_scheduler(ImmediateScheduler),
        );
        let target = TextTarget::new();
        sheet.set_styles_target(Arc::new(target.clone()));

        let err = sheet
            .font_face([
                StyleDescription::new().set("fontFamily", "Vera"),
                StyleDescription::new().nest("&:hover", red()),
            ])
            .unwrap_err();
        assert!(matches!(err, StyleError::UnexpectedNesting { .. }));
        assert_eq!(sheet.get_styles(), "");
        assert_eq!(target.text_content(), "");
        assert_eq!(sheet.version(), 0);
    }

    #[test]
    fn test_dropped_sheet_callback_is_noop() {
        let scheduler = TickScheduler::new();
        {
            let sheet = StyleSheet::with_config(
                SheetConfig::default()
                    .with_auto_generate_target(true)
                    .with_scheduler(scheduler.clone()),
            );
            sheet.style([red()]).unwrap();
        }
        assert_eq!(scheduler.tick(), 1);
    }
}
