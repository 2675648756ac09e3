//! Debug-mode detection for readable class names.
//!
//! In debug mode, `$debugName` prefixes generated class and animation names
//! (`button_f1x2y3`). Outside it, names are bare hashes.
//!
//! # Auto Detection
//!
//! [`DebugMode::Auto`] (the default) reads the process environment: debug
//! mode is on unless `NODE_ENV` is `production`, and `TYPESTYLE_ENV=debug`
//! forces it on regardless.
//!
//! Use [`set_debug_mode_detector`] to override detection in tests:
//!
//! ```rust
//! use standout_css::{detect_debug_mode, set_debug_mode_detector, DebugMode};
//!
//! set_debug_mode_detector(|| DebugMode::Off);
//! assert!(!detect_debug_mode());
//! # set_debug_mode_detector(|| DebugMode::Auto);
//! ```

use once_cell::sync::Lazy;
use std::sync::{Mutex, PoisonError};

/// How debug naming is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    On,
    Off,
    /// Read `NODE_ENV` and `TYPESTYLE_ENV` from the environment.
    Auto,
}

type DebugModeDetector = fn() -> DebugMode;

static DEBUG_MODE_DETECTOR: Lazy<Mutex<DebugModeDetector>> =
    Lazy::new(|| Mutex::new(default_debug_mode_detector));

/// Overrides the detector consulted by [`detect_debug_mode`].
pub fn set_debug_mode_detector(detector: DebugModeDetector) {
    let mut guard = DEBUG_MODE_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Resolves the current debug mode to on or off.
pub fn detect_debug_mode() -> bool {
    let detector = *DEBUG_MODE_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    match detector() {
        DebugMode::On => true,
        DebugMode::Off => false,
        DebugMode::Auto => is_debug_mode(|name| std::env::var(name).ok()),
    }
}

/// Applies the environment rule to an arbitrary variable lookup.
///
/// ```rust
/// use standout_css::is_debug_mode;
///
/// assert!(is_debug_mode(|_| None));
/// assert!(!is_debug_mode(|name| (name == "NODE_ENV").then(|| "production".to_string())));
/// ```
pub fn is_debug_mode<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let production = lookup("NODE_ENV").as_deref() == Some("production");
    let forced = lookup("TYPESTYLE_ENV").as_deref() == Some("debug");
    !production || forced
}

fn default_debug_mode_detector() -> DebugMode {
    DebugMode::Auto
}
