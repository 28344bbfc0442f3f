//! Symbolizer warnings with colored terminal output.
//!
//! Style resolution silently falls back to defaults for unmapped or
//! malformed input. These warnings make the fallback visible once per unique
//! message instead of once per feature per frame.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about defaulted or ignored input (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Style", "unmapped property 'marker-fill' for POINT");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[Carto {component}] ⚠ {message}").yellow());
    }
}

/// Clear all recorded warnings (call when loading a new scene)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(key: &str) -> bool {
        WARNED
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|set| set.contains(key))
    }

    #[test]
    fn test_warn_once_records_message() {
        warn_once("Test", "recorded message");
        warn_once("Test", "recorded message");
        assert!(recorded("[Test] recorded message"));
        assert!(!recorded("[Test] never emitted"));
    }
}
