//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer and tree builder to report internal-consistency
//! alarms that are not HTML parse errors.

use std::collections::HashSet;
use std::sync::Mutex;

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unexpected condition (prints once per unique message).
///
/// Every call is forwarded to `log::warn!`; only the first occurrence of a
/// given `(component, message)` pair is also written to stderr.
///
/// # Example
/// ```ignore
/// warn_once("Tree Builder", "token reprocessed more than 32 times; dropping it");
/// ```
pub fn warn_once(component: &str, message: &str) {
    log::warn!(target: "wombat", "[{component}] {message}");

    let key = format!("[{component}] {message}");
    // A poisoned lock only means another thread panicked mid-insert; the set
    // itself is still usable.
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let should_print = guard.get_or_insert_with(HashSet::new).insert(key);

    if should_print {
        eprintln!("{}", format!("[Wombat {component}] ⚠ {message}").yellow());
    }
}

/// Returns true if a warning with this component and message was already printed.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call when starting a new parse session).
pub fn clear_warnings() {
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
