//! Per-transport callback table.
//!
//! Holds at most one callback per event name. Registering a name again
//! replaces the previous callback; there is no fan-out.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::SocketEvent;

/// Callback invoked with each event dispatched under its name.
pub type Callback = Arc<dyn Fn(&SocketEvent) + Send + Sync>;

/// Event name → callback map for one transport.
#[derive(Default)]
pub struct Listeners {
    callbacks: HashMap<String, Callback>,
}

impl Listeners {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `name`. Returns `true` if it replaced an
    /// existing callback.
    pub fn insert(&mut self, name: String, callback: Callback) -> bool {
        self.callbacks.insert(name, callback).is_some()
    }

    /// Removes the callback for `name`. Returns `true` if one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.callbacks.remove(name).is_some()
    }

    /// Returns the callback registered for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Callback> {
        self.callbacks.get(name).map(Arc::clone)
    }

    /// Returns `true` if a callback is registered for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    /// Returns the number of registered event names.
    #[must_use]
    pub fn count(&self) -> usize {
        self.callbacks.len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.callbacks.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Listeners").field("events", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, Callback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let callback: Callback = Arc::new(move |_: &SocketEvent| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (hits, callback)
    }

    #[test]
    fn empty_has_nothing() {
        let listeners = Listeners::new();
        assert!(!listeners.contains("connect"));
        assert!(listeners.get("connect").is_none());
        assert_eq!(listeners.count(), 0);
    }

    #[test]
    fn second_insert_replaces_first() {
        let mut listeners = Listeners::new();
        let (first_hits, first) = counter();
        let (second_hits, second) = counter();

        assert!(!listeners.insert("x".to_string(), first));
        assert!(listeners.insert("x".to_string(), second));
        assert_eq!(listeners.count(), 1);

        if let Some(callback) = listeners.get("x") {
            callback(&SocketEvent::ReconnectFailed { attempts: 0 });
        }
        assert_eq!(first_hits.load(Ordering::SeqCst), 0);
        assert_eq!(second_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_is_a_noop_when_absent() {
        let mut listeners = Listeners::new();
        assert!(!listeners.remove("missing"));
        let (_, callback) = counter();
        listeners.insert("x".to_string(), callback);
        assert!(listeners.remove("x"));
        assert!(!listeners.contains("x"));
    }

    #[test]
    fn debug_lists_names() {
        let mut listeners = Listeners::new();
        let (_, callback) = counter();
        listeners.insert("b".to_string(), Arc::clone(&callback));
        listeners.insert("a".to_string(), callback);
        assert_eq!(format!("{listeners:?}"), r#"Listeners { events: ["a", "b"] }"#);
    }
}
