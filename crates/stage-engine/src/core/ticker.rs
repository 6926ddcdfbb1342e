//! Ordered registry of per-frame callbacks.
//!
//! Owners add a callback when they start needing frame updates and remove it
//! when they stop. The update loop takes a `snapshot` and runs the entries in
//! registration order, so callbacks may add or remove entries while it runs.

#[derive(Debug)]
pub struct Ticker<K, F> {
    entries: Vec<(K, F)>,
}

impl<K: Copy + PartialEq, F: Copy> Ticker<K, F> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a callback for `key`. A key holds at most one callback;
    /// re-adding replaces it and moves it to the back of the order.
    pub fn add(&mut self, key: K, callback: F) {
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, callback));
    }

    /// Deregister the callback for `key`. Returns whether one was present.
    pub fn remove(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    pub fn contains(&self, key: K) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Current entries in registration order.
    pub fn snapshot(&self) -> Vec<(K, F)> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy + PartialEq, F: Copy> Default for Ticker<K, F> {
    fn default() -> Self {
        Self::new()
    }
}
