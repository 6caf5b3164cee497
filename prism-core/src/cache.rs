/// Lazily populated name -> value memo
use std::cell::RefCell;
use std::collections::HashMap;

/// Calls `creator` the first time a key is requested and remembers the
/// result. Entries are never evicted.
pub struct MemoCache<V> {
    map: RefCell<HashMap<String, V>>,
}

impl<V: Clone> MemoCache<V> {
    pub fn new() -> Self {
        Self {
            map: RefCell::new(HashMap::new()),
        }
    }

    pub fn get_or_insert_with(&self, key: &str, creator: impl FnOnce(&str) -> V) -> V {
        if let Some(value) = self.map.borrow().get(key) {
            return value.clone();
        }
        let value = creator(key);
        self.map.borrow_mut().insert(key.to_string(), value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }
}

impl<V: Clone> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
