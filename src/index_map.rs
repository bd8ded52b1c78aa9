use std::collections::HashMap;

use crate::fatal::fatal;

/// Default bucket hint for a direct heap's key index.
pub const DEFAULT_INDEX_CAPACITY: usize = 512;

/// Maps element keys to their current slot in the heap array.
///
/// Pure bookkeeping: the heap keeps it in step with every move and never
/// consults it to make ordering decisions.
#[derive(Debug, Default)]
pub struct IndexMap {
    slots: HashMap<u64, usize>,
}

impl IndexMap {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = HashMap::new();
        if let Err(e) = slots.try_reserve(capacity) {
            fatal!("cannot allocate key index for {} entries: {}", capacity, e);
        }
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, key: u64) -> Option<usize> {
        self.slots.get(&key).copied()
    }

    /// Points `key` at `index`, returning the slot it pointed at before.
    pub fn set(&mut self, key: u64, index: usize) -> Option<usize> {
        if self.slots.len() == self.slots.capacity() && !self.slots.contains_key(&key) {
            if let Err(e) = self.slots.try_reserve(1) {
                fatal!("cannot grow key index past {} entries: {}", self.slots.len(), e);
            }
        }
        self.slots.insert(key, index)
    }

    pub fn remove(&mut self, key: u64) -> Option<usize> {
        self.slots.remove(&key)
    }

    /// Drops every entry but keeps the buckets.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
