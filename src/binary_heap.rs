use std::cmp::Ordering;
use std::mem;

use crate::alloc::{ArrayAllocator, SystemAllocator};
use crate::config::HeapConfig;
use crate::element::{CompareFn, Element};
use crate::fatal::fatal;
use crate::index_map::IndexMap;

/// An array-backed binary min-heap ordered by a caller-supplied comparator.
///
/// In direct mode every element carries a unique key and the heap keeps a
/// key -> slot index, so elements can be updated or removed by key in
/// O(log n). Broken preconditions (empty heap, duplicate or unknown key)
/// are fatal; check [`is_empty`](Self::is_empty) or
/// [`contains_key`](Self::contains_key) first.
///
/// The heap owns the `T` values it stores. To keep payload lifetime with
/// the caller, store a non-owning handle (an id, a reference or an `Arc`).
#[derive(Debug)]
pub struct BinaryHeap<T, A: ArrayAllocator = SystemAllocator> {
    /// The heap storage. `elems.len()` is the element count.
    elems: Vec<Element<T>>,
    compare: CompareFn<T>,
    /// Maps keys -> index in `elems`. Only present in direct mode.
    index: Option<IndexMap>,
    alloc: A,
}

impl<T> BinaryHeap<T> {
    /// Creates an empty heap without a key index.
    pub fn new(compare: CompareFn<T>) -> Self {
        Self::with_config(compare, HeapConfig::default(), SystemAllocator)
    }

    /// Creates an empty heap in direct mode.
    pub fn new_direct(compare: CompareFn<T>) -> Self {
        Self::with_config(compare, HeapConfig::default().direct(true), SystemAllocator)
    }
}

impl<T, A: ArrayAllocator> BinaryHeap<T, A> {
    /// Creates an empty heap that grows its array through `alloc`.
    pub fn with_config(compare: CompareFn<T>, config: HeapConfig, alloc: A) -> Self {
        let mut heap = Self {
            elems: Vec::new(),
            compare,
            index: config
                .direct
                .then(|| IndexMap::with_capacity(config.index_capacity)),
            alloc,
        };
        if config.initial_capacity > 0 {
            heap.grow_to(config.initial_capacity);
        }
        heap
    }

    /// Releases the array and the key index. Stored `T` values are dropped
    /// with them; a handle payload leaves whatever it refers to untouched.
    pub fn destroy(self) {
        log::trace!(
            "destroying heap with {} elements, capacity {}",
            self.elems.len(),
            self.elems.capacity()
        );
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Returns the number of element slots allocated.
    pub fn capacity(&self) -> usize {
        self.elems.capacity()
    }

    /// Returns `true` if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Returns `true` if the heap maintains a key index.
    pub fn is_direct(&self) -> bool {
        self.index.is_some()
    }

    /// Returns the ordering function the heap was created with.
    pub fn compare(&self) -> CompareFn<T> {
        self.compare
    }

    /// Returns `true` if a direct heap holds an element with `key`.
    /// Always `false` for a heap without a key index.
    pub fn contains_key(&self, key: u64) -> bool {
        self.index.as_ref().map_or(false, |index| index.get(key).is_some())
    }

    /// Looks up an element by key. Always `None` outside direct mode.
    pub fn get_direct(&self, key: u64) -> Option<&Element<T>> {
        let pos = self.index.as_ref()?.get(key)?;
        self.elems.get(pos)
    }

    /// Iterates over the elements in array order (not sorted order).
    pub fn iter(&self) -> std::slice::Iter<'_, Element<T>> {
        self.elems.iter()
    }

    /// Returns the minimum element without removing it.
    ///
    /// Fatal if the heap is empty.
    pub fn peek_min(&self) -> &Element<T> {
        match self.elems.first() {
            Some(elem) => elem,
            None => fatal!("cannot peek the minimum of an empty heap"),
        }
    }

    /// Adds `elem` to the heap.
    ///
    /// Fatal if the heap is in direct mode and already holds `elem.key`.
    pub fn insert(&mut self, elem: Element<T>) {
        if self.contains_key(elem.key) {
            fatal!("cannot insert duplicate key {} into a direct heap", elem.key);
        }
        if self.elems.len() == self.elems.capacity() {
            let capacity = self.alloc.next_capacity(self.elems.capacity());
            self.grow_to(capacity);
        }

        let last = self.elems.len();
        self.elems.push(elem);
        let pos = self.sift_up(last);
        self.fixup_direct_index(last, pos);
    }

    /// Removes and returns the minimum element.
    ///
    /// Fatal if the heap is empty.
    pub fn remove_min(&mut self) -> Element<T> {
        if self.elems.is_empty() {
            fatal!("cannot remove the minimum of an empty heap");
        }
        if let Some(index) = &mut self.index {
            index.remove(self.elems[0].key);
        }

        // Moves the last element into the root
        let min = self.elems.swap_remove(0);
        if !self.elems.is_empty() {
            let pos = self.sift_down(0);
            self.fixup_direct_index(0, pos);
        }
        min
    }

    /// Replaces the element stored under `elem.key` and restores heap order.
    /// Returns the element that was replaced, so the caller can dispose of
    /// the old payload.
    ///
    /// Fatal if the heap is not in direct mode or `elem.key` is unknown.
    pub fn update_direct(&mut self, elem: Element<T>) -> Element<T> {
        let pos = self.direct_slot("update", elem.key);
        let old = mem::replace(&mut self.elems[pos], elem);
        self.restore(pos);
        old
    }

    /// Removes and returns the element stored under `key`.
    ///
    /// Fatal if the heap is not in direct mode or `key` is unknown.
    pub fn remove_direct(&mut self, key: u64) -> Element<T> {
        let pos = self.direct_slot("remove", key);
        if let Some(index) = &mut self.index {
            index.remove(key);
        }

        // Fills the hole with the last element unless the hole is the last slot
        let removed = self.elems.swap_remove(pos);
        if pos < self.elems.len() {
            self.restore(pos);
        }
        removed
    }

    /// Removes every element. Capacity is kept for reuse.
    pub fn clear(&mut self) {
        self.elems.clear();
        if let Some(index) = &mut self.index {
            index.clear();
        }
    }

    fn direct_slot(&self, op: &str, key: u64) -> usize {
        let index = match &self.index {
            Some(index) => index,
            None => fatal!("cannot {} key {}: heap is not in direct mode", op, key),
        };
        match index.get(key) {
            Some(pos) => pos,
            None => fatal!("cannot {} key {}: no such key in direct heap", op, key),
        }
    }

    fn grow_to(&mut self, capacity: usize) {
        let additional = capacity.saturating_sub(self.elems.len());
        log::trace!(
            "growing heap array from {} to {} slots",
            self.elems.capacity(),
            capacity
        );
        if let Err(e) = self.alloc.reserve(&mut self.elems, additional) {
            fatal!("cannot grow heap array to {} slots: {:#}", capacity, e);
        }
    }

    /// Puts the element at `pos` back in order, trying upward first and
    /// downward only if it did not move up.
    fn restore(&mut self, pos: usize) {
        let mut new_pos = self.sift_up(pos);
        if new_pos == pos {
            new_pos = self.sift_down(pos);
        }
        self.fixup_direct_index(pos, new_pos);
    }

    /// Registers the element that was placed at `placed` and came to rest
    /// at `rested`. Swaps keep the index current, so only an element that
    /// never moved needs an explicit entry.
    fn fixup_direct_index(&mut self, placed: usize, rested: usize) {
        if placed != rested {
            return;
        }
        if let Some(index) = &mut self.index {
            index.set(self.elems[rested].key, rested);
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.elems.swap(a, b);
        if let Some(index) = &mut self.index {
            index.set(self.elems[a].key, a);
            index.set(self.elems[b].key, b);
        }
    }

    // Helper: bubble up from `pos` while the parent compares greater.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if (self.compare)(&self.elems[parent], &self.elems[pos]) != Ordering::Greater {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    // Helper: bubble down from `pos` while the smaller child compares less.
    // Equal children favour the left one.
    fn sift_down(&mut self, mut pos: usize) -> usize {
        let len = self.elems.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len
                && (self.compare)(&self.elems[left], &self.elems[right]) == Ordering::Greater
            {
                right
            } else {
                left
            };

            if (self.compare)(&self.elems[pos], &self.elems[child]) != Ordering::Greater {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
        pos
    }
}

impl<'a, T, A: ArrayAllocator> IntoIterator for &'a BinaryHeap<T, A> {
    type Item = &'a Element<T>;
    type IntoIter = std::slice::Iter<'a, Element<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
