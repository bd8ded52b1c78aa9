use std::cmp::Ordering;

/// An entry stored in a [`BinaryHeap`](crate::BinaryHeap).
///
/// `key` only matters for heaps in direct mode, where it must be unique.
/// `data` is the caller's payload; the heap moves it around but never looks
/// inside it except through the comparator. An `Element` owns its `data`,
/// so a payload whose lifetime the caller manages should be a handle such as
/// an id, a reference or an `Arc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<T> {
    pub key: u64,
    pub data: T,
}

impl<T> Element<T> {
    pub fn new(key: u64, data: T) -> Self {
        Self { key, data }
    }
}

/// Three-way ordering over two elements. The smaller element sits at the root.
pub type CompareFn<T> = fn(&Element<T>, &Element<T>) -> Ordering;
