//! A binary min-heap with direct key-indexed update and removal, and an
//! async scheduling loop built on it.

mod fatal;

pub mod alloc;
pub mod binary_heap;
pub mod config;
pub mod element;
pub mod index_map;
pub mod scheduler;

pub use crate::alloc::{ArrayAllocator, SystemAllocator};
pub use binary_heap::BinaryHeap;
pub use config::{HeapConfig, SchedulerConfig};
pub use element::{CompareFn, Element};
pub use scheduler::{Poller, Scheduler};
