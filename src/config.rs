use std::time::Duration;

use crate::index_map::DEFAULT_INDEX_CAPACITY;

/// Construction options for a [`BinaryHeap`](crate::BinaryHeap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    /// Maintain a key -> slot index so elements can be updated or removed by key.
    pub direct: bool,
    /// Number of element slots to allocate up front. Zero defers allocation
    /// to the first insert.
    pub initial_capacity: usize,
    /// Bucket hint for the key index. Ignored unless `direct` is set.
    pub index_capacity: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            direct: false,
            initial_capacity: 0,
            index_capacity: DEFAULT_INDEX_CAPACITY,
        }
    }
}

impl HeapConfig {
    pub fn direct(mut self, direct: bool) -> Self {
        self.direct = direct;
        self
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn index_capacity(mut self, capacity: usize) -> Self {
        self.index_capacity = capacity;
        self
    }
}

/// Tuning for a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Delay before an item whose poll failed is tried again.
    pub retry_delay: Duration,
    /// How long the run loop sleeps when nothing is scheduled.
    pub idle_wait: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(30),
            idle_wait: Duration::from_secs(1),
        }
    }
}
