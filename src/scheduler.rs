use std::cmp::Ordering;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio::time::{self, Instant};

use crate::alloc::SystemAllocator;
use crate::binary_heap::BinaryHeap;
use crate::config::{HeapConfig, SchedulerConfig};
use crate::element::Element;

/// Drives items through a direct heap keyed by item id and ordered by due
/// time. The heap itself is unsynchronised, so every access goes through
/// the scheduler's lock.
pub struct Scheduler {
    queue: Mutex<Queue>,
    poller: Arc<dyn Poller + Send + Sync>,
    changed: Notify,
    config: SchedulerConfig,
}

struct Queue {
    heap: BinaryHeap<Instant>,
    /// Items taken out of the heap by `run_due` and not yet put back.
    polling: HashSet<u64>,
    /// Polling items that must not be put back.
    cancelled: HashSet<u64>,
}

/// Ties on due time go to the lower id so polling order is deterministic.
fn by_due_time(a: &Element<Instant>, b: &Element<Instant>) -> Ordering {
    a.data.cmp(&b.data).then(a.key.cmp(&b.key))
}

impl Scheduler {
    pub fn new(poller: impl Poller + Send + Sync + 'static, config: SchedulerConfig) -> Self {
        Self {
            queue: Mutex::new(Queue {
                heap: BinaryHeap::with_config(
                    by_due_time,
                    HeapConfig::default().direct(true),
                    SystemAllocator,
                ),
                polling: HashSet::new(),
                cancelled: HashSet::new(),
            }),
            poller: Arc::new(poller),
            changed: Notify::new(),
            config,
        }
    }

    /// Makes `id` due after `delay`, whether or not it is already scheduled.
    pub async fn schedule(&self, id: u64, delay: Duration) {
        let elem = Element::new(id, Instant::now() + delay);
        {
            let mut queue = self.queue.lock().await;
            queue.cancelled.remove(&id);
            if queue.heap.contains_key(id) {
                queue.heap.update_direct(elem);
            } else {
                queue.heap.insert(elem);
            }
        }
        log::debug!("scheduled item {} in {:?}", id, delay);
        self.changed.notify_one();
    }

    /// Moves an already scheduled item. Returns `false` if `id` is not in
    /// the schedule, including while it is being polled.
    pub async fn reschedule(&self, id: u64, delay: Duration) -> bool {
        let elem = Element::new(id, Instant::now() + delay);
        {
            let mut queue = self.queue.lock().await;
            if !queue.heap.contains_key(id) {
                return false;
            }
            queue.heap.update_direct(elem);
        }
        log::debug!("rescheduled item {} in {:?}", id, delay);
        self.changed.notify_one();
        true
    }

    /// Drops an item from the schedule. An item that is being polled right
    /// now is not scheduled again once its poll finishes. Returns `false` if
    /// `id` is unknown or already cancelled.
    pub async fn cancel(&self, id: u64) -> bool {
        {
            let mut queue = self.queue.lock().await;
            if queue.heap.contains_key(id) {
                queue.heap.remove_direct(id);
            } else if !queue.polling.contains(&id) || !queue.cancelled.insert(id) {
                return false;
            }
        }
        log::debug!("cancelled item {}", id);
        self.changed.notify_one();
        true
    }

    /// Returns the item that is due first and when.
    pub async fn next_due(&self) -> Option<(u64, Instant)> {
        let queue = self.queue.lock().await;
        if queue.heap.is_empty() {
            return None;
        }
        let next = queue.heap.peek_min();
        Some((next.key, next.data))
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.heap.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.heap.is_empty()
    }

    /// Polls every item due at or before `now` and schedules each one again.
    /// Returns the number of items polled.
    pub async fn run_due(&self, now: Instant) -> usize {
        let mut due = Vec::new();
        {
            let mut queue = self.queue.lock().await;
            while !queue.heap.is_empty() && queue.heap.peek_min().data <= now {
                let id = queue.heap.remove_min().key;
                queue.polling.insert(id);
                due.push(id);
            }
        }

        for &id in &due {
            let delay = match self.poller.poll(id).await {
                Ok(delay) => delay,
                Err(e) => {
                    log::warn!(
                        "polling item {} failed, retrying in {:?}: {:#}",
                        id,
                        self.config.retry_delay,
                        e
                    );
                    self.config.retry_delay
                }
            };

            let mut queue = self.queue.lock().await;
            queue.polling.remove(&id);
            if queue.cancelled.remove(&id) {
                log::debug!("dropping item {} cancelled while polling", id);
                continue;
            }
            // Scheduled again while it was being polled
            if !queue.heap.contains_key(id) {
                queue.heap.insert(Element::new(id, now + delay));
            }
        }
        due.len()
    }

    /// Polls items as they fall due until `shutdown` completes.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        loop {
            let wake = match self.next_due().await {
                Some((_, due)) => due,
                None => Instant::now() + self.config.idle_wait,
            };

            tokio::select! {
                _ = &mut shutdown => {
                    log::debug!("scheduler stopping with {} items queued", self.len().await);
                    return;
                }
                _ = time::sleep_until(wake) => {
                    let polled = self.run_due(Instant::now()).await;
                    log::trace!("polled {} items", polled);
                }
                _ = self.changed.notified() => {}
            }
        }
    }
}

/// Performs the work for a scheduled item.
#[async_trait]
pub trait Poller {
    /// Polls item `id`, returning how long until it is due again.
    async fn poll(&self, id: u64) -> anyhow::Result<Duration>;
}
