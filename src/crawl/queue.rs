// src/crawl/queue.rs
// =============================================================================
// The shared work queue that all workers pull URLs from.
//
// It is more than a channel: besides holding the URLs waiting to be fetched,
// it counts how many URLs have been put in but not yet *finished*. A URL
// stays "unfinished" from the moment it is queued until the worker that took
// it is completely done with it (fetch, parse, admitting its links...).
//
// Why not just wait for the queue to be empty?
// - Workers put new URLs back into the queue while they work
// - So the queue can be empty for a moment while a worker is still about to
//   add twenty more links
// - Only "empty AND every taken item acknowledged" means the crawl is over
//
// Acknowledging is automatic: every WorkItem carries an Ack guard, and when
// the item is dropped (success, error, early return or even a panic) the
// guard tells the queue the item is finished. Nobody can forget.
//
// Rust concepts:
// - Drop: code that runs when a value goes out of scope (RAII guards)
// - tokio::sync::Notify: wakes up workers waiting for new items
// - tokio::sync::watch: lets join() sleep until the unfinished count hits 0
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{watch, Notify};
use tokio_util::sync::CancellationToken;
use url::Url;

pub struct WorkQueue {
    items: Mutex<VecDeque<Url>>,
    item_ready: Notify,
    unfinished: watch::Sender<usize>,
}

// A URL taken from the queue, plus the promise to acknowledge it
pub struct WorkItem<'a> {
    pub url: Url,
    _ack: Ack<'a>,
}

struct Ack<'a> {
    queue: &'a WorkQueue,
}

impl Drop for Ack<'_> {
    fn drop(&mut self) {
        self.queue.task_done();
    }
}

impl WorkQueue {
    pub fn new() -> Self {
        let (unfinished, _) = watch::channel(0);
        Self {
            items: Mutex::new(VecDeque::new()),
            item_ready: Notify::new(),
            unfinished,
        }
    }

    // Adds a URL to the back of the queue and wakes one waiting worker
    pub fn put(&self, url: Url) {
        // Count it before anyone can take it, so an ack can never arrive
        // before the matching increment
        self.unfinished.send_modify(|n| *n += 1);
        self.lock().push_back(url);
        self.item_ready.notify_one();
    }

    // Takes the next URL, waiting if the queue is empty
    //
    // Returns None once `cancel` fires. Cancellation is only noticed here,
    // between items, never in the middle of processing one.
    pub async fn get(&self, cancel: &CancellationToken) -> Option<WorkItem<'_>> {
        loop {
            if cancel.is_cancelled() {
                return None;
            }

            if let Some(url) = self.pop() {
                return Some(WorkItem {
                    url,
                    _ack: Ack { queue: self },
                });
            }

            tokio::select! {
                _ = self.item_ready.notified() => {}
                _ = cancel.cancelled() => return None,
            }
        }
    }

    // Waits until every URL ever put has been taken AND acknowledged
    pub async fn join(&self) {
        let mut unfinished = self.unfinished.subscribe();
        // The sender lives in self, so the channel can't close while we wait
        let _ = unfinished.wait_for(|n| *n == 0).await;
    }

    /// Number of URLs waiting to be taken.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Number of URLs put but not yet acknowledged (waiting + in progress).
    #[cfg(test)]
    pub fn unfinished(&self) -> usize {
        *self.unfinished.borrow()
    }

    fn pop(&self) -> Option<Url> {
        let mut items = self.lock();
        let url = items.pop_front();

        // notify_one only stores a single permit, so pass the wake-up along
        // while there is still work for other idle workers
        if url.is_some() && !items.is_empty() {
            self.item_ready.notify_one();
        }
        url
    }

    fn task_done(&self) {
        self.unfinished.send_modify(|n| {
            debug_assert!(*n > 0, "task_done called more times than put");
            *n = n.saturating_sub(1);
        });
    }

    // The queue's invariants hold between statements, so a panic in another
    // thread while holding the lock leaves nothing half-written
    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Url>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}
