// src/crawl/frontier.rs
// =============================================================================
// The frontier remembers every URL the crawl has ever heard of.
//
// It keeps three things:
// - seen:    every URL ever admitted (fetched or not, success or failure)
// - pending: admitted URLs waiting for a worker (this is the WorkQueue)
// - done:    URLs whose fetch has been attempted and finished
//
// plus a budget: the maximum number of URLs that may ever be admitted,
// seeds included. Once the budget is spent, new links are quietly dropped.
// That is a normal way for a crawl to end, not an error.
//
// Many workers admit links at the same time, so "is it new? then add it"
// must happen as one step. Everything happens under a single Mutex, and the
// admitted URL is pushed onto the queue before the lock is released.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

use super::queue::WorkQueue;

pub struct Frontier {
    budget: usize,
    state: Mutex<FrontierState>,
    pending: WorkQueue,
}

#[derive(Default)]
struct FrontierState {
    seen: HashSet<Url>,
    done: HashSet<Url>,
}

impl Frontier {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            state: Mutex::new(FrontierState::default()),
            pending: WorkQueue::new(),
        }
    }

    // Admits the URLs we haven't seen before, as long as the budget allows
    //
    // Parameters:
    //   urls: candidate URLs (already resolved and filtered)
    //
    // Returns: the URLs that were actually admitted (and queued). A URL is
    //          admitted at most once over the whole crawl, no matter how many
    //          workers offer it.
    pub fn try_admit<I>(&self, urls: I) -> Vec<Url>
    where
        I: IntoIterator<Item = Url>,
    {
        let mut state = self.lock();
        let mut admitted = Vec::new();

        for url in urls {
            if state.seen.len() >= self.budget {
                break;
            }
            if state.seen.contains(&url) {
                continue;
            }

            state.seen.insert(url.clone());
            self.pending.put(url.clone());
            admitted.push(url);
        }

        admitted
    }

    // Records that a URL's fetch cycle is over (success or failure)
    pub fn mark_done(&self, url: &Url) {
        let mut state = self.lock();
        debug_assert!(state.seen.contains(url), "done URL was never admitted");
        state.done.insert(url.clone());
    }

    // True once nothing is waiting and every admitted URL has been done
    pub fn is_exhausted(&self) -> bool {
        let state = self.lock();
        self.pending.len() == 0 && state.done.len() == state.seen.len()
    }

    /// The shared queue of admitted-but-not-yet-fetched URLs.
    pub fn queue(&self) -> &WorkQueue {
        &self.pending
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Number of URLs admitted so far. Never exceeds the budget.
    pub fn discovered(&self) -> usize {
        self.lock().seen.len()
    }

    pub fn seen(&self) -> HashSet<Url> {
        self.lock().seen.clone()
    }

    pub fn done(&self) -> HashSet<Url> {
        self.lock().done.clone()
    }

    pub fn done_count(&self) -> usize {
        self.lock().done.len()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
