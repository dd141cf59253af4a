//! Keyed Debounce - Coalesce bursty per-key updates.
//!
//! `call(key, value)` records the latest value for `key` and queues one flush
//! on a [`TurnQueue`]. When the queue drains, the effect runs once per key
//! that was touched, with that key's latest value. Cross-key order is
//! unspecified.
//!
//! Used to mirror high-frequency panel add/remove events (e.g. during bulk
//! layout restoration) into the panel open-state table without redundant
//! writes.
//!
//! # Cancellation
//!
//! A queued flush is bound to the epoch it was scheduled in. [`KeyedDebounce::cancel`]
//! and [`KeyedDebounce::flush_now`] advance the epoch, so a stale queued flush
//! becomes a no-op. Dropping the last handle also disarms it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::scheduler::TurnQueue;

struct DebounceState<K, V> {
    queue: TurnQueue,
    pending: RefCell<HashMap<K, V>>,
    scheduled: Cell<bool>,
    epoch: Cell<u64>,
    cancelled: Cell<bool>,
    effect: Box<dyn Fn(K, V)>,
}

impl<K: Eq + Hash + 'static, V: 'static> DebounceState<K, V> {
    fn flush(&self) {
        self.scheduled.set(false);
        self.epoch.set(self.epoch.get() + 1);
        if self.cancelled.get() {
            return;
        }

        let batch: Vec<(K, V)> = self.pending.borrow_mut().drain().collect();
        trace!(keys = batch.len(), "keyed debounce flush");
        for (key, value) in batch {
            (self.effect)(key, value);
        }
    }
}

/// Per-key latest-value-wins debounce.
pub struct KeyedDebounce<K, V> {
    state: Rc<DebounceState<K, V>>,
}

impl<K, V> Clone for KeyedDebounce<K, V> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<K: Eq + Hash + 'static, V: 'static> KeyedDebounce<K, V> {
    /// Create a debounce that flushes on `queue` and applies `effect`.
    pub fn new(queue: TurnQueue, effect: impl Fn(K, V) + 'static) -> Self {
        Self {
            state: Rc::new(DebounceState {
                queue,
                pending: RefCell::new(HashMap::new()),
                scheduled: Cell::new(false),
                epoch: Cell::new(0),
                cancelled: Cell::new(false),
                effect: Box::new(effect),
            }),
        }
    }

    /// Record `value` as the latest for `key` and make sure a flush is queued.
    ///
    /// Ignored after [`cancel`](Self::cancel).
    pub fn call(&self, key: K, value: V) {
        let state = &self.state;
        if state.cancelled.get() {
            return;
        }

        state.pending.borrow_mut().insert(key, value);

        if !state.scheduled.replace(true) {
            let epoch = state.epoch.get();
            let weak: Weak<DebounceState<K, V>> = Rc::downgrade(state);
            state.queue.schedule(move || {
                if let Some(state) = weak.upgrade() {
                    if state.epoch.get() == epoch {
                        state.flush();
                    }
                }
            });
        }
    }

    /// Apply pending entries immediately instead of waiting for the queue.
    pub fn flush_now(&self) {
        self.state.flush();
    }

    /// Drop pending entries, disarm the queued flush, and ignore future calls.
    pub fn cancel(&self) {
        let state = &self.state;
        state.cancelled.set(true);
        state.scheduled.set(false);
        state.epoch.set(state.epoch.get() + 1);
        state.pending.borrow_mut().clear();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Number of keys waiting for the next flush.
    pub fn pending_len(&self) -> usize {
        self.state.pending.borrow().len()
    }
}

// =============================================================================
// Tests
// =============================================================================
