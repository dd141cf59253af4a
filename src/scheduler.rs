//! Scheduler - Explicit scheduling-turn boundaries.
//!
//! The reactive layer is single-threaded and cooperative. Work that must run
//! "at the end of the current turn" (debounce flushes) is queued on a
//! [`TurnQueue`] and executed when the host drains it:
//!
//! - [`end_turn`] drains the microtask queue. Tasks queued while draining run
//!   in the same drain, like a microtask checkpoint.
//! - [`end_frame`] runs the frame tasks that were queued before the call.
//!   Tasks queued during the frame wait for the next one. It then ends the turn.
//!
//! Which queue a consumer uses is a [`FlushPolicy`] choice made in props.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

/// Deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Flush granularity for deferred work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Flush at the end of the current scheduling turn.
    #[default]
    Microtask,
    /// Flush on the next frame boundary.
    Frame,
}

// =============================================================================
// TurnQueue
// =============================================================================

/// A FIFO of deferred tasks drained at a policy-specific boundary.
#[derive(Clone)]
pub struct TurnQueue {
    policy: FlushPolicy,
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl TurnQueue {
    pub fn new(policy: FlushPolicy) -> Self {
        Self {
            policy,
            tasks: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Queue a task for the next drain.
    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Drop every queued task without running it.
    pub fn clear(&self) {
        self.tasks.borrow_mut().clear();
    }

    /// Run queued tasks according to the policy. Returns how many ran.
    pub fn drain(&self) -> usize {
        let budget = match self.policy {
            FlushPolicy::Microtask => usize::MAX,
            FlushPolicy::Frame => self.pending(),
        };

        let mut ran = 0;
        while ran < budget {
            // Pop before running so tasks can schedule more work.
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }

        if ran > 0 {
            trace!(policy = ?self.policy, ran, "turn queue drained");
        }
        ran
    }
}

// =============================================================================
// Thread-wide Queues
// =============================================================================

thread_local! {
    static MICROTASKS: TurnQueue = TurnQueue::new(FlushPolicy::Microtask);
    static FRAMES: TurnQueue = TurnQueue::new(FlushPolicy::Frame);
}

/// The thread-wide queue for `policy`.
pub fn queue_for(policy: FlushPolicy) -> TurnQueue {
    match policy {
        FlushPolicy::Microtask => MICROTASKS.with(|q| q.clone()),
        FlushPolicy::Frame => FRAMES.with(|q| q.clone()),
    }
}

/// End the current scheduling turn: run every pending microtask.
pub fn end_turn() -> usize {
    queue_for(FlushPolicy::Microtask).drain()
}

/// End the current frame: run pending frame tasks, then end the turn.
pub fn end_frame() -> usize {
    let ran = queue_for(FlushPolicy::Frame).drain();
    ran + end_turn()
}

/// Drop all pending work on this thread (for testing).
pub fn reset_scheduler() {
    MICROTASKS.with(|q| q.clear());
    FRAMES.with(|q| q.clear());
}

// =============================================================================
// Tests
// =============================================================================
