//! Shared Resource Guard - Reference-counted one-time injection.
//!
//! `acquire()` bumps a live counter and creates the resource on the 0→1
//! transition. Releasing the returned [`ResourceLease`] decrements it and
//! destroys the resource on 1→0. The node exists iff the counter is > 0.
//!
//! A lease releases at most once (explicitly or on drop), so a teardown
//! cascade that releases twice never under-counts.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

struct GuardState<R> {
    count: Cell<usize>,
    node: RefCell<Option<R>>,
    create: Box<dyn Fn() -> R>,
    destroy: Box<dyn Fn(R)>,
}

impl<R> GuardState<R> {
    fn acquire(&self) {
        let count = self.count.get() + 1;
        self.count.set(count);
        if count == 1 {
            let node = (self.create)();
            *self.node.borrow_mut() = Some(node);
            trace!("shared resource created");
        }
    }

    fn release(&self) {
        let count = self.count.get();
        if count == 0 {
            warn!("shared resource released with no live leases");
            return;
        }

        self.count.set(count - 1);
        if count == 1 {
            let node = self.node.borrow_mut().take();
            if let Some(node) = node {
                (self.destroy)(node);
                trace!("shared resource destroyed");
            }
        }
    }
}

/// Reference-counted gate around a lazily created shared resource.
pub struct SharedResourceGuard<R> {
    state: Rc<GuardState<R>>,
}

impl<R> Clone for SharedResourceGuard<R> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<R: 'static> SharedResourceGuard<R> {
    pub fn new(create: impl Fn() -> R + 'static, destroy: impl Fn(R) + 'static) -> Self {
        Self {
            state: Rc::new(GuardState {
                count: Cell::new(0),
                node: RefCell::new(None),
                create: Box::new(create),
                destroy: Box::new(destroy),
            }),
        }
    }

    /// Take a lease, creating the resource if this is the first one.
    pub fn acquire(&self) -> ResourceLease<R> {
        self.state.acquire();
        ResourceLease {
            state: Rc::clone(&self.state),
            released: Cell::new(false),
        }
    }

    /// Number of live leases.
    pub fn count(&self) -> usize {
        self.state.count.get()
    }

    /// Whether the resource currently exists.
    pub fn is_live(&self) -> bool {
        self.state.node.borrow().is_some()
    }

    /// Read the live resource, if any.
    pub fn with_node<T>(&self, f: impl FnOnce(Option<&R>) -> T) -> T {
        f(self.state.node.borrow().as_ref())
    }
}

/// One holder's claim on a [`SharedResourceGuard`].
pub struct ResourceLease<R> {
    state: Rc<GuardState<R>>,
    released: Cell<bool>,
}

impl<R> ResourceLease<R> {
    /// Give the claim back. Only the first call has an effect.
    pub fn release(&self) {
        if !self.released.replace(true) {
            self.state.release();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.get()
    }
}

impl<R> Drop for ResourceLease<R> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<R> fmt::Debug for ResourceLease<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLease")
            .field("released", &self.released.get())
            .field("live", &self.state.count.get())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
