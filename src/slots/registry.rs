//! Slot Registry - Ordered, identity-keyed set of engine-created fragments.
//!
//! Factory adapters register one entry per engine part; the root outlet reads
//! the published list and mounts each entry. The plain store is the source of
//! truth. Every mutation republishes a snapshot into a signal so mutators never
//! read (and therefore never subscribe to) the reactive side.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::trace;

use crate::types::{Cleanup, SlotId};

/// Mounts one slot fragment and returns its cleanup.
pub type SlotRenderer = Rc<dyn Fn() -> Cleanup>;

/// One registered fragment.
#[derive(Clone)]
pub struct SlotEntry {
    id: SlotId,
    render: SlotRenderer,
}

impl SlotEntry {
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Mount the fragment.
    pub fn render(&self) -> Cleanup {
        (self.render)()
    }
}

impl PartialEq for SlotEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for SlotEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotEntry").field(&self.id.raw()).finish()
    }
}

struct RegistryInner {
    store: RefCell<Vec<SlotEntry>>,
    published: Signal<Vec<SlotEntry>>,
}

impl RegistryInner {
    fn publish(&self) {
        let snapshot = self.store.borrow().clone();
        self.published.set(snapshot);
    }

    fn remove(&self, id: SlotId) -> bool {
        let removed = {
            let mut store = self.store.borrow_mut();
            let before = store.len();
            store.retain(|entry| entry.id != id);
            store.len() != before
        };
        if removed {
            trace!(slot = id.raw(), "slot unregistered");
            self.publish();
        }
        removed
    }
}

/// Per-context registry of slot fragments. Cheap to clone.
#[derive(Clone)]
pub struct SlotRegistry {
    inner: Rc<RegistryInner>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                store: RefCell::new(Vec::new()),
                published: signal(Vec::new()),
            }),
        }
    }

    /// Append a fragment. Order of registration is the mount order.
    pub fn register(&self, render: SlotRenderer) -> SlotGuard {
        let id = SlotId::next();
        self.inner.store.borrow_mut().push(SlotEntry { id, render });
        trace!(slot = id.raw(), "slot registered");
        self.inner.publish();

        SlotGuard {
            id,
            inner: self.inner.clone(),
            active: Cell::new(true),
        }
    }

    /// Reactive read of the current entries.
    pub fn entries(&self) -> Vec<SlotEntry> {
        self.inner.published.get()
    }

    /// Ids in registration order. Untracked.
    pub fn ids(&self) -> Vec<SlotId> {
        self.inner.store.borrow().iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.borrow().is_empty()
    }

    /// Drop every entry. Outstanding guards become no-ops.
    pub fn clear(&self) {
        let had_entries = !self.inner.store.borrow().is_empty();
        self.inner.store.borrow_mut().clear();
        if had_entries {
            self.inner.publish();
        }
    }

    /// The published list, for outlets that want the signal itself.
    pub fn signal(&self) -> Signal<Vec<SlotEntry>> {
        self.inner.published.clone()
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SlotRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotRegistry").field("ids", &self.ids()).finish()
    }
}

/// Removes exactly one registry entry.
pub struct SlotGuard {
    id: SlotId,
    inner: Rc<RegistryInner>,
    active: Cell<bool>,
}

impl SlotGuard {
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Remove the entry. Safe to call any number of times.
    pub fn unregister(&self) {
        if self.active.replace(false) {
            self.inner.remove(self.id);
        }
    }

    /// Whether the entry is still in the registry.
    pub fn is_registered(&self) -> bool {
        self.active.get() && self.inner.store.borrow().iter().any(|e| e.id == self.id)
    }
}

impl fmt::Debug for SlotGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotGuard")
            .field("id", &self.id.raw())
            .field("registered", &self.is_registered())
            .finish()
    }
}
