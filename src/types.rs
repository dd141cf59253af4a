//! Core types for spark-dock.
//!
//! Identifiers, cleanup/getter aliases and the idempotent [`Disposable`]
//! handle that every layer of the adapter passes around.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Callback Aliases
// =============================================================================

/// Cleanup function returned by mounted fragments.
///
/// Call this to unmount the fragment and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

/// Reactive getter. Reading through it inside an effect tracks the source.
pub type Getter<T> = Rc<dyn Fn() -> T>;

/// Zero-argument callback shared between closures (e.g. an injected `close()`).
pub type Callback = Rc<dyn Fn()>;

// =============================================================================
// Engine Identifiers
// =============================================================================

/// Identifier of an engine-managed panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PanelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an engine-managed tab group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Host Identifiers
// =============================================================================

thread_local! {
    /// Counter for host element ids (containers, part roots, style nodes).
    static ELEMENT_COUNTER: Cell<u64> = const { Cell::new(0) };

    /// Counter for slot identities.
    static SLOT_COUNTER: Cell<u64> = const { Cell::new(0) };
}

fn next_from(counter: &'static std::thread::LocalKey<Cell<u64>>) -> u64 {
    counter.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    })
}

/// Host element owned by the adapter (container node, part root, style node).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh element id.
    pub fn next() -> Self {
        Self(next_from(&ELEMENT_COUNTER))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Identity of a slot registry entry. Never reused within a thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u64);

impl SlotId {
    pub(crate) fn next() -> Self {
        Self(next_from(&SLOT_COUNTER))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// Dimension value for the container node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Size from content.
    #[default]
    Auto,
    /// Absolute size in cells.
    Cells(u16),
    /// Percentage of the viewport (0-100).
    Percent(f32),
}

impl From<u16> for Dimension {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Auto
        } else {
            Self::Cells(value)
        }
    }
}

// =============================================================================
// Disposable
// =============================================================================

/// Handle returned by every subscription in the engine protocol.
///
/// `dispose()` runs the teardown at most once; further calls are silent
/// no-ops. Dropping a `Disposable` does NOT dispose it.
pub struct Disposable {
    teardown: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Disposable {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: RefCell::new(Some(Box::new(teardown))),
        }
    }

    /// A disposable with nothing to tear down.
    pub fn noop() -> Self {
        Self {
            teardown: RefCell::new(None),
        }
    }

    /// Run the teardown if it has not run yet.
    pub fn dispose(&self) {
        // Release the borrow before running: teardown may re-enter.
        let teardown = self.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.teardown.borrow().is_none()
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
