//! Dock stylesheet injection.
//!
//! Every mounted dock view needs the base dock stylesheet present in the
//! style host exactly once. A thread-wide [`SharedResourceGuard`] inserts it
//! when the first view mounts and removes it when the last one unmounts.
//!
//! The style host is the thread-local list of injected stylesheet nodes,
//! read by the renderer when resolving `dv-*` classes.

pub mod guard;

pub use guard::{ResourceLease, SharedResourceGuard};

use std::cell::RefCell;

use tracing::debug;

use crate::types::ElementId;

/// Base rules for engine-created containers.
pub const DOCK_STYLESHEET: &str = "\
.dv-dockview { position: relative; background: surface; }
.dv-groupview { display: flex; flex-direction: column; }
.dv-tabs-and-actions-container { display: flex; height: 1; }
.dv-watermark { display: flex; height: 100%; }
.dv-tab.dv-active-tab { color: text_bright; }
.dv-tab.dv-inactive-tab { color: text_muted; }
";

/// A stylesheet node inserted into the style host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleNode {
    pub element: ElementId,
    pub source: &'static str,
}

thread_local! {
    /// Injected stylesheet nodes in insertion order.
    static STYLE_HOST: RefCell<Vec<StyleNode>> = const { RefCell::new(Vec::new()) };

    /// Thread-wide guard over the dock stylesheet node.
    static DOCK_STYLE_GUARD: SharedResourceGuard<ElementId> =
        SharedResourceGuard::new(insert_dock_stylesheet, remove_stylesheet);
}

fn insert_dock_stylesheet() -> ElementId {
    let element = ElementId::next();
    STYLE_HOST.with(|host| {
        host.borrow_mut().push(StyleNode {
            element,
            source: DOCK_STYLESHEET,
        })
    });
    debug!(element = element.raw(), "dock stylesheet injected");
    element
}

fn remove_stylesheet(element: ElementId) {
    // The host may already be gone if a lease outlives thread teardown.
    let _ = STYLE_HOST.try_with(|host| {
        host.borrow_mut().retain(|node| node.element != element);
    });
    debug!(element = element.raw(), "dock stylesheet removed");
}

/// Take a lease on the dock stylesheet, injecting it on first use.
pub fn acquire_stylesheet() -> ResourceLease<ElementId> {
    DOCK_STYLE_GUARD.with(|guard| guard.acquire())
}

/// Number of live stylesheet leases on this thread.
pub fn stylesheet_leases() -> usize {
    DOCK_STYLE_GUARD.with(|guard| guard.count())
}

/// Whether the dock stylesheet is currently injected.
pub fn is_stylesheet_injected() -> bool {
    DOCK_STYLE_GUARD.with(|guard| guard.is_live())
}

/// Snapshot of the style host.
pub fn injected_stylesheets() -> Vec<StyleNode> {
    STYLE_HOST.with(|host| host.borrow().clone())
}

// =============================================================================
// Tests
// =============================================================================
