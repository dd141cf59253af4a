//! Panel open-state table.
//!
//! Mirrors which panels the engine currently holds as one `Signal<bool>` per
//! panel. Writes are batched by the context's debounce; a write that does not
//! change the value is skipped so subscribers do not re-run. A closed panel's
//! cell is forgotten once nothing outside the table holds it, so the table
//! only grows with panels that are open or observed.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::trace;

use crate::types::PanelId;

#[derive(Default)]
struct TableInner {
    panels: RefCell<HashMap<PanelId, Signal<bool>>>,
    writes: Cell<usize>,
}

/// Per-context open state of every panel the engine has reported.
#[derive(Clone, Default)]
pub struct PanelStateTable {
    inner: Rc<TableInner>,
}

impl PanelStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the open state of `panel`. No-op if unchanged.
    pub fn set_open(&self, panel: PanelId, open: bool) {
        let existing = self.inner.panels.borrow().get(&panel).cloned();
        match existing {
            Some(cell) => {
                if cell.get() == open {
                    return;
                }
                cell.set(open);
            }
            // Unknown panels already read as closed.
            None if !open => return,
            None => {
                self.inner.panels.borrow_mut().insert(panel.clone(), signal(open));
            }
        }
        self.inner.writes.set(self.inner.writes.get() + 1);
        trace!(panel = %panel, open, "panel open state changed");

        if !open {
            self.release(&panel);
        }
    }

    /// Drop a closed panel's cell if the table holds the only reference.
    fn release(&self, panel: &PanelId) {
        let mut panels = self.inner.panels.borrow_mut();
        let unshared = panels
            .get(panel)
            .is_some_and(|cell| Rc::strong_count(cell.inner()) == 1);
        if unshared {
            panels.remove(panel);
            trace!(panel = %panel, "closed panel forgotten");
        }
    }

    /// Number of panels with a live cell.
    pub fn len(&self) -> usize {
        self.inner.panels.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `panel` is open. Reactive when the panel is known.
    pub fn is_open(&self, panel: &PanelId) -> bool {
        self.signal(panel).is_some_and(|cell| cell.get())
    }

    /// The reactive cell for `panel`, if the engine has reported it.
    pub fn signal(&self, panel: &PanelId) -> Option<Signal<bool>> {
        self.inner.panels.borrow().get(panel).cloned()
    }

    /// Currently open panels, sorted by id.
    pub fn open_panels(&self) -> Vec<PanelId> {
        let panels = self.inner.panels.borrow();
        let mut open: Vec<PanelId> = panels
            .iter()
            .filter(|(_, cell)| cell.get())
            .map(|(id, _)| id.clone())
            .collect();
        open.sort();
        open
    }

    /// Number of writes that actually changed state.
    pub fn write_count(&self) -> usize {
        self.inner.writes.get()
    }
}
