//! Event bridge - Reactive listener props bound to engine emitters.
//!
//! [`EventListeners`] holds one `Signal<Option<Listener>>` per [`DockEvent`].
//! [`EventBridge::bind`] runs one effect per event inside an EffectScope:
//! whenever the listener changes, the old engine subscription is disposed and
//! a new one is made if the listener is `Some`. Stopping the scope disposes
//! every live subscription.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use spark_signals::{effect, effect_scope, on_scope_dispose, signal, Signal};
use tracing::{debug, trace};

use crate::engine::{DockEngine, DockEvent, EngineEvent, Listener};
use crate::types::{Cleanup, Disposable};

const EVENT_COUNT: usize = DockEvent::ALL.len();

// =============================================================================
// EventListeners
// =============================================================================

/// Reactive listener props, one cell per event. Cheap to clone; clones share
/// the same cells.
#[derive(Clone)]
pub struct EventListeners {
    cells: Rc<[Signal<Option<Listener>>; EVENT_COUNT]>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self {
            cells: Rc::new(std::array::from_fn(|_| signal(None))),
        }
    }

    /// Replace the listener for `event`. `None` unsubscribes.
    pub fn set(&self, event: DockEvent, listener: Option<Listener>) {
        self.cell(event).set(listener);
    }

    /// Install a closure as the listener for `event` and return it.
    pub fn on(&self, event: DockEvent, f: impl Fn(&EngineEvent) + 'static) -> Listener {
        let listener = Listener::new(f);
        self.set(event, Some(listener.clone()));
        listener
    }

    pub fn clear(&self, event: DockEvent) {
        self.set(event, None);
    }

    /// Reactive read of the current listener.
    pub fn get(&self, event: DockEvent) -> Option<Listener> {
        self.cell(event).get()
    }

    pub fn cell(&self, event: DockEvent) -> Signal<Option<Listener>> {
        self.cells[event as usize].clone()
    }
}

impl Default for EventListeners {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<_> = DockEvent::ALL
            .iter()
            .filter(|e| self.cells[**e as usize].get().is_some())
            .collect();
        f.debug_struct("EventListeners").field("set", &set).finish()
    }
}

// =============================================================================
// EventBridge
// =============================================================================

type Bindings = Rc<RefCell<HashMap<DockEvent, Disposable>>>;

/// Live engine subscriptions for one context.
pub struct EventBridge {
    bindings: Bindings,
    stop: RefCell<Option<Cleanup>>,
}

impl EventBridge {
    /// Bind every event in `listeners` to `engine`.
    pub fn bind<E: DockEngine>(engine: &Rc<E>, listeners: &EventListeners) -> Self {
        let bindings: Bindings = Rc::new(RefCell::new(HashMap::new()));
        let scope = effect_scope(false);

        let listeners = listeners.clone();
        let engine = Rc::downgrade(engine);
        let bindings_for_scope = bindings.clone();

        scope.run(move || {
            for event in DockEvent::ALL {
                let cell = listeners.cell(event);
                let bindings = bindings_for_scope.clone();
                let engine = engine.clone();

                let _effect_cleanup = effect(move || {
                    let current = cell.get();

                    let previous = bindings.borrow_mut().remove(&event);
                    if let Some(previous) = previous {
                        previous.dispose();
                        trace!(%event, "listener unbound");
                    }

                    let (Some(listener), Some(engine)) = (current, engine.upgrade()) else {
                        return;
                    };
                    let subscription = engine.subscribe(event, listener);
                    bindings.borrow_mut().insert(event, subscription);
                    trace!(%event, "listener bound");
                });
            }

            let bindings = bindings_for_scope;
            on_scope_dispose(move || {
                let drained: Vec<Disposable> =
                    bindings.borrow_mut().drain().map(|(_, d)| d).collect();
                for subscription in drained {
                    subscription.dispose();
                }
            });
        });

        debug!(bound = bindings.borrow().len(), "event bridge bound");
        Self {
            bindings,
            stop: RefCell::new(Some(Box::new(move || scope.stop()))),
        }
    }

    /// Number of live engine subscriptions.
    pub fn active_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_bound(&self, event: DockEvent) -> bool {
        self.bindings.borrow().contains_key(&event)
    }

    /// Stop reacting and dispose every subscription. Idempotent.
    pub fn dispose(&self) {
        let stop = self.stop.borrow_mut().take();
        if let Some(stop) = stop {
            stop();
            debug!("event bridge disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.stop.borrow().is_none()
    }
}

impl fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("active", &self.active_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
