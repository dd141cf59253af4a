//! Adapter context - One mounted engine and everything bound to it.
//!
//! Construction order matters: the container and slot registry must exist
//! before the factories that close over them, the factories before the
//! before-create hook sees the options, and the engine before any listener is
//! bound. A failed engine construction leaves nothing registered.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use spark_signals::Signal;
use tracing::{debug, warn};

use crate::container::{Container, Viewport};
use crate::debounce::KeyedDebounce;
use crate::engine::{DockEngine, DockEvent, EngineOptions, Listener, SlotKinds};
use crate::error::DockError;
use crate::events::EventBridge;
use crate::panel_state::PanelStateTable;
use crate::props::{DockViewProps, ReadyEvent};
use crate::scheduler::queue_for;
use crate::slots::{header_actions_factory, tab_factory, watermark_factory, HeaderPosition, SlotRegistry};
use crate::types::{Disposable, PanelId};

/// Per-mount adapter state. Owns the container and the engine.
pub struct AdapterContext<E: DockEngine> {
    props: DockViewProps<E>,
    container: Container,
    slots: SlotRegistry,
    engine: Rc<E>,
    bridge: EventBridge,
    panels: PanelStateTable,
    open_status: KeyedDebounce<PanelId, bool>,
    open_bindings: Vec<Disposable>,
    factory_kinds: SlotKinds,
    ready: Cell<bool>,
    disposed: Cell<bool>,
}

impl<E: DockEngine> AdapterContext<E> {
    pub fn new(props: DockViewProps<E>) -> Result<Self, DockError> {
        let container = Container::new(props.container.clone())?;
        let slots = SlotRegistry::new();

        let mut options = build_options(&props, &slots);
        if let Some(hook) = &props.on_before_create {
            hook(&mut options, &props);
        }
        let factory_kinds = options.factory_kinds();

        let engine = match E::create(&container, options) {
            Ok(engine) => Rc::new(engine),
            Err(err) => {
                warn!(error = %err, label = err.as_label(), "engine construction failed");
                slots.clear();
                return Err(err.into());
            }
        };

        let bridge = EventBridge::bind(&engine, &props.listeners);

        let panels = PanelStateTable::new();
        let open_status = {
            let panels = panels.clone();
            KeyedDebounce::new(queue_for(props.flush_policy), move |panel, open| {
                panels.set_open(panel, open)
            })
        };
        let open_bindings = vec![
            bind_open_status(&*engine, &open_status, DockEvent::DidAddPanel, true),
            bind_open_status(&*engine, &open_status, DockEvent::DidRemovePanel, false),
        ];

        debug!(
            container = container.element().raw(),
            factories = ?factory_kinds,
            "adapter context created"
        );

        Ok(Self {
            props,
            container,
            slots,
            engine,
            bridge,
            panels,
            open_status,
            open_bindings,
            factory_kinds,
            ready: Cell::new(false),
            disposed: Cell::new(false),
        })
    }

    /// Measure the container and run the engine's first layout pass.
    pub fn layout_initial(&self, viewport: Viewport) -> Result<(f32, f32), DockError> {
        if self.disposed.get() {
            return Err(DockError::Disposed);
        }
        let (width, height) = self.container.measure(viewport)?;
        self.engine.layout(width, height);
        debug!(width, height, "initial layout");
        Ok((width, height))
    }

    /// Invoke the ready hook. Only the first call has an effect.
    pub fn notify_ready(&self) {
        if self.disposed.get() || self.ready.replace(true) {
            return;
        }
        if let Some(hook) = &self.props.on_ready {
            hook(&ReadyEvent {
                engine: &*self.engine,
            });
        }
    }

    /// Tear everything down. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }

        if let Some(hook) = &self.props.on_dispose {
            hook(&ReadyEvent {
                engine: &*self.engine,
            });
        }

        self.engine.dispose();
        for binding in &self.open_bindings {
            binding.dispose();
        }
        self.open_status.cancel();
        self.bridge.dispose();
        self.slots.clear();

        debug!(container = self.container.element().raw(), "adapter context disposed");
    }

    pub fn engine(&self) -> &Rc<E> {
        &self.engine
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn props(&self) -> &DockViewProps<E> {
        &self.props
    }

    pub fn panel_states(&self) -> &PanelStateTable {
        &self.panels
    }

    /// Whether the engine currently holds `panel`, as of the last flush.
    pub fn panel_open(&self, panel: &PanelId) -> bool {
        self.panels.is_open(panel)
    }

    pub fn panel_open_signal(&self, panel: &PanelId) -> Option<Signal<bool>> {
        self.panels.signal(panel)
    }

    /// Open-state writes waiting for the next flush.
    pub fn pending_open_writes(&self) -> usize {
        self.open_status.pending_len()
    }

    /// Which factories were handed to the engine.
    pub fn factory_kinds(&self) -> SlotKinds {
        self.factory_kinds
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl<E: DockEngine> Drop for AdapterContext<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<E: DockEngine> fmt::Debug for AdapterContext<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterContext")
            .field("container", &self.container.element())
            .field("slots", &self.slots.len())
            .field("bridge", &self.bridge)
            .field("factories", &self.factory_kinds)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

/// Pass-through options plus the synthesized factories.
fn build_options<E>(props: &DockViewProps<E>, slots: &SlotRegistry) -> EngineOptions {
    let mut options = EngineOptions::new(props.options.clone());
    options.create_watermark_component = Some(watermark_factory(slots, props.watermark.clone()));
    options.create_tab_component = Some(tab_factory(slots, props.tab.clone()));

    for position in HeaderPosition::ALL {
        let Some(render) = props.header_actions(position) else {
            continue;
        };
        let factory = Some(header_actions_factory(slots, position, render.clone()));
        match position {
            HeaderPosition::Prefix => options.create_prefix_header_action_component = factory,
            HeaderPosition::Left => options.create_left_header_action_component = factory,
            HeaderPosition::Right => options.create_right_header_action_component = factory,
        }
    }
    options
}

fn bind_open_status<E: DockEngine>(
    engine: &E,
    debounce: &KeyedDebounce<PanelId, bool>,
    event: DockEvent,
    open: bool,
) -> Disposable {
    let debounce = debounce.clone();
    engine.subscribe(
        event,
        Listener::new(move |payload| {
            if let Some(panel) = payload.panel() {
                debounce.call(panel.clone(), open);
            }
        }),
    )
}
