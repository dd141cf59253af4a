//! # spark-dock
//!
//! Reactive dock-layout adapter for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity. An imperative docking engine (anything that
//! implements [`DockEngine`]) owns layout, drag-and-drop and the panel/group
//! lifecycle; this crate bridges it into a reactive component tree.
//!
//! ## Architecture
//!
//! The engine never renders user content itself. It calls factory callbacks,
//! each factory registers a slot, and a single outlet mounts every slot:
//!
//! ```text
//! DockViewProps → AdapterContext → factories → DockEngine::create
//!                                      ↓
//!        engine calls factory → FactoryAdapter::init → SlotRegistry
//!                                      ↓
//!                     mount_slots() → user render fn (props getter)
//! ```
//!
//! Listener props are `Signal<Option<Listener>>` cells bound to engine
//! emitters by the [`EventBridge`]; changing one swaps the subscription.
//!
//! ## Modules
//!
//! - [`types`] - Identifiers, `Disposable`, cleanup/getter aliases
//! - [`engine`] - The engine boundary: trait, options, part protocol, events
//! - [`slots`] - Slot registry, factory adapters, outlet
//! - [`events`] - Reactive listener props and the event bridge
//! - [`context`] - Per-mount adapter state
//! - [`view`] - Mount/unmount lifecycle
//! - [`scheduler`] - Turn and frame queues
//! - [`debounce`] - Keyed latest-value-wins debounce
//! - [`style`] - Ref-counted stylesheet injection
//! - [`container`] - The container node and viewport

pub mod container;
pub mod context;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod events;
pub mod panel_state;
pub mod props;
pub mod scheduler;
pub mod slots;
pub mod style;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::*;

pub use container::{Container, ContainerStyle, Viewport};
pub use context::AdapterContext;
pub use debounce::KeyedDebounce;
pub use engine::{
    DockApi, DockEngine, DockEvent, DockOptions, EngineEvent, EngineOptions, GroupApi, Listener,
    PanelApi, Part, SlotKinds,
};
pub use error::{DockError, EngineError};
pub use events::{EventBridge, EventListeners};
pub use panel_state::PanelStateTable;
pub use props::{DockViewProps, ReadyEvent};
pub use scheduler::{end_frame, end_turn, queue_for, FlushPolicy, TurnQueue};
pub use slots::{
    each, mount_slots, show, HeaderActionsProps, HeaderPosition, SlotRegistry, SlotRender,
    TabProps, WatermarkProps,
};
pub use style::{acquire_stylesheet, ResourceLease, SharedResourceGuard};
pub use view::{Children, DockView, DockViewHandle};
