//! Engine - The external docking engine, specified at its boundary.
//!
//! The engine owns layout, drag-and-drop, and the panel/group lifecycle. The
//! adapter only touches what is declared here:
//!
//! - [`DockEngine`] - construction, layout pass, event emitters, disposal
//! - [`EngineOptions`] - pass-through options plus synthesized factories
//! - [`Part`] - the protocol engine-created sub-components satisfy
//! - [`DockEvent`] / [`EngineEvent`] - the enumerated emitters and payloads

pub mod events;
pub mod options;
pub mod part;

#[cfg(test)]
pub mod fake;

pub use events::{DockEvent, DropTarget, EngineEvent, Listener};
pub use options::{
    ContentFactory, DefaultRenderer, DndEdges, DockOptions, DockTheme, EngineOptions,
    FloatingGroupBounds, HeaderActionsFactory, NoPanelsOverlay, Scrollbars, SingleTabMode,
    SlotKinds, TabFactory, WatermarkFactory,
};
pub use part::{
    ContentParams, DockApi, GroupApi, HeaderActionParams, PanelApi, Part, TabParams,
    WatermarkParams,
};

use std::rc::Rc;

use crate::container::Container;
use crate::error::EngineError;
use crate::types::Disposable;

/// An imperative docking engine the adapter can drive.
pub trait DockEngine: Sized + 'static {
    /// Construct the engine into `container`. Factories in `options` may be
    /// called during construction and at any point afterwards.
    fn create(container: &Container, options: EngineOptions) -> Result<Self, EngineError>;

    /// Lay out the engine within the given size.
    fn layout(&self, width: f32, height: f32);

    /// Subscribe to one emitter.
    fn subscribe(&self, event: DockEvent, listener: Listener) -> Disposable;

    /// The container-wide API object.
    fn api(&self) -> Rc<dyn DockApi>;

    /// Tear down the engine and every part it created.
    fn dispose(&self);
}
