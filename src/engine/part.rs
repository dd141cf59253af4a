//! Engine component protocol.
//!
//! The engine creates sub-components through factory callbacks and drives
//! them through [`Part`]. It hands each part an init-params value carrying
//! references to its own API objects ([`DockApi`], [`GroupApi`], [`PanelApi`]).

use std::fmt;
use std::rc::Rc;

use crate::types::{Disposable, ElementId, GroupId, PanelId};

/// A sub-component the engine owns and drives.
pub trait Part<P> {
    /// Root element the engine attaches into its own layout.
    fn element(&self) -> ElementId;

    /// Called once after creation.
    fn init(&mut self, params: P);

    /// Called with fresh params while the part stays mounted.
    fn update(&mut self, _params: P) {}

    /// Called when the engine drops the part. May be called more than once.
    fn dispose(&mut self);
}

// =============================================================================
// Engine API Objects
// =============================================================================

/// Container-wide engine API.
pub trait DockApi {
    fn panel_ids(&self) -> Vec<PanelId>;
    fn group_ids(&self) -> Vec<GroupId>;
    fn active_group(&self) -> Option<GroupId>;
    fn close_panel(&self, panel: &PanelId);
    fn close_group(&self, group: &GroupId);
}

/// Per-group engine API.
pub trait GroupApi {
    fn id(&self) -> GroupId;
    fn is_active(&self) -> bool;
    fn active_panel(&self) -> Option<PanelId>;
    fn panel_ids(&self) -> Vec<PanelId>;
    fn close(&self);
    fn on_did_active_change(&self, listener: Rc<dyn Fn(bool)>) -> Disposable;
    fn on_did_active_panel_change(&self, listener: Rc<dyn Fn(Option<PanelId>)>) -> Disposable;
}

/// Per-panel engine API.
pub trait PanelApi {
    fn id(&self) -> PanelId;
    fn title(&self) -> Option<String>;
    fn group(&self) -> Option<GroupId>;
    fn close(&self);
}

// =============================================================================
// Init Params
// =============================================================================

/// Params for a watermark part. `group` is set when the watermark fills an
/// empty group rather than an empty dock.
#[derive(Clone)]
pub struct WatermarkParams {
    pub container: Rc<dyn DockApi>,
    pub group: Option<Rc<dyn GroupApi>>,
}

/// Params for a tab part.
#[derive(Clone)]
pub struct TabParams {
    pub container: Rc<dyn DockApi>,
    pub panel: Rc<dyn PanelApi>,
}

/// Params for a group header-actions part.
#[derive(Clone)]
pub struct HeaderActionParams {
    pub container: Rc<dyn DockApi>,
    pub group: Rc<dyn GroupApi>,
}

/// Params for a panel content part.
#[derive(Clone)]
pub struct ContentParams {
    pub container: Rc<dyn DockApi>,
    pub panel: Rc<dyn PanelApi>,
}

impl fmt::Debug for WatermarkParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatermarkParams")
            .field("group", &self.group.as_ref().map(|g| g.id()))
            .finish()
    }
}

impl fmt::Debug for TabParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabParams")
            .field("panel", &self.panel.id())
            .finish()
    }
}

impl fmt::Debug for HeaderActionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderActionParams")
            .field("group", &self.group.id())
            .finish()
    }
}

impl fmt::Debug for ContentParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentParams")
            .field("panel", &self.panel.id())
            .finish()
    }
}
