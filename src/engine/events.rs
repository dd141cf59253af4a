//! Engine lifecycle events.
//!
//! [`DockEvent`] enumerates every emitter the engine exposes. Each listener
//! receives an [`EngineEvent`] payload and subscribing returns a
//! [`Disposable`](crate::types::Disposable).

use std::fmt;
use std::rc::Rc;

use crate::types::{GroupId, PanelId};

/// The fixed set of engine emitters a dock view can listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DockEvent {
    DidActivePanelChange,
    DidAddPanel,
    DidRemovePanel,
    DidMovePanel,
    DidActiveGroupChange,
    DidAddGroup,
    DidRemoveGroup,
    DidLayoutChange,
    DidLayoutFromJson,
    DidDrop,
    WillDrop,
    WillShowOverlay,
    WillDragPanel,
    WillDragGroup,
    DidMaximizedGroupChange,
    DidPopoutGroupSizeChange,
    DidPopoutGroupPositionChange,
    DidOpenPopoutWindowFail,
    UnhandledDragOver,
}

impl DockEvent {
    /// Every recognized event, in declaration order.
    pub const ALL: [DockEvent; 19] = [
        DockEvent::DidActivePanelChange,
        DockEvent::DidAddPanel,
        DockEvent::DidRemovePanel,
        DockEvent::DidMovePanel,
        DockEvent::DidActiveGroupChange,
        DockEvent::DidAddGroup,
        DockEvent::DidRemoveGroup,
        DockEvent::DidLayoutChange,
        DockEvent::DidLayoutFromJson,
        DockEvent::DidDrop,
        DockEvent::WillDrop,
        DockEvent::WillShowOverlay,
        DockEvent::WillDragPanel,
        DockEvent::WillDragGroup,
        DockEvent::DidMaximizedGroupChange,
        DockEvent::DidPopoutGroupSizeChange,
        DockEvent::DidPopoutGroupPositionChange,
        DockEvent::DidOpenPopoutWindowFail,
        DockEvent::UnhandledDragOver,
    ];

    /// Listener prop name for this event.
    pub fn prop_name(self) -> &'static str {
        match self {
            DockEvent::DidActivePanelChange => "on_did_active_panel_change",
            DockEvent::DidAddPanel => "on_did_add_panel",
            DockEvent::DidRemovePanel => "on_did_remove_panel",
            DockEvent::DidMovePanel => "on_did_move_panel",
            DockEvent::DidActiveGroupChange => "on_did_active_group_change",
            DockEvent::DidAddGroup => "on_did_add_group",
            DockEvent::DidRemoveGroup => "on_did_remove_group",
            DockEvent::DidLayoutChange => "on_did_layout_change",
            DockEvent::DidLayoutFromJson => "on_did_layout_from_json",
            DockEvent::DidDrop => "on_did_drop",
            DockEvent::WillDrop => "on_will_drop",
            DockEvent::WillShowOverlay => "on_will_show_overlay",
            DockEvent::WillDragPanel => "on_will_drag_panel",
            DockEvent::WillDragGroup => "on_will_drag_group",
            DockEvent::DidMaximizedGroupChange => "on_did_maximized_group_change",
            DockEvent::DidPopoutGroupSizeChange => "on_did_popout_group_size_change",
            DockEvent::DidPopoutGroupPositionChange => "on_did_popout_group_position_change",
            DockEvent::DidOpenPopoutWindowFail => "on_did_open_popout_window_fail",
            DockEvent::UnhandledDragOver => "on_unhandled_drag_over",
        }
    }
}

impl fmt::Display for DockEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prop_name())
    }
}

/// Drop/drag location reported by drag-and-drop events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropTarget {
    pub group: Option<GroupId>,
    pub panel: Option<PanelId>,
}

/// Payload delivered to event listeners.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// A panel was added or removed.
    Panel(PanelId),
    /// The active panel changed.
    ActivePanel(Option<PanelId>),
    /// A panel moved between groups.
    PanelMoved {
        panel: PanelId,
        from: GroupId,
        to: GroupId,
    },
    /// A group was added or removed.
    Group(GroupId),
    /// The active group changed.
    ActiveGroup(Option<GroupId>),
    /// The layout changed or was restored.
    Layout,
    /// A drag, drop, or overlay interaction.
    Drag(DropTarget),
    /// A group was maximized or restored.
    Maximized { group: GroupId, maximized: bool },
    /// A popout group window moved or resized.
    Popout { group: GroupId, width: f32, height: f32 },
    /// Opening a popout window failed.
    PopoutFailed,
}

impl EngineEvent {
    /// The panel this event is about, if any.
    pub fn panel(&self) -> Option<&PanelId> {
        match self {
            EngineEvent::Panel(id) => Some(id),
            EngineEvent::ActivePanel(id) => id.as_ref(),
            EngineEvent::PanelMoved { panel, .. } => Some(panel),
            EngineEvent::Drag(target) => target.panel.as_ref(),
            _ => None,
        }
    }

    /// The group this event is about, if any.
    pub fn group(&self) -> Option<&GroupId> {
        match self {
            EngineEvent::Group(id) => Some(id),
            EngineEvent::ActiveGroup(id) => id.as_ref(),
            EngineEvent::PanelMoved { to, .. } => Some(to),
            EngineEvent::Drag(target) => target.group.as_ref(),
            EngineEvent::Maximized { group, .. } => Some(group),
            EngineEvent::Popout { group, .. } => Some(group),
            _ => None,
        }
    }
}

/// A subscribed event listener.
///
/// Equality is pointer identity: two clones of the same listener are equal,
/// two separately created closures never are.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&EngineEvent)>);

impl Listener {
    pub fn new(f: impl Fn(&EngineEvent) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &EngineEvent) {
        (self.0)(event)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener(..)")
    }
}
