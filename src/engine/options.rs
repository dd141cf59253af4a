//! Engine construction options.
//!
//! [`DockOptions`] is the pass-through half: every field maps 1:1 onto the
//! engine's configuration and is forwarded unmodified. [`EngineOptions`] adds
//! the factory callbacks the adapter synthesizes.

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use super::part::{ContentParams, HeaderActionParams, Part, TabParams, WatermarkParams};
use crate::types::{GroupId, PanelId};

// =============================================================================
// Factory Callbacks
// =============================================================================

/// Creates the watermark shown in an empty dock or group.
pub type WatermarkFactory = Rc<dyn Fn() -> Box<dyn Part<WatermarkParams>>>;

/// Creates a tab. `None` tells the engine to use its built-in tab.
pub type TabFactory = Rc<dyn Fn(&PanelId) -> Option<Box<dyn Part<TabParams>>>>;

/// Creates a header-actions part for a group.
pub type HeaderActionsFactory = Rc<dyn Fn(&GroupId) -> Box<dyn Part<HeaderActionParams>>>;

/// Creates panel content.
pub type ContentFactory = Rc<dyn Fn(&PanelId) -> Box<dyn Part<ContentParams>>>;

bitflags! {
    /// Which factory callbacks are present on an [`EngineOptions`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SlotKinds: u8 {
        const WATERMARK = 1 << 0;
        const TAB = 1 << 1;
        const PREFIX_ACTIONS = 1 << 2;
        const LEFT_ACTIONS = 1 << 3;
        const RIGHT_ACTIONS = 1 << 4;
        const CONTENT = 1 << 5;

        const HEADER_ACTIONS = Self::PREFIX_ACTIONS.bits()
            | Self::LEFT_ACTIONS.bits()
            | Self::RIGHT_ACTIONS.bits();
    }
}

// =============================================================================
// Pass-through Option Types
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SingleTabMode {
    Default,
    Fullwidth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultRenderer {
    OnlyWhenVisible,
    Always,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DockTheme {
    pub name: String,
    pub class_name: String,
    pub gap: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FloatingGroupBounds {
    BoundedWithinViewport,
    Minimum {
        width_in_viewport: f32,
        height_in_viewport: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scrollbars {
    Native,
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DndEdges {
    Disabled,
    Edges { size: f32, activation_size: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoPanelsOverlay {
    Watermark,
    EmptyGroup,
}

/// Declarative options forwarded to the engine unmodified.
#[derive(Clone, Default)]
pub struct DockOptions {
    pub default_tab_component: Option<String>,
    pub single_tab_mode: Option<SingleTabMode>,
    pub default_renderer: Option<DefaultRenderer>,
    pub theme: Option<DockTheme>,
    pub class_name: Option<String>,
    pub hide_borders: Option<bool>,
    pub locked: Option<bool>,
    pub disable_dnd: Option<bool>,
    pub disable_floating_groups: Option<bool>,
    pub floating_group_bounds: Option<FloatingGroupBounds>,
    pub scrollbars: Option<Scrollbars>,
    pub debug: Option<bool>,
    pub dnd_edges: Option<DndEdges>,
    pub popout_url: Option<String>,
    pub no_panels_overlay: Option<NoPanelsOverlay>,
    pub disable_auto_resizing: Option<bool>,
    pub disable_tabs_overflow_list: Option<bool>,
    pub create_component: Option<ContentFactory>,
}

impl fmt::Debug for DockOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockOptions")
            .field("default_tab_component", &self.default_tab_component)
            .field("single_tab_mode", &self.single_tab_mode)
            .field("default_renderer", &self.default_renderer)
            .field("theme", &self.theme)
            .field("class_name", &self.class_name)
            .field("hide_borders", &self.hide_borders)
            .field("locked", &self.locked)
            .field("disable_dnd", &self.disable_dnd)
            .field("disable_floating_groups", &self.disable_floating_groups)
            .field("floating_group_bounds", &self.floating_group_bounds)
            .field("scrollbars", &self.scrollbars)
            .field("debug", &self.debug)
            .field("dnd_edges", &self.dnd_edges)
            .field("popout_url", &self.popout_url)
            .field("no_panels_overlay", &self.no_panels_overlay)
            .field("disable_auto_resizing", &self.disable_auto_resizing)
            .field("disable_tabs_overflow_list", &self.disable_tabs_overflow_list)
            .field("create_component", &self.create_component.is_some())
            .finish()
    }
}

// =============================================================================
// Engine Options
// =============================================================================

/// The fully assembled configuration handed to the engine.
#[derive(Clone, Default)]
pub struct EngineOptions {
    pub dock: DockOptions,
    pub create_tab_component: Option<TabFactory>,
    pub create_watermark_component: Option<WatermarkFactory>,
    pub create_prefix_header_action_component: Option<HeaderActionsFactory>,
    pub create_left_header_action_component: Option<HeaderActionsFactory>,
    pub create_right_header_action_component: Option<HeaderActionsFactory>,
}

impl EngineOptions {
    /// Wrap pass-through options with no factories installed yet.
    pub fn new(dock: DockOptions) -> Self {
        Self {
            dock,
            ..Default::default()
        }
    }

    /// Which factory callbacks are installed.
    pub fn factory_kinds(&self) -> SlotKinds {
        let mut kinds = SlotKinds::empty();
        kinds.set(SlotKinds::WATERMARK, self.create_watermark_component.is_some());
        kinds.set(SlotKinds::TAB, self.create_tab_component.is_some());
        kinds.set(
            SlotKinds::PREFIX_ACTIONS,
            self.create_prefix_header_action_component.is_some(),
        );
        kinds.set(
            SlotKinds::LEFT_ACTIONS,
            self.create_left_header_action_component.is_some(),
        );
        kinds.set(
            SlotKinds::RIGHT_ACTIONS,
            self.create_right_header_action_component.is_some(),
        );
        kinds.set(SlotKinds::CONTENT, self.dock.create_component.is_some());
        kinds
    }

    /// Header-action factories in prefix, left, right order.
    pub fn header_action_factories(&self) -> impl Iterator<Item = &HeaderActionsFactory> {
        [
            &self.create_prefix_header_action_component,
            &self.create_left_header_action_component,
            &self.create_right_header_action_component,
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("dock", &self.dock)
            .field("factories", &self.factory_kinds())
            .finish()
    }
}
