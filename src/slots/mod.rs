//! Slots - Engine-created fragments rendered by the host tree.
//!
//! - [`registry`] - ordered, identity-keyed slot store
//! - [`factory`] - engine parts that register into the store
//! - [`outlet`] - `show`/`each` and the root outlet that mounts entries

pub mod factory;
pub mod outlet;
pub mod registry;

pub use factory::{
    header_actions_factory, tab_factory, watermark_factory, FactoryAdapter, HeaderActions,
    HeaderActionsProps, HeaderPosition, SlotKind, SlotRender, Tab, TabProps, Watermark,
    WatermarkProps,
};
pub use outlet::{each, mount_slots, show};
pub use registry::{SlotEntry, SlotGuard, SlotRegistry, SlotRenderer};
