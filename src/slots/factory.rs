//! Factory adapters - Engine parts that render through the slot registry.
//!
//! The engine creates parts through factory callbacks and drives them via
//! [`Part`]. A [`FactoryAdapter`] satisfies that protocol for one slot kind:
//! `init` seeds a props signal and registers one slot, `update` sets the
//! signal in place, `dispose` unregisters. The user render function only ever
//! sees a getter over the props signal, so updates never remount it.

use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};
use tracing::{debug, warn};

use super::registry::{SlotGuard, SlotRegistry, SlotRenderer};
use crate::engine::{
    DockApi, GroupApi, HeaderActionParams, HeaderActionsFactory, PanelApi, Part, SlotKinds,
    TabFactory, TabParams, WatermarkFactory, WatermarkParams,
};
use crate::types::{Callback, Cleanup, Disposable, ElementId, Getter, GroupId, PanelId};

/// User render function for a slot: receives a reactive props getter and
/// returns the fragment's cleanup.
pub type SlotRender<P> = Rc<dyn Fn(Getter<P>) -> Cleanup>;

/// One kind of engine-created slot.
pub trait SlotKind: 'static {
    /// Init params the engine hands the part.
    type Params: Clone + 'static;
    /// Props the render function observes.
    type Props: Clone + PartialEq + fmt::Debug + 'static;

    const NAME: &'static str;

    /// Build props from params plus injected capabilities.
    fn props(params: &Self::Params) -> Self::Props;

    /// Subscribe to engine emitters that should refresh `holder`.
    fn watch(_params: &Self::Params, _holder: &Signal<Self::Props>) -> Vec<Disposable> {
        Vec::new()
    }
}

// =============================================================================
// FactoryAdapter
// =============================================================================

/// A [`Part`] that mounts through the slot registry.
pub struct FactoryAdapter<K: SlotKind> {
    element: ElementId,
    registry: SlotRegistry,
    render: Option<SlotRender<K::Props>>,
    holder: Option<Signal<K::Props>>,
    guard: Option<SlotGuard>,
    watches: Vec<Disposable>,
    disposed: bool,
    _kind: PhantomData<K>,
}

impl<K: SlotKind> FactoryAdapter<K> {
    /// `render: None` registers a slot that mounts nothing.
    pub fn new(registry: SlotRegistry, render: Option<SlotRender<K::Props>>) -> Self {
        Self {
            element: ElementId::next(),
            registry,
            render,
            holder: None,
            guard: None,
            watches: Vec::new(),
            disposed: false,
            _kind: PhantomData,
        }
    }

    /// Current props. Untracked only when called outside an effect.
    pub fn props(&self) -> Option<K::Props> {
        self.holder.as_ref().map(|h| h.get())
    }

    pub fn is_registered(&self) -> bool {
        self.guard.as_ref().is_some_and(SlotGuard::is_registered)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn renderer(&self, holder: &Signal<K::Props>) -> SlotRenderer {
        match &self.render {
            Some(render) => {
                let render = render.clone();
                let holder = holder.clone();
                Rc::new(move || {
                    let holder = holder.clone();
                    render(Rc::new(move || holder.get()))
                })
            }
            None => Rc::new(|| Box::new(|| {}) as Cleanup),
        }
    }
}

impl<K: SlotKind> Part<K::Params> for FactoryAdapter<K> {
    fn element(&self) -> ElementId {
        self.element
    }

    fn init(&mut self, params: K::Params) {
        if self.disposed || self.guard.is_some() {
            warn!(kind = K::NAME, element = self.element.raw(), "init on a live or disposed part ignored");
            return;
        }

        let holder = signal(K::props(&params));
        self.watches = K::watch(&params, &holder);
        let renderer = self.renderer(&holder);
        self.guard = Some(self.registry.register(renderer));
        self.holder = Some(holder);

        debug!(kind = K::NAME, element = self.element.raw(), "slot part initialised");
    }

    fn update(&mut self, params: K::Params) {
        if let Some(holder) = &self.holder {
            holder.set(K::props(&params));
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(guard) = self.guard.take() {
            guard.unregister();
        }
        for watch in self.watches.drain(..) {
            watch.dispose();
        }
        self.holder = None;

        debug!(kind = K::NAME, element = self.element.raw(), "slot part disposed");
    }
}

impl<K: SlotKind> Drop for FactoryAdapter<K> {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================================
// Watermark
// =============================================================================

pub struct Watermark;

#[derive(Clone)]
pub struct WatermarkProps {
    pub container: Rc<dyn DockApi>,
    pub group: Option<Rc<dyn GroupApi>>,
    /// Closes the owning group, if any.
    pub close: Callback,
}

impl SlotKind for Watermark {
    type Params = WatermarkParams;
    type Props = WatermarkProps;

    const NAME: &'static str = "watermark";

    fn props(params: &WatermarkParams) -> WatermarkProps {
        let group = params.group.clone();
        let close: Callback = Rc::new(move || {
            if let Some(group) = &group {
                group.close();
            }
        });
        WatermarkProps {
            container: params.container.clone(),
            group: params.group.clone(),
            close,
        }
    }
}

impl PartialEq for WatermarkProps {
    fn eq(&self, other: &Self) -> bool {
        let same_group = match (&self.group, &other.group) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        Rc::ptr_eq(&self.container, &other.container) && same_group
    }
}

impl fmt::Debug for WatermarkProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatermarkProps")
            .field("group", &self.group.as_ref().map(|g| g.id()))
            .finish()
    }
}

// =============================================================================
// Tab
// =============================================================================

pub struct Tab;

#[derive(Clone)]
pub struct TabProps {
    pub container: Rc<dyn DockApi>,
    pub panel: Rc<dyn PanelApi>,
    pub title: Option<String>,
    /// Closes the panel.
    pub close: Callback,
}

impl SlotKind for Tab {
    type Params = TabParams;
    type Props = TabProps;

    const NAME: &'static str = "tab";

    fn props(params: &TabParams) -> TabProps {
        let panel = params.panel.clone();
        TabProps {
            container: params.container.clone(),
            panel: params.panel.clone(),
            title: params.panel.title(),
            close: Rc::new(move || panel.close()),
        }
    }
}

impl PartialEq for TabProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.container, &other.container)
            && Rc::ptr_eq(&self.panel, &other.panel)
            && self.title == other.title
    }
}

impl fmt::Debug for TabProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabProps")
            .field("panel", &self.panel.id())
            .field("title", &self.title)
            .finish()
    }
}

// =============================================================================
// Header Actions
// =============================================================================

/// Where in a group header an actions slot sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderPosition {
    Prefix,
    Left,
    Right,
}

impl HeaderPosition {
    pub const ALL: [HeaderPosition; 3] = [Self::Prefix, Self::Left, Self::Right];

    /// The factory flag this position installs.
    pub fn slot_kind(self) -> SlotKinds {
        match self {
            Self::Prefix => SlotKinds::PREFIX_ACTIONS,
            Self::Left => SlotKinds::LEFT_ACTIONS,
            Self::Right => SlotKinds::RIGHT_ACTIONS,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

pub struct HeaderActions;

#[derive(Clone)]
pub struct HeaderActionsProps {
    pub container: Rc<dyn DockApi>,
    pub group: Rc<dyn GroupApi>,
    pub group_id: GroupId,
    pub is_group_active: bool,
    pub active_panel: Option<PanelId>,
}

impl HeaderActionsProps {
    fn snapshot(container: Rc<dyn DockApi>, group: Rc<dyn GroupApi>) -> Self {
        Self {
            group_id: group.id(),
            is_group_active: group.is_active(),
            active_panel: group.active_panel(),
            container,
            group,
        }
    }
}

impl SlotKind for HeaderActions {
    type Params = HeaderActionParams;
    type Props = HeaderActionsProps;

    const NAME: &'static str = "header-actions";

    fn props(params: &HeaderActionParams) -> HeaderActionsProps {
        HeaderActionsProps::snapshot(params.container.clone(), params.group.clone())
    }

    fn watch(params: &HeaderActionParams, holder: &Signal<HeaderActionsProps>) -> Vec<Disposable> {
        // The group keeps these listeners; hold it weakly to avoid a cycle.
        let refresh = {
            let container = params.container.clone();
            let group: Weak<dyn GroupApi> = Rc::downgrade(&params.group);
            let holder = holder.clone();
            Rc::new(move || {
                if let Some(group) = group.upgrade() {
                    holder.set(HeaderActionsProps::snapshot(container.clone(), group));
                }
            })
        };

        let on_active = refresh.clone();
        let on_panel = refresh;
        vec![
            params
                .group
                .on_did_active_change(Rc::new(move |_active| on_active())),
            params
                .group
                .on_did_active_panel_change(Rc::new(move |_panel| on_panel())),
        ]
    }
}

impl PartialEq for HeaderActionsProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.container, &other.container)
            && Rc::ptr_eq(&self.group, &other.group)
            && self.group_id == other.group_id
            && self.is_group_active == other.is_group_active
            && self.active_panel == other.active_panel
    }
}

impl fmt::Debug for HeaderActionsProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderActionsProps")
            .field("group_id", &self.group_id)
            .field("is_group_active", &self.is_group_active)
            .field("active_panel", &self.active_panel)
            .finish()
    }
}

// =============================================================================
// Factory Builders
// =============================================================================

/// Watermark factory. Always installed; with no render function the slot
/// mounts nothing.
pub fn watermark_factory(
    registry: &SlotRegistry,
    render: Option<SlotRender<WatermarkProps>>,
) -> WatermarkFactory {
    let registry = registry.clone();
    Rc::new(move || {
        Box::new(FactoryAdapter::<Watermark>::new(registry.clone(), render.clone()))
            as Box<dyn Part<WatermarkParams>>
    })
}

/// Tab factory. Answers `None` when no render function was supplied so the
/// engine falls back to its built-in tab.
pub fn tab_factory(registry: &SlotRegistry, render: Option<SlotRender<TabProps>>) -> TabFactory {
    let registry = registry.clone();
    Rc::new(move |_panel: &PanelId| {
        render.as_ref().map(|render| {
            Box::new(FactoryAdapter::<Tab>::new(registry.clone(), Some(render.clone())))
                as Box<dyn Part<TabParams>>
        })
    })
}

/// Header-actions factory for one position.
pub fn header_actions_factory(
    registry: &SlotRegistry,
    position: HeaderPosition,
    render: SlotRender<HeaderActionsProps>,
) -> HeaderActionsFactory {
    let registry = registry.clone();
    Rc::new(move |group: &GroupId| {
        debug!(position = position.as_label(), group = %group, "creating header actions");
        Box::new(FactoryAdapter::<HeaderActions>::new(
            registry.clone(),
            Some(render.clone()),
        )) as Box<dyn Part<HeaderActionParams>>
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::outlet::mount_slots;
    use spark_signals::effect;
    use std::cell::{Cell, RefCell};

    struct StubDock;

    impl DockApi for StubDock {
        fn panel_ids(&self) -> Vec<PanelId> {
            Vec::new()
        }
        fn group_ids(&self) -> Vec<GroupId> {
            Vec::new()
        }
        fn active_group(&self) -> Option<GroupId> {
            None
        }
        fn close_panel(&self, _panel: &PanelId) {}
        fn close_group(&self, _group: &GroupId) {}
    }

    #[derive(Default)]
    struct StubGroup {
        active: Cell<bool>,
        closed: Cell<usize>,
        active_listeners: Rc<RefCell<Vec<Rc<dyn Fn(bool)>>>>,
    }

    impl StubGroup {
        fn activate(&self, active: bool) {
            self.active.set(active);
            let listeners = self.active_listeners.borrow().clone();
            for listener in listeners {
                listener(active);
            }
        }
    }

    impl GroupApi for StubGroup {
        fn id(&self) -> GroupId {
            GroupId::new("g1")
        }
        fn is_active(&self) -> bool {
            self.active.get()
        }
        fn active_panel(&self) -> Option<PanelId> {
            None
        }
        fn panel_ids(&self) -> Vec<PanelId> {
            Vec::new()
        }
        fn close(&self) {
            self.closed.set(self.closed.get() + 1);
        }
        fn on_did_active_change(&self, listener: Rc<dyn Fn(bool)>) -> Disposable {
            self.active_listeners.borrow_mut().push(listener);
            let listeners = self.active_listeners.clone();
            Disposable::new(move || listeners.borrow_mut().clear())
        }
        fn on_did_active_panel_change(&self, _listener: Rc<dyn Fn(Option<PanelId>)>) -> Disposable {
            Disposable::noop()
        }
    }

    fn watermark_params(group: &Rc<StubGroup>) -> WatermarkParams {
        WatermarkParams {
            container: Rc::new(StubDock),
            group: Some(group.clone() as Rc<dyn GroupApi>),
        }
    }

    #[test]
    fn test_init_registers_one_slot() {
        let registry = SlotRegistry::new();
        let group = Rc::new(StubGroup::default());
        let mut part = FactoryAdapter::<Watermark>::new(registry.clone(), None);

        part.init(watermark_params(&group));
        assert_eq!(registry.len(), 1);
        assert!(part.is_registered());
    }

    #[test]
    fn test_injected_close_reaches_group() {
        let registry = SlotRegistry::new();
        let group = Rc::new(StubGroup::default());
        let mut part = FactoryAdapter::<Watermark>::new(registry, None);
        part.init(watermark_params(&group));

        let props = part.props().unwrap();
        (props.close)();
        assert_eq!(group.closed.get(), 1);
    }

    #[test]
    fn test_update_does_not_remount() {
        let registry = SlotRegistry::new();
        let outlet = mount_slots(&registry);
        let group = Rc::new(StubGroup::default());

        let mounts = Rc::new(Cell::new(0));
        let seen_group = Rc::new(RefCell::new(None));
        let mounts_clone = mounts.clone();
        let seen_clone = seen_group.clone();
        let render: SlotRender<WatermarkProps> = Rc::new(move |props| {
            mounts_clone.set(mounts_clone.get() + 1);
            let seen = seen_clone.clone();
            let _effect = effect(move || {
                *seen.borrow_mut() = props().group.map(|g| g.id());
            });
            Box::new(|| {}) as Cleanup
        });

        let mut part = FactoryAdapter::<Watermark>::new(registry.clone(), Some(render));
        part.init(watermark_params(&group));
        assert_eq!(mounts.get(), 1);
        assert_eq!(*seen_group.borrow(), Some(GroupId::new("g1")));

        part.update(WatermarkParams {
            container: Rc::new(StubDock),
            group: None,
        });
        assert_eq!(mounts.get(), 1);
        assert_eq!(*seen_group.borrow(), None);
        assert_eq!(registry.len(), 1);

        outlet();
    }

    #[test]
    fn test_update_reaches_fragment_after_other_slots_change() {
        let registry = SlotRegistry::new();
        let outlet = mount_slots(&registry);
        let group = Rc::new(StubGroup::default());

        let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let render: SlotRender<WatermarkProps> = Rc::new(move |props| {
            let seen = seen_clone.clone();
            let _effect = effect(move || seen.borrow_mut().push(props().group.is_some()));
            Box::new(|| {}) as Cleanup
        });

        let mut a = FactoryAdapter::<Watermark>::new(registry.clone(), Some(render));
        a.init(watermark_params(&group));

        let mut b = FactoryAdapter::<Watermark>::new(registry.clone(), None);
        b.init(watermark_params(&group));
        b.dispose();

        a.update(WatermarkParams {
            container: Rc::new(StubDock),
            group: None,
        });
        assert_eq!(*seen.borrow(), vec![true, false]);

        outlet();
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let registry = SlotRegistry::new();
        let group = Rc::new(StubGroup::default());
        let mut a = FactoryAdapter::<Watermark>::new(registry.clone(), None);
        let mut b = FactoryAdapter::<Watermark>::new(registry.clone(), None);
        a.init(watermark_params(&group));
        b.init(watermark_params(&group));

        a.dispose();
        a.dispose();
        assert_eq!(registry.len(), 1);
        assert!(b.is_registered());
        assert!(a.is_disposed());
    }

    #[test]
    fn test_init_after_dispose_ignored() {
        let registry = SlotRegistry::new();
        let group = Rc::new(StubGroup::default());
        let mut part = FactoryAdapter::<Watermark>::new(registry.clone(), None);
        part.dispose();
        part.init(watermark_params(&group));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_drop_unregisters() {
        let registry = SlotRegistry::new();
        let group = Rc::new(StubGroup::default());
        {
            let mut part = FactoryAdapter::<Watermark>::new(registry.clone(), None);
            part.init(watermark_params(&group));
            assert_eq!(registry.len(), 1);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_header_props_follow_group_activation() {
        let registry = SlotRegistry::new();
        let group = Rc::new(StubGroup::default());
        let mut part = FactoryAdapter::<HeaderActions>::new(registry, None);
        part.init(HeaderActionParams {
            container: Rc::new(StubDock),
            group: group.clone(),
        });
        assert!(!part.props().unwrap().is_group_active);

        group.activate(true);
        assert!(part.props().unwrap().is_group_active);

        part.dispose();
        assert!(group.active_listeners.borrow().is_empty());
    }

    #[test]
    fn test_tab_factory_defers_to_builtin_without_render() {
        let registry = SlotRegistry::new();
        let builtin = tab_factory(&registry, None);
        assert!(builtin(&PanelId::new("p")).is_none());

        let custom = tab_factory(&registry, Some(Rc::new(|_props| Box::new(|| {}) as Cleanup)));
        assert!(custom(&PanelId::new("p")).is_some());
    }

    #[test]
    fn test_header_position_kinds() {
        let all = HeaderPosition::ALL
            .iter()
            .fold(SlotKinds::empty(), |acc, p| acc | p.slot_kind());
        assert_eq!(all, SlotKinds::HEADER_ACTIONS);
    }
}
