//! Scripted in-memory engine for tests.
//!
//! Behaves like the real engine at the adapter boundary: it calls factories
//! when groups, panels and empty groups appear, disposes parts on removal and
//! teardown, and fires the enumerated events. No layout algorithm.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{
    DockApi, DockEngine, DockEvent, EngineEvent, EngineOptions, GroupApi, HeaderActionParams,
    Listener, PanelApi, Part, SlotKinds, TabParams, WatermarkParams,
};
use crate::container::Container;
use crate::error::EngineError;
use crate::types::{Disposable, ElementId, GroupId, PanelId};

thread_local! {
    static FAIL_NEXT_CREATE: Cell<bool> = const { Cell::new(false) };
}

type SharedState = Rc<RefCell<FakeState>>;

struct FakeState {
    options: EngineOptions,
    container: ElementId,
    api: Rc<FakeApi>,
    groups: Vec<FakeGroup>,
    listeners: Vec<(u64, DockEvent, Listener)>,
    next_listener: u64,
    layouts: Vec<(f32, f32)>,
    dispose_calls: usize,
    disposed: bool,
    builtin_tabs: usize,
    custom_tabs: usize,
}

struct FakeGroup {
    api: Rc<FakeGroupApi>,
    panels: Vec<FakePanel>,
    watermark: Option<Box<dyn Part<WatermarkParams>>>,
    header_actions: Vec<Box<dyn Part<HeaderActionParams>>>,
}

struct FakePanel {
    api: Rc<FakePanelApi>,
    tab: Option<Box<dyn Part<TabParams>>>,
}

// =============================================================================
// Engine
// =============================================================================

pub struct FakeEngine {
    state: SharedState,
}

impl FakeEngine {
    /// Make the next `create` on this thread fail.
    pub fn fail_next_create() {
        FAIL_NEXT_CREATE.with(|f| f.set(true));
    }

    pub fn add_group(&self, group: &str) {
        ops::add_group(&self.state, GroupId::new(group));
    }

    pub fn add_panel(&self, group: &str, panel: &str) {
        ops::add_panel(&self.state, GroupId::new(group), PanelId::new(panel));
    }

    pub fn remove_panel(&self, panel: &str) {
        ops::remove_panel(&self.state, &PanelId::new(panel));
    }

    /// Remove every panel of a group but keep the group.
    pub fn close_all_panels(&self, group: &str) {
        let group = GroupId::new(group);
        let panels = ops::group_panels(&self.state, &group);
        for panel in panels {
            ops::remove_panel(&self.state, &panel);
        }
    }

    pub fn set_active_group(&self, group: &str) {
        ops::set_active_group(&self.state, Some(GroupId::new(group)));
    }

    /// Fire an arbitrary event.
    pub fn emit(&self, event: DockEvent, payload: EngineEvent) {
        ops::emit(&self.state, event, payload);
    }

    pub fn group_api(&self, group: &str) -> Option<Rc<dyn GroupApi>> {
        let state = self.state.borrow();
        state
            .groups
            .iter()
            .find(|g| g.api.id.as_str() == group)
            .map(|g| g.api.clone() as Rc<dyn GroupApi>)
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.group_api(group).is_some()
    }

    pub fn has_watermark(&self, group: &str) -> bool {
        let state = self.state.borrow();
        state
            .groups
            .iter()
            .any(|g| g.api.id.as_str() == group && g.watermark.is_some())
    }

    pub fn dispose_calls(&self) -> usize {
        self.state.borrow().dispose_calls
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    pub fn layouts(&self) -> Vec<(f32, f32)> {
        self.state.borrow().layouts.clone()
    }

    pub fn builtin_tabs(&self) -> usize {
        self.state.borrow().builtin_tabs
    }

    pub fn custom_tabs(&self) -> usize {
        self.state.borrow().custom_tabs
    }

    pub fn listener_count(&self, event: DockEvent) -> usize {
        let state = self.state.borrow();
        state.listeners.iter().filter(|(_, e, _)| *e == event).count()
    }

    pub fn factory_kinds(&self) -> SlotKinds {
        self.state.borrow().options.factory_kinds()
    }

    pub fn options_class_name(&self) -> Option<String> {
        self.state.borrow().options.dock.class_name.clone()
    }

    pub fn container_element(&self) -> ElementId {
        self.state.borrow().container
    }
}

impl DockEngine for FakeEngine {
    fn create(container: &Container, options: EngineOptions) -> Result<Self, EngineError> {
        if FAIL_NEXT_CREATE.with(|f| f.replace(false)) {
            return Err(EngineError::Other("scripted failure".into()));
        }

        let state = Rc::new_cyclic(|weak: &Weak<RefCell<FakeState>>| {
            RefCell::new(FakeState {
                options,
                container: container.element(),
                api: Rc::new(FakeApi {
                    state: weak.clone(),
                }),
                groups: Vec::new(),
                listeners: Vec::new(),
                next_listener: 0,
                layouts: Vec::new(),
                dispose_calls: 0,
                disposed: false,
                builtin_tabs: 0,
                custom_tabs: 0,
            })
        });
        Ok(Self { state })
    }

    fn layout(&self, width: f32, height: f32) {
        self.state.borrow_mut().layouts.push((width, height));
    }

    fn subscribe(&self, event: DockEvent, listener: Listener) -> Disposable {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.push((id, event, listener));
            id
        };

        let weak = Rc::downgrade(&self.state);
        Disposable::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.retain(|(lid, _, _)| *lid != id);
            }
        })
    }

    fn api(&self) -> Rc<dyn DockApi> {
        self.state.borrow().api.clone()
    }

    fn dispose(&self) {
        let groups = {
            let mut state = self.state.borrow_mut();
            state.dispose_calls += 1;
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.listeners.clear();
            std::mem::take(&mut state.groups)
        };
        for group in groups {
            ops::dispose_group_parts(group);
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

mod ops {
    use super::*;

    fn container_api(state: &SharedState) -> Rc<dyn DockApi> {
        state.borrow().api.clone()
    }

    pub(super) fn emit(state: &SharedState, event: DockEvent, payload: EngineEvent) {
        let targets: Vec<Listener> = state
            .borrow()
            .listeners
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, l)| l.clone())
            .collect();
        for listener in targets {
            listener.call(&payload);
        }
    }

    fn create_watermark(
        state: &SharedState,
        group: &Rc<FakeGroupApi>,
    ) -> Option<Box<dyn Part<WatermarkParams>>> {
        let factory = state.borrow().options.create_watermark_component.clone()?;
        let mut part = factory();
        part.init(WatermarkParams {
            container: container_api(state),
            group: Some(group.clone() as Rc<dyn GroupApi>),
        });
        Some(part)
    }

    pub(super) fn add_group(state: &SharedState, id: GroupId) {
        if state.borrow().groups.iter().any(|g| g.api.id == id) {
            return;
        }

        let api = Rc::new(FakeGroupApi::new(id.clone(), Rc::downgrade(state)));
        let factories: Vec<_> = state
            .borrow()
            .options
            .header_action_factories()
            .cloned()
            .collect();

        let mut header_actions = Vec::new();
        for factory in factories {
            let mut part = factory(&id);
            part.init(HeaderActionParams {
                container: container_api(state),
                group: api.clone(),
            });
            header_actions.push(part);
        }

        let watermark = create_watermark(state, &api);
        state.borrow_mut().groups.push(FakeGroup {
            api,
            panels: Vec::new(),
            watermark,
            header_actions,
        });
        emit(state, DockEvent::DidAddGroup, EngineEvent::Group(id));
    }

    pub(super) fn add_panel(state: &SharedState, group: GroupId, panel: PanelId) {
        add_group(state, group.clone());

        let api = Rc::new(FakePanelApi {
            id: panel.clone(),
            group: group.clone(),
            state: Rc::downgrade(state),
        });

        let factory = state.borrow().options.create_tab_component.clone();
        let tab = match factory.and_then(|f| f(&panel)) {
            Some(mut part) => {
                part.init(TabParams {
                    container: container_api(state),
                    panel: api.clone(),
                });
                state.borrow_mut().custom_tabs += 1;
                Some(part)
            }
            None => {
                state.borrow_mut().builtin_tabs += 1;
                None
            }
        };

        let (watermark, group_api) = {
            let mut s = state.borrow_mut();
            let Some(g) = s.groups.iter_mut().find(|g| g.api.id == group) else {
                return;
            };
            g.panels.push(FakePanel { api, tab });
            (g.watermark.take(), g.api.clone())
        };
        if let Some(mut watermark) = watermark {
            watermark.dispose();
        }

        group_api.set_active_panel(Some(panel.clone()));
        emit(state, DockEvent::DidAddPanel, EngineEvent::Panel(panel.clone()));
        emit(
            state,
            DockEvent::DidActivePanelChange,
            EngineEvent::ActivePanel(Some(panel)),
        );
    }

    pub(super) fn group_panels(state: &SharedState, group: &GroupId) -> Vec<PanelId> {
        state
            .borrow()
            .groups
            .iter()
            .find(|g| &g.api.id == group)
            .map(|g| g.panels.iter().map(|p| p.api.id.clone()).collect())
            .unwrap_or_default()
    }

    pub(super) fn remove_panel(state: &SharedState, panel: &PanelId) {
        let removed = {
            let mut s = state.borrow_mut();
            s.groups.iter_mut().find_map(|g| {
                let index = g.panels.iter().position(|p| &p.api.id == panel)?;
                let removed = g.panels.remove(index);
                let next_active = g.panels.last().map(|p| p.api.id.clone());
                Some((removed, g.api.clone(), next_active))
            })
        };
        let Some((removed, group_api, next_active)) = removed else {
            return;
        };

        if let Some(mut tab) = removed.tab {
            tab.dispose();
        }
        group_api.set_active_panel(next_active.clone());

        if next_active.is_none() {
            let watermark = create_watermark(state, &group_api);
            let mut s = state.borrow_mut();
            if let Some(g) = s.groups.iter_mut().find(|g| g.api.id == group_api.id) {
                g.watermark = watermark;
            }
        }

        emit(state, DockEvent::DidRemovePanel, EngineEvent::Panel(panel.clone()));
    }

    pub(super) fn remove_group(state: &SharedState, group: &GroupId) {
        let removed = {
            let mut s = state.borrow_mut();
            let index = s.groups.iter().position(|g| &g.api.id == group);
            index.map(|i| s.groups.remove(i))
        };
        let Some(removed) = removed else {
            return;
        };

        let panels: Vec<PanelId> = removed.panels.iter().map(|p| p.api.id.clone()).collect();
        dispose_group_parts(removed);
        for panel in panels {
            emit(state, DockEvent::DidRemovePanel, EngineEvent::Panel(panel));
        }
        emit(state, DockEvent::DidRemoveGroup, EngineEvent::Group(group.clone()));
    }

    pub(super) fn dispose_group_parts(group: FakeGroup) {
        let FakeGroup {
            panels,
            watermark,
            header_actions,
            ..
        } = group;
        for panel in panels {
            if let Some(mut tab) = panel.tab {
                tab.dispose();
            }
        }
        if let Some(mut watermark) = watermark {
            watermark.dispose();
        }
        for mut part in header_actions {
            part.dispose();
        }
    }

    pub(super) fn set_active_group(state: &SharedState, active: Option<GroupId>) {
        let apis: Vec<Rc<FakeGroupApi>> =
            state.borrow().groups.iter().map(|g| g.api.clone()).collect();
        for api in apis {
            api.set_active(Some(&api.id) == active.as_ref());
        }
        emit(state, DockEvent::DidActiveGroupChange, EngineEvent::ActiveGroup(active));
    }
}

// =============================================================================
// API Objects
// =============================================================================

struct FakeApi {
    state: Weak<RefCell<FakeState>>,
}

impl DockApi for FakeApi {
    fn panel_ids(&self) -> Vec<PanelId> {
        let Some(state) = self.state.upgrade() else {
            return Vec::new();
        };
        let s = state.borrow();
        s.groups
            .iter()
            .flat_map(|g| g.panels.iter().map(|p| p.api.id.clone()))
            .collect()
    }

    fn group_ids(&self) -> Vec<GroupId> {
        let Some(state) = self.state.upgrade() else {
            return Vec::new();
        };
        let s = state.borrow();
        s.groups.iter().map(|g| g.api.id.clone()).collect()
    }

    fn active_group(&self) -> Option<GroupId> {
        let state = self.state.upgrade()?;
        let s = state.borrow();
        s.groups.iter().find(|g| g.api.active.get()).map(|g| g.api.id.clone())
    }

    fn close_panel(&self, panel: &PanelId) {
        if let Some(state) = self.state.upgrade() {
            ops::remove_panel(&state, panel);
        }
    }

    fn close_group(&self, group: &GroupId) {
        if let Some(state) = self.state.upgrade() {
            ops::remove_group(&state, group);
        }
    }
}

type Subscribers<T> = RefCell<Vec<(u64, Rc<dyn Fn(T)>)>>;

struct FakeGroupApi {
    id: GroupId,
    state: Weak<RefCell<FakeState>>,
    active: Cell<bool>,
    active_panel: RefCell<Option<PanelId>>,
    active_subscribers: Rc<Subscribers<bool>>,
    panel_subscribers: Rc<Subscribers<Option<PanelId>>>,
    next_subscriber: Cell<u64>,
}

impl FakeGroupApi {
    fn new(id: GroupId, state: Weak<RefCell<FakeState>>) -> Self {
        Self {
            id,
            state,
            active: Cell::new(false),
            active_panel: RefCell::new(None),
            active_subscribers: Rc::new(RefCell::new(Vec::new())),
            panel_subscribers: Rc::new(RefCell::new(Vec::new())),
            next_subscriber: Cell::new(0),
        }
    }

    fn set_active(&self, active: bool) {
        if self.active.replace(active) == active {
            return;
        }
        let subscribers: Vec<_> = self
            .active_subscribers
            .borrow()
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        for f in subscribers {
            f(active);
        }
    }

    fn set_active_panel(&self, panel: Option<PanelId>) {
        if *self.active_panel.borrow() == panel {
            return;
        }
        *self.active_panel.borrow_mut() = panel.clone();
        let subscribers: Vec<_> = self
            .panel_subscribers
            .borrow()
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        for f in subscribers {
            f(panel.clone());
        }
    }

    fn add_subscriber<T: 'static>(
        &self,
        list: &Rc<Subscribers<T>>,
        listener: Rc<dyn Fn(T)>,
    ) -> Disposable {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        list.borrow_mut().push((id, listener));

        let weak = Rc::downgrade(list);
        Disposable::new(move || {
            if let Some(list) = weak.upgrade() {
                list.borrow_mut().retain(|(sid, _)| *sid != id);
            }
        })
    }

    fn subscriber_count(&self) -> usize {
        self.active_subscribers.borrow().len() + self.panel_subscribers.borrow().len()
    }
}

impl GroupApi for FakeGroupApi {
    fn id(&self) -> GroupId {
        self.id.clone()
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn active_panel(&self) -> Option<PanelId> {
        self.active_panel.borrow().clone()
    }

    fn panel_ids(&self) -> Vec<PanelId> {
        match self.state.upgrade() {
            Some(state) => ops::group_panels(&state, &self.id),
            None => Vec::new(),
        }
    }

    fn close(&self) {
        if let Some(state) = self.state.upgrade() {
            ops::remove_group(&state, &self.id);
        }
    }

    fn on_did_active_change(&self, listener: Rc<dyn Fn(bool)>) -> Disposable {
        self.add_subscriber(&self.active_subscribers, listener)
    }

    fn on_did_active_panel_change(&self, listener: Rc<dyn Fn(Option<PanelId>)>) -> Disposable {
        self.add_subscriber(&self.panel_subscribers, listener)
    }
}

struct FakePanelApi {
    id: PanelId,
    group: GroupId,
    state: Weak<RefCell<FakeState>>,
}

impl PanelApi for FakePanelApi {
    fn id(&self) -> PanelId {
        self.id.clone()
    }

    fn title(&self) -> Option<String> {
        Some(format!("Panel {}", self.id))
    }

    fn group(&self) -> Option<GroupId> {
        Some(self.group.clone())
    }

    fn close(&self) {
        if let Some(state) = self.state.upgrade() {
            ops::remove_panel(&state, &self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerStyle;

    struct CountingPart {
        element: ElementId,
        disposed: Rc<Cell<usize>>,
    }

    impl<P> Part<P> for CountingPart {
        fn element(&self) -> ElementId {
            self.element
        }
        fn init(&mut self, _params: P) {}
        fn dispose(&mut self) {
            self.disposed.set(self.disposed.get() + 1);
        }
    }

    #[test]
    fn test_watermark_follows_group_emptiness() {
        let disposed = Rc::new(Cell::new(0));
        let disposed_clone = disposed.clone();
        let mut options = EngineOptions::default();
        options.create_watermark_component = Some(Rc::new(move || {
            Box::new(CountingPart {
                element: ElementId::next(),
                disposed: disposed_clone.clone(),
            }) as Box<dyn Part<WatermarkParams>>
        }));

        let container = Container::new(ContainerStyle::default()).unwrap();
        let engine = FakeEngine::create(&container, options).unwrap();

        engine.add_group("g");
        assert!(engine.has_watermark("g"));

        engine.add_panel("g", "p");
        assert!(!engine.has_watermark("g"));
        assert_eq!(disposed.get(), 1);
        assert_eq!(engine.builtin_tabs(), 1);

        engine.remove_panel("p");
        assert!(engine.has_watermark("g"));

        engine.dispose();
        engine.dispose();
        assert_eq!(disposed.get(), 2);
        assert_eq!(engine.dispose_calls(), 2);
    }

    #[test]
    fn test_group_api_subscriptions_dispose() {
        let container = Container::new(ContainerStyle::default()).unwrap();
        let engine = FakeEngine::create(&container, EngineOptions::default()).unwrap();
        engine.add_group("g");

        let api = {
            let state = engine.state.borrow();
            state.groups[0].api.clone()
        };
        let d = api.on_did_active_change(Rc::new(|_| {}));
        assert_eq!(api.subscriber_count(), 1);
        d.dispose();
        assert_eq!(api.subscriber_count(), 0);
    }
}
