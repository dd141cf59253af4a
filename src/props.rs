//! Dock view props.
//!
//! Configuration follows the component-props pattern: a plain struct with a
//! `Default` and struct-update syntax, plus a few builder helpers for the
//! closure-typed fields.
//!
//! ```ignore
//! let props = DockViewProps::<MyEngine> {
//!     options: DockOptions { class_name: Some("dockview-theme-dark".into()), ..Default::default() },
//!     flush_policy: FlushPolicy::Frame,
//!     ..Default::default()
//! }
//! .with_watermark(|props| render_watermark(props));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::container::{ContainerStyle, Viewport};
use crate::engine::{DockApi, DockEngine, DockEvent, DockOptions, EngineEvent, EngineOptions};
use crate::events::EventListeners;
use crate::scheduler::FlushPolicy;
use crate::slots::{HeaderActionsProps, HeaderPosition, SlotRender, TabProps, WatermarkProps};
use crate::types::{Cleanup, Getter};

/// Payload of the ready and dispose hooks.
pub struct ReadyEvent<'a, E> {
    pub engine: &'a E,
}

impl<E: DockEngine> ReadyEvent<'_, E> {
    pub fn api(&self) -> Rc<dyn DockApi> {
        self.engine.api()
    }
}

/// Called with the fully assembled options just before engine construction.
pub type BeforeCreateHook<E> = Rc<dyn Fn(&mut EngineOptions, &DockViewProps<E>)>;

/// Called with the constructed engine.
pub type EngineHook<E> = Rc<dyn Fn(&ReadyEvent<'_, E>)>;

/// Everything a dock view is configured with.
pub struct DockViewProps<E> {
    /// Forwarded to the engine unmodified.
    pub options: DockOptions,

    pub on_before_create: Option<BeforeCreateHook<E>>,
    pub on_ready: Option<EngineHook<E>>,
    pub on_dispose: Option<EngineHook<E>>,

    pub watermark: Option<SlotRender<WatermarkProps>>,
    /// When `None` the engine renders its built-in tab.
    pub tab: Option<SlotRender<TabProps>>,
    pub prefix_header_actions: Option<SlotRender<HeaderActionsProps>>,
    pub left_header_actions: Option<SlotRender<HeaderActionsProps>>,
    pub right_header_actions: Option<SlotRender<HeaderActionsProps>>,

    pub listeners: EventListeners,

    /// When queued panel open-state writes are applied.
    pub flush_policy: FlushPolicy,
    pub container: ContainerStyle,
    /// Overrides terminal size detection.
    pub viewport: Option<Viewport>,
}

impl<E> Default for DockViewProps<E> {
    fn default() -> Self {
        Self {
            options: DockOptions::default(),
            on_before_create: None,
            on_ready: None,
            on_dispose: None,
            watermark: None,
            tab: None,
            prefix_header_actions: None,
            left_header_actions: None,
            right_header_actions: None,
            listeners: EventListeners::new(),
            flush_policy: FlushPolicy::default(),
            container: ContainerStyle::default(),
            viewport: None,
        }
    }
}

impl<E> Clone for DockViewProps<E> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            on_before_create: self.on_before_create.clone(),
            on_ready: self.on_ready.clone(),
            on_dispose: self.on_dispose.clone(),
            watermark: self.watermark.clone(),
            tab: self.tab.clone(),
            prefix_header_actions: self.prefix_header_actions.clone(),
            left_header_actions: self.left_header_actions.clone(),
            right_header_actions: self.right_header_actions.clone(),
            listeners: self.listeners.clone(),
            flush_policy: self.flush_policy,
            container: self.container.clone(),
            viewport: self.viewport,
        }
    }
}

impl<E: DockEngine> DockViewProps<E> {
    pub fn on_before_create(
        mut self,
        hook: impl Fn(&mut EngineOptions, &DockViewProps<E>) + 'static,
    ) -> Self {
        self.on_before_create = Some(Rc::new(hook));
        self
    }

    pub fn on_ready(mut self, hook: impl Fn(&ReadyEvent<'_, E>) + 'static) -> Self {
        self.on_ready = Some(Rc::new(hook));
        self
    }

    pub fn on_dispose(mut self, hook: impl Fn(&ReadyEvent<'_, E>) + 'static) -> Self {
        self.on_dispose = Some(Rc::new(hook));
        self
    }
}

impl<E> DockViewProps<E> {
    pub fn with_watermark(mut self, render: impl Fn(Getter<WatermarkProps>) -> Cleanup + 'static) -> Self {
        self.watermark = Some(Rc::new(render));
        self
    }

    pub fn with_tab(mut self, render: impl Fn(Getter<TabProps>) -> Cleanup + 'static) -> Self {
        self.tab = Some(Rc::new(render));
        self
    }

    pub fn with_header_actions(
        mut self,
        position: HeaderPosition,
        render: impl Fn(Getter<HeaderActionsProps>) -> Cleanup + 'static,
    ) -> Self {
        let render: SlotRender<HeaderActionsProps> = Rc::new(render);
        match position {
            HeaderPosition::Prefix => self.prefix_header_actions = Some(render),
            HeaderPosition::Left => self.left_header_actions = Some(render),
            HeaderPosition::Right => self.right_header_actions = Some(render),
        }
        self
    }

    /// Render function for a header position, if supplied.
    pub fn header_actions(&self, position: HeaderPosition) -> Option<&SlotRender<HeaderActionsProps>> {
        match position {
            HeaderPosition::Prefix => self.prefix_header_actions.as_ref(),
            HeaderPosition::Left => self.left_header_actions.as_ref(),
            HeaderPosition::Right => self.right_header_actions.as_ref(),
        }
    }

    /// Install an event listener. Later changes go through `listeners`.
    pub fn on(self, event: DockEvent, f: impl Fn(&EngineEvent) + 'static) -> Self {
        self.listeners.on(event, f);
        self
    }
}

impl<E> fmt::Debug for DockViewProps<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockViewProps")
            .field("options", &self.options)
            .field("on_before_create", &self.on_before_create.is_some())
            .field("on_ready", &self.on_ready.is_some())
            .field("on_dispose", &self.on_dispose.is_some())
            .field("watermark", &self.watermark.is_some())
            .field("tab", &self.tab.is_some())
            .field("prefix_header_actions", &self.prefix_header_actions.is_some())
            .field("left_header_actions", &self.left_header_actions.is_some())
            .field("right_header_actions", &self.right_header_actions.is_some())
            .field("listeners", &self.listeners)
            .field("flush_policy", &self.flush_policy)
            .field("container", &self.container)
            .field("viewport", &self.viewport)
            .finish()
    }
}
