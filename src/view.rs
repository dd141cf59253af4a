//! Dock view - Mount/unmount lifecycle around an [`AdapterContext`].
//!
//! Mounting builds the context, takes a stylesheet lease, mounts the slot
//! outlet and the (ready-gated) children, runs the first layout pass, then
//! flips `ready` and fires the ready hook. Unmounting reverses it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, warn};

use crate::container::Viewport;
use crate::context::AdapterContext;
use crate::engine::DockEngine;
use crate::error::DockError;
use crate::props::DockViewProps;
use crate::slots::{mount_slots, show, SlotRegistry};
use crate::style::{acquire_stylesheet, ResourceLease};
use crate::types::{Cleanup, ElementId};

/// Host children rendered inside the dock once it is ready. They receive the
/// view's context, so they can drive the engine or read panel state.
pub type Children<E> = Box<dyn Fn(&AdapterContext<E>) -> Cleanup>;

pub struct DockView;

impl DockView {
    /// Mount a dock view.
    ///
    /// On error nothing stays mounted: no engine, no bindings, no lease.
    pub fn mount<E: DockEngine>(
        props: DockViewProps<E>,
        children: Option<Children<E>>,
    ) -> Result<DockViewHandle<E>, DockError> {
        let viewport = props.viewport.unwrap_or_else(Viewport::detect);

        let context = Rc::new(AdapterContext::new(props)?);
        let lease = acquire_stylesheet();

        let ready = signal(false);
        let children_cleanup = children.map(|render| {
            let ready = ready.clone();
            let context = Rc::downgrade(&context);
            show(
                move || ready.get(),
                move || match context.upgrade() {
                    Some(context) => render(&context),
                    None => Box::new(|| {}) as Cleanup,
                },
            )
        });
        let outlet = mount_slots(context.slots());

        let handle = DockViewHandle {
            context,
            ready,
            children: RefCell::new(children_cleanup),
            outlet: RefCell::new(Some(outlet)),
            lease,
            mounted: Cell::new(true),
        };

        if let Err(err) = handle.context.layout_initial(viewport) {
            warn!(error = %err, "initial layout failed; unmounting");
            handle.unmount();
            return Err(err);
        }

        handle.ready.set(true);
        handle.context.notify_ready();

        debug!(
            container = handle.context.container().element().raw(),
            width = viewport.width,
            height = viewport.height,
            "dock view mounted"
        );
        Ok(handle)
    }
}

/// A mounted dock view. Dropping it unmounts.
pub struct DockViewHandle<E: DockEngine> {
    context: Rc<AdapterContext<E>>,
    ready: Signal<bool>,
    children: RefCell<Option<Cleanup>>,
    outlet: RefCell<Option<Cleanup>>,
    lease: ResourceLease<ElementId>,
    mounted: Cell<bool>,
}

impl<E: DockEngine> DockViewHandle<E> {
    /// Unmount the outlet and children, dispose the context, release the
    /// stylesheet. Idempotent.
    pub fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }

        let outlet = self.outlet.borrow_mut().take();
        if let Some(outlet) = outlet {
            outlet();
        }
        let children = self.children.borrow_mut().take();
        if let Some(children) = children {
            children();
        }

        self.context.dispose();
        self.lease.release();

        debug!(container = self.context.container().element().raw(), "dock view unmounted");
    }

    pub fn context(&self) -> &AdapterContext<E> {
        &self.context
    }

    pub fn engine(&self) -> &Rc<E> {
        self.context.engine()
    }

    pub fn slots(&self) -> &SlotRegistry {
        self.context.slots()
    }

    /// Reactive: true once the initial layout has run.
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }
}

impl<E: DockEngine> Drop for DockViewHandle<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<E: DockEngine> fmt::Debug for DockViewHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockViewHandle")
            .field("context", &self.context)
            .field("mounted", &self.mounted.get())
            .finish()
    }
}
