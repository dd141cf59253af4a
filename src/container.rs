//! Container node - The element the engine is constructed into.
//!
//! The container is a single-node Taffy tree styled from [`ContainerStyle`].
//! Measuring it against a [`Viewport`] gives the size the engine receives in
//! its initial layout pass.

use std::cell::{Cell, RefCell};

use taffy::{AvailableSpace, Dimension as TaffyDimension, NodeId, Size, Style, TaffyTree};
use tracing::trace;

use crate::error::DockError;
use crate::types::{Dimension, ElementId};

/// Fallback when the terminal size cannot be read.
const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 80,
    height: 24,
};

/// Space available to the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Current terminal size, or 80x24 if it cannot be read.
    pub fn detect() -> Self {
        crossterm::terminal::size()
            .map(|(width, height)| Self { width, height })
            .unwrap_or(FALLBACK_VIEWPORT)
    }
}

/// Style of the container node.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerStyle {
    pub width: Dimension,
    pub height: Dimension,
    pub class_name: Option<String>,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            width: Dimension::Percent(100.0),
            height: Dimension::Percent(100.0),
            class_name: None,
        }
    }
}

fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Cells(n) => TaffyDimension::Length(n as f32),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

/// The container node owned by one dock context.
pub struct Container {
    element: ElementId,
    style: ContainerStyle,
    tree: RefCell<TaffyTree<()>>,
    root: NodeId,
    measured: Cell<Option<(f32, f32)>>,
}

impl Container {
    pub fn new(style: ContainerStyle) -> Result<Self, DockError> {
        let mut tree: TaffyTree<()> = TaffyTree::new();
        let root = tree
            .new_leaf(Style {
                size: Size {
                    width: to_taffy_dimension(style.width),
                    height: to_taffy_dimension(style.height),
                },
                ..Default::default()
            })
            .map_err(|e| DockError::Layout(format!("{e:?}")))?;

        Ok(Self {
            element: ElementId::next(),
            style,
            tree: RefCell::new(tree),
            root,
            measured: Cell::new(None),
        })
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn style(&self) -> &ContainerStyle {
        &self.style
    }

    pub fn class_name(&self) -> Option<&str> {
        self.style.class_name.as_deref()
    }

    /// Compute the container size within `viewport`.
    pub fn measure(&self, viewport: Viewport) -> Result<(f32, f32), DockError> {
        let mut tree = self.tree.borrow_mut();
        let available = Size {
            width: AvailableSpace::Definite(viewport.width as f32),
            height: AvailableSpace::Definite(viewport.height as f32),
        };
        tree.compute_layout(self.root, available)
            .map_err(|e| DockError::Layout(format!("{e:?}")))?;

        let layout = tree
            .layout(self.root)
            .map_err(|e| DockError::Layout(format!("{e:?}")))?;
        let size = (layout.size.width.round(), layout.size.height.round());

        trace!(element = self.element.raw(), width = size.0, height = size.1, "container measured");
        self.measured.set(Some(size));
        Ok(size)
    }

    /// Size from the last [`measure`](Self::measure), if any.
    pub fn measured_size(&self) -> Option<(f32, f32)> {
        self.measured.get()
    }
}
