//! Error types for the dock adapter.
//!
//! - [`EngineError`] is what a [`DockEngine`](crate::engine::DockEngine)
//!   implementation reports when it cannot be constructed.
//! - [`DockError`] is what the adapter itself returns.
//!
//! Both expose `as_label()`, a short stable snake_case label for logs.

use thiserror::Error;

/// Errors raised by the docking engine during construction.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The assembled options were rejected.
    #[error("engine rejected options: {reason}")]
    InvalidOptions { reason: String },

    /// The container node cannot host the engine.
    #[error("container cannot host the engine: {reason}")]
    Container { reason: String },

    /// Any other construction failure.
    #[error("engine construction failed: {0}")]
    Other(String),
}

impl EngineError {
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::InvalidOptions { .. } => "engine_invalid_options",
            EngineError::Container { .. } => "engine_container",
            EngineError::Other(_) => "engine_other",
        }
    }
}

/// Errors produced by the adapter layer.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DockError {
    /// Engine construction failed; no context was produced.
    #[error("engine initialization failed: {0}")]
    EngineInit(#[from] EngineError),

    /// The container node could not be created or measured.
    #[error("container layout failed: {0}")]
    Layout(String),

    /// The context was already torn down.
    #[error("dock context already disposed")]
    Disposed,
}

impl DockError {
    pub fn as_label(&self) -> &'static str {
        match self {
            DockError::EngineInit(_) => "dock_engine_init",
            DockError::Layout(_) => "dock_layout",
            DockError::Disposed => "dock_disposed",
        }
    }
}
