//! Element tree error types

use thiserror::Error;

/// Errors from structural edits to the element tree
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// Appending here would make an element its own ancestor
    #[error("append would create a cycle in the element tree")]
    CycleDetected,

    /// The element is not among this node's children
    #[error("element is not a child of this node")]
    NotAChild,

    /// Surfaces are leaves; only roots and containers hold children
    #[error("element cannot hold children")]
    NotAContainer,
}

/// Result type for tree operations
pub type Result<T> = std::result::Result<T, SceneError>;
