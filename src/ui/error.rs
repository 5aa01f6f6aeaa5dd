//! Error types for widget operations

use thiserror_no_std::Error;

/// Errors raised by tree, panel and configuration operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UiError {
    /// A width or height below zero was supplied
    #[error("Negative {axis}: {value}")]
    NegativeDimension {
        /// Which dimension was rejected
        axis: &'static str,
        /// The rejected value
        value: i32,
    },

    /// The node id does not refer to a live node
    #[error("Node not found")]
    NodeNotFound,

    /// Attaching would make a node its own ancestor
    #[error("Node cannot be attached below itself")]
    CyclicAttach,

    /// A child widget failed while handling an event
    #[error("Child widget fault: {0}")]
    ChildFault(&'static str),

    /// A stored configuration blob could not be decoded
    #[error("Invalid configuration")]
    InvalidConfig,
}

/// Result type for widget operations
pub type UiResult<T> = Result<T, UiError>;
