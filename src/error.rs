//! Error types for stack panels

use thiserror::Error;

/// Main error type for stack panel operations
#[derive(Error, Debug)]
pub enum StackPanelError {
    #[error("Item has no anchor element")]
    MissingAnchor,

    #[error("Anchor href '{0}' has no fragment")]
    MissingFragment(String),

    #[error("Panel '{0}' not found in document")]
    PanelNotFound(String),

    #[error("No click listener mechanism available on container '{0}'")]
    ListenerUnavailable(String),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for stack panel operations
pub type StackPanelResult<T> = Result<T, StackPanelError>;
