use thiserror::Error;

/// The hierarchical layout service failed, or produced output the core could not interpret.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("layout failed: {reason}")]
pub struct LayoutError {
    pub reason: String,
}

impl LayoutError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
