use thiserror::Error;

/// Input failed to satisfy the diagram schema.
///
/// `path` points at the offending field using a simple dotted/indexed notation
/// (e.g. `"nodes[2].shape"`), so callers can surface the error next to the input that caused it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{path}: {message}")]
pub struct SchemaError {
    pub path: String,
    pub message: String,
}

impl SchemaError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
