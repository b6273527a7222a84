//! Error types for model assembly and post-processing

use thiserror::Error;

/// Main error type for model and result operations
#[derive(Error, Debug)]
pub enum CalxError {
    #[error("{kind} element needs {expected} nodes, got {got}")]
    NodeCount {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{property} property needs {expected} values, got {got}")]
    PropertyArity {
        property: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Element type {0} has no faces")]
    NoFaces(&'static str),

    #[error("Unknown element type '{0}'")]
    UnknownElementType(String),

    #[error("Duplicate node tag {0}")]
    DuplicateNode(usize),

    #[error("Duplicate element tag {0}")]
    DuplicateElement(usize),

    #[error("Node '{0}' not found in model")]
    NodeNotFound(usize),

    #[error("Element '{0}' not found in model")]
    ElementNotFound(usize),

    #[error("Component arrays must have the same length: expected {expected}, '{component}' has {got}")]
    FieldLength {
        component: String,
        expected: usize,
        got: usize,
    },

    #[error("Value index {index} out of range for field array of length {len}")]
    FieldIndex { index: usize, len: usize },

    #[error("Non-manifold input: {count} faces shared by more than two elements")]
    NonManifold { count: usize },

    #[error("Parse error at {path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for model and result operations
pub type CalxResult<T> = Result<T, CalxError>;
