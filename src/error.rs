//! Error types for the frame solver

use thiserror::Error;

/// Main error type for structure definition, preprocessing and solving
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Node '{0}' not found in structure")]
    NodeNotFound(String),

    #[error("Element '{0}' not found in structure")]
    ElementNotFound(String),

    #[error("Material '{0}' not found in structure")]
    MaterialNotFound(String),

    #[error("Section '{0}' not found in structure")]
    SectionNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Element '{0}' has no start node assigned")]
    MissingStartNode(String),

    #[error("Element '{0}' has no end node assigned")]
    MissingEndNode(String),

    #[error("Element '{0}' has no material assigned")]
    MissingMaterial(String),

    #[error("Element '{0}' has no section assigned")]
    MissingSection(String),

    #[error("Unknown load term '{0}' (expected fx, fy or mz)")]
    UnknownLoadTerm(String),

    #[error("Invalid load on element '{element}': {reason}")]
    InvalidLoad { element: String, reason: String },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Safety check failed: {0}")]
    SafetyCheckFailed(String),

    #[error("Solver did not converge after {iterations} iterations (relative residual {residual:e})")]
    ConvergenceFailed { iterations: usize, residual: f64 },

    #[error("Solver breakdown: search direction has no curvature")]
    SolverBreakdown,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for frame solver operations
pub type FrameResult<T> = Result<T, FrameError>;
