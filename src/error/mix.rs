/// Unified error type for mixr
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MixError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Raised synchronously by builder methods
    #[error("Invalid arguments: {0}")]
    Validation(String),

    // Dependency installation failed, the build never reaches the compiler
    #[error("Dependency resolution failed: {0}")]
    Resolution(String),

    #[error("Task '{task}' failed: {message}")]
    Task { task: String, message: String },

    #[error("Compilation failed: {0}")]
    Compilation(String),

    #[error("Invalid path pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    // Generic error for compatibility
    #[error("{0}")]
    Other(String),
}

/// Result type alias using MixError
pub type Result<T> = std::result::Result<T, MixError>;

impl MixError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a task error
    pub fn task(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Task {
            task: task.into(),
            message: message.into(),
        }
    }

    /// Create a compilation error
    pub fn compilation(msg: impl Into<String>) -> Self {
        Self::Compilation(msg.into())
    }

    /// Create a pattern error
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

// Conversion from String for convenience
impl From<String> for MixError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

// Conversion from &str for convenience
impl From<&str> for MixError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}
