use thiserror::Error;

/// Errors produced by browser control, page indexing, and classification
#[derive(Debug, Error)]
pub enum LensError {
    /// Failed to launch a browser instance
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Tab-level operation failed (create, close, focus, lock)
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation did not start or did not complete
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript evaluation on the page failed
    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// Could not extract or parse the visible-text snapshot of the page
    #[error("Page snapshot failed: {0}")]
    SnapshotFailed(String),

    /// No page snapshot is available (nothing scanned yet, or reset by navigation)
    #[error("Page has not been indexed: {0}")]
    PageNotIndexed(String),

    /// A tool failed during execution
    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    /// Requested tool is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool parameters did not deserialize
    #[error("Invalid parameters for tool '{tool}': {reason}")]
    InvalidParams { tool: String, reason: String },

    /// No API key configured for the classifier
    #[error("Gemini API key not found. Set GEMINI_API_KEY or pass --api-key")]
    MissingApiKey,

    /// Could not reach the classifier endpoint
    #[error("Classifier unreachable: {0}")]
    ClassifierUnavailable(String),

    /// The classifier endpoint returned an error status
    #[error("Classifier rejected the request (HTTP {status}): {message}")]
    ClassifierRejected { status: u16, message: String },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LensError::ToolExecutionFailed {
            tool: "add_highlight".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Tool 'add_highlight' failed: boom");

        let err = LensError::ClassifierRejected { status: 429, message: "quota".to_string() };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota"));
    }
}
