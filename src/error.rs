use thiserror::Error;

/// Errors raised by the navigator and its browser adapter
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("{action} failed: {reason}")]
    InteractionFailed { action: String, reason: String },

    #[error("Markup conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Failed to parse TOC snapshot: {0}")]
    SnapshotParseFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NavigatorError {
    /// Shorthand for a failed click/activation
    pub fn interaction(action: impl Into<String>, reason: impl ToString) -> Self {
        Self::InteractionFailed {
            action: action.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, NavigatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_display() {
        let err = NavigatorError::interaction("click", "element detached");
        assert_eq!(err.to_string(), "click failed: element detached");
    }

    #[test]
    fn test_not_found_display() {
        let err = NavigatorError::ElementNotFound("#documentation".to_string());
        assert_eq!(err.to_string(), "Element not found: #documentation");
    }
}
