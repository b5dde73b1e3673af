use thiserror::Error;

/// Failures that escape an action instead of being rendered as form state
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Failed to delete invoice")]
    DeleteFailed,
}
