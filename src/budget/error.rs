use thiserror::Error;

/// Ways a budget operation can be rejected.
#[derive(Debug, Error)]
pub(crate) enum BudgetError {
    /// The project does not exist or the acting user does not own it.
    #[error("Project not found or access denied")]
    AccessDenied,

    /// Input was missing or out of range. Raised before any store access.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A partial update targeted a month that was never saved.
    #[error("Monthly advertising spend record not found")]
    NotFound,

    /// Storage failure, passed through as-is.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl BudgetError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
