use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type.
/// Handlers return `Result<T, AppError>`; the router turns the error into an
/// error-flagged result with `to_tool_message` so nothing escapes the handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// JSON error payload for an error-flagged tool result.
    /// Not-found and validation messages reach the client verbatim; anything
    /// else is logged and replaced by `generic`.
    pub fn to_tool_message(&self, generic: &str) -> String {
        let message = match self {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                generic.to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {e}");
                generic.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                generic.to_string()
            }
        };

        json!({ "error": message }).to_string()
    }
}
