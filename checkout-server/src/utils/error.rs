//! Unified error handling
//!
//! Single application error type for all handlers. Client-facing bodies keep
//! the shape `{"error": "...", "details": [...]}`; internal detail for 5xx
//! errors is logged server-side and never returned to the caller.
//!
//! # Usage
//!
//! ```ignore
//! // Return an error
//! Err(AppError::not_found("Store not found"))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Generic message for all 5xx responses; detail stays in the logs
const INTERNAL_ERROR_MESSAGE: &str = "Failed to create checkout session";

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
    /// Field-level validation details (only on validation failures)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Application error
///
/// # Taxonomy
///
/// | Variant | Status | Exposed to caller |
/// |---------|--------|-------------------|
/// | Validation | 400 | message + field details |
/// | NotFound | 404 | message |
/// | Unavailable | 400 | message |
/// | Database | 500 | generic message only |
/// | Payment | 500 | generic message only |
/// | Internal | 500 | generic message only |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {message}")]
    /// Malformed or missing input fields (400)
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("Resource not found: {0}")]
    /// Unknown resource, e.g. store (404)
    NotFound(String),

    #[error("Unavailable: {0}")]
    /// Cart references items not currently sellable (400)
    Unavailable(String),

    #[error("Database error: {0}")]
    /// Persistence failure (500)
    Database(String),

    #[error("Payment provider error: {0}")]
    /// Payment provider or network failure (500)
    Payment(String),

    #[error("Internal server error: {0}")]
    /// Any other failure (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    details: if details.is_empty() {
                        None
                    } else {
                        Some(details)
                    },
                },
            ),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg,
                    details: None,
                },
            ),

            AppError::Unavailable(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    details: None,
                },
            ),

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: INTERNAL_ERROR_MESSAGE.to_string(),
                        details: None,
                    },
                )
            }

            AppError::Payment(msg) => {
                error!(target: "payment", error = %msg, "Payment provider error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: INTERNAL_ERROR_MESSAGE.to_string(),
                        details: None,
                    },
                )
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: INTERNAL_ERROR_MESSAGE.to_string(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Result type for handlers
pub type AppResult<T> = Result<T, AppError>;
