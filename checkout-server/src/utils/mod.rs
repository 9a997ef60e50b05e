//! Utility module - errors, logging and validation helpers
//!
//! # Contents
//!
//! - [`AppError`] - Application error type
//! - [`logger`] - Logging setup
//! - [`validation`] - Input validation helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult};

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
