//! API route modules
//!
//! # Structure
//!
//! - [`health`] - Health check
//! - [`checkout`] - Checkout session creation

pub mod checkout;
pub mod health;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
