//! Core module - server configuration, state and HTTP server
//!
//! # Module Structure
//!
//! - [`Config`] - Server configuration
//! - [`ServerState`] - Shared server state
//! - [`Server`] - HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{Server, build_app};
pub use state::ServerState;
