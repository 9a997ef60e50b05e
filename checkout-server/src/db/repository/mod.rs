//! Repository Module
//!
//! All SurrealQL lives here; handlers never touch the database directly.

pub mod menu_item;
pub mod order;
pub mod store;

// Re-exports
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use store::StoreRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => crate::utils::AppError::not_found(msg),
            RepoError::Validation(msg) => crate::utils::AppError::validation(msg),
            RepoError::Database(msg) => crate::utils::AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings at the API boundary, RecordId inside
// =============================================================================

/// Parse an external id into a [`RecordId`] for the given table.
///
/// Accepts both the full `"table:id"` form and a bare key. A prefixed id
/// naming a different table is rejected.
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    match id.split_once(':') {
        Some((tb, _)) if tb != table => Err(RepoError::Validation(format!(
            "Expected {} id, got: {}",
            table, id
        ))),
        Some(_) => id
            .parse::<RecordId>()
            .map_err(|_| RepoError::Validation(format!("Invalid id: {}", id))),
        None => Ok(RecordId::from_table_key(table, id)),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
