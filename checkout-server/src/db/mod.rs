//! Database Module
//!
//! Embedded SurrealDB storage. Owns connection setup and schema/index
//! definitions; all queries live in the repository layer.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "checkout";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        let service = Self::finish_init(db).await?;
        tracing::info!("Database connection established ({})", db_path);
        Ok(service)
    }

    /// Open an in-memory database (tests)
    pub async fn new_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {}", e)))?;

        Self::finish_init(db).await
    }

    async fn finish_init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_schema(&db).await?;

        Ok(Self { db })
    }
}

/// Define indexes.
///
/// Tables stay schemaless; the unique index on `(store, order_number)`
/// backstops the transactional order-number allocation so two concurrent
/// checkouts can never commit the same number for one store.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "DEFINE INDEX IF NOT EXISTS order_store_number ON TABLE order COLUMNS store, order_number UNIQUE",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define order index: {}", e)))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to define order index: {}", e)))?;

    db.query("DEFINE INDEX IF NOT EXISTS menu_item_store ON TABLE menu_item COLUMNS store")
        .await
        .map_err(|e| AppError::database(format!("Failed to define menu_item index: {}", e)))?
        .check()
        .map_err(|e| AppError::database(format!("Failed to define menu_item index: {}", e)))?;

    Ok(())
}
