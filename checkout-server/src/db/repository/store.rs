//! Store Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Store, StoreCreate};
use crate::utils::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const STORE_TABLE: &str = "store";

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse an external store id
    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(STORE_TABLE, id)
    }

    /// Find store by id
    pub async fn find(&self, id: &RecordId) -> RepoResult<Option<Store>> {
        let store: Option<Store> = self.base.db().select(id.clone()).await?;
        Ok(store)
    }

    /// Create a new store
    pub async fn create(&self, data: StoreCreate) -> RepoResult<Store> {
        let store = Store {
            id: None,
            name: data.name,
            created_at: now_millis(),
        };

        let created: Option<Store> = self.base.db().create(STORE_TABLE).content(store).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }
}
