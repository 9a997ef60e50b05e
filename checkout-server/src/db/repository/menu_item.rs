//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{MenuItem, MenuItemCreate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const MENU_ITEM_TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse an external menu item id
    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(MENU_ITEM_TABLE, id)
    }

    /// Find available menu items by id set, scoped to one store.
    ///
    /// Pricing authority lives here: unknown ids, cross-store ids and
    /// unavailable items are simply absent from the result, which the caller
    /// detects by comparing counts.
    pub async fn find_available(
        &self,
        store: RecordId,
        ids: Vec<RecordId>,
    ) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE id IN $ids AND store = $store AND is_available = true")
            .bind(("ids", ids))
            .bind(("store", store))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let item = MenuItem {
            id: None,
            store: data.store,
            name: data.name,
            description: data.description,
            price_cents: data.price_cents,
            cost_cents: data.cost_cents,
            is_available: data.is_available,
        };

        let created: Option<MenuItem> = self
            .base
            .db()
            .create(MENU_ITEM_TABLE)
            .content(item)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }
}
