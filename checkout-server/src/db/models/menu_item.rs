//! Menu Item Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item entity
///
/// `name`, `price_cents` and `cost_cents` are the snapshot source fields:
/// they are copied into order items at order time, so later menu edits never
/// alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Record link to the owning store
    pub store: RecordId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in minor currency units
    pub price_cents: i64,
    /// Cost in minor currency units (internal margin tracking)
    pub cost_cents: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub store: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub is_available: bool,
}
