//! Order Model
//!
//! An order owns its item snapshots; both are written in one transaction so
//! an order row never exists without its items.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order lifecycle status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
}

/// Payment status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
}

/// Order entity
///
/// All money fields are integer minor currency units. The invariant
/// `total_cents == subtotal_cents + tax_cents + tip_cents` is established by
/// [`crate::checkout::compute_totals`] before the row is written.
///
/// An order with `checkout_session_id` absent is an orphan: it was persisted
/// but the payment-session creation (or the linkage update) failed.
/// Reconciliation finds these via
/// [`super::super::repository::OrderRepository::find_without_session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Record link to the owning store
    pub store: RecordId,
    /// Sequential per-store order number, allocated in the creation
    /// transaction
    pub order_number: i64,
    pub customer_phone_e164: String,
    pub consent_call: bool,
    pub consent_sms: bool,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub tip_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    /// External payment-session reference, linked after session creation
    #[serde(default)]
    pub checkout_session_id: Option<String>,
    pub created_at: i64,
}

/// Order item: immutable snapshot of a menu item at purchase time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Record link to the owning order
    pub order: RecordId,
    /// Record link to the menu item the snapshot was taken from
    pub menu_item: RecordId,
    pub name_snapshot: String,
    pub price_cents_snapshot: i64,
    pub cost_cents_snapshot: i64,
    pub quantity: i64,
}

/// Item snapshot materialized during total computation, before the order
/// exists. Becomes an [`OrderItem`] row inside the creation transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemSnapshot {
    pub menu_item: RecordId,
    pub name_snapshot: String,
    pub price_cents_snapshot: i64,
    pub cost_cents_snapshot: i64,
    pub quantity: i64,
}

/// Create order payload. Order number, statuses and timestamp are assigned
/// by the repository inside the creation transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub store: RecordId,
    pub customer_phone_e164: String,
    pub consent_call: bool,
    pub consent_sms: bool,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub tip_cents: i64,
    pub total_cents: i64,
    pub currency: String,
}
