//! Order Repository
//!
//! Order creation allocates the per-store order number inside the same
//! transaction that writes the order and its item snapshots. The unique
//! index on `(store, order_number)` (see [`crate::db`]) rejects the write if
//! a concurrent transaction commits the same number first.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderCreate, OrderItem, OrderItemSnapshot};
use crate::utils::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an order together with its item snapshots.
    ///
    /// Single transaction: reads the highest order number for the store
    /// (0 when the store has no orders), writes the order with that value + 1,
    /// status PLACED / payment status PENDING, then writes every item
    /// snapshot. All-or-nothing.
    pub async fn create_with_items(
        &self,
        data: OrderCreate,
        items: Vec<OrderItemSnapshot>,
    ) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                LET $last = (SELECT VALUE order_number FROM order WHERE store = $store ORDER BY order_number DESC LIMIT 1)[0] ?? 0;
                LET $created = CREATE ONLY order CONTENT {
                    store: $store,
                    order_number: $last + 1,
                    customer_phone_e164: $phone,
                    consent_call: $consent_call,
                    consent_sms: $consent_sms,
                    status: $status,
                    payment_status: $payment_status,
                    subtotal_cents: $subtotal,
                    tax_cents: $tax,
                    tip_cents: $tip,
                    total_cents: $total,
                    currency: $currency,
                    checkout_session_id: NONE,
                    created_at: $now
                };
                FOR $item IN $items {
                    CREATE order_item CONTENT {
                        `order`: $created.id,
                        menu_item: $item.menu_item,
                        name_snapshot: $item.name_snapshot,
                        price_cents_snapshot: $item.price_cents_snapshot,
                        cost_cents_snapshot: $item.cost_cents_snapshot,
                        quantity: $item.quantity
                    };
                };
                RETURN $created;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("store", data.store))
            .bind(("phone", data.customer_phone_e164))
            .bind(("consent_call", data.consent_call))
            .bind(("consent_sms", data.consent_sms))
            .bind(("status", "PLACED"))
            .bind(("payment_status", "PENDING"))
            .bind(("subtotal", data.subtotal_cents))
            .bind(("tax", data.tax_cents))
            .bind(("tip", data.tip_cents))
            .bind(("total", data.total_cents))
            .bind(("currency", data.currency))
            .bind(("now", now_millis()))
            .bind(("items", items))
            .await?;

        // A transaction with a RETURN collapses to a single result slot
        // holding the RETURN value
        let order: Option<Order> = result.take(0)?;
        order.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Link the external payment-session id to an order
    pub async fn set_checkout_session(
        &self,
        order_id: &RecordId,
        session_id: &str,
    ) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET checkout_session_id = $sid RETURN AFTER")
            .bind(("id", order_id.clone()))
            .bind(("sid", session_id.to_string()))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Item snapshots belonging to an order
    pub async fn find_items(&self, order_id: &RecordId) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE `order` = $order_id")
            .bind(("order_id", order_id.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Highest order number for a store (0 when the store has no orders)
    pub async fn last_order_number(&self, store: RecordId) -> RepoResult<i64> {
        let numbers: Vec<i64> = self
            .base
            .db()
            .query("SELECT VALUE order_number FROM order WHERE store = $store ORDER BY order_number DESC LIMIT 1")
            .bind(("store", store))
            .await?
            .take(0)?;
        Ok(numbers.into_iter().next().unwrap_or(0))
    }

    /// Orphaned orders: persisted but never linked to a payment session.
    ///
    /// Reconciliation uses this to detect checkouts where the provider call
    /// or the linkage update failed after the order was written.
    pub async fn find_without_session(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE checkout_session_id = NONE ORDER BY created_at")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Total number of orders across all stores (test support)
    pub async fn count(&self) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }

        let row: Option<CountRow> = self
            .base
            .db()
            .query("SELECT count() FROM order GROUP ALL")
            .await?
            .take(0)?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}
