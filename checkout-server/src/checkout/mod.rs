//! Order total computation
//!
//! Pure functions, separable from persistence: authoritative prices come in
//! as resolved menu items, the cart only contributes quantities. All money
//! math is integer minor-currency units.

use surrealdb::RecordId;
use thiserror::Error;

use crate::db::models::{MenuItem, OrderItemSnapshot};


/// Fixed settlement currency
pub const CURRENCY: &str = "usd";

/// A validated cart line: resolved menu item reference + quantity.
/// Client-supplied prices never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub menu_item: RecordId,
    pub quantity: u32,
}

/// Computed order totals, all in minor currency units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub tip_cents: i64,
    pub total_cents: i64,
}

/// A priced cart: totals plus the item snapshots to persist with the order
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart {
    pub totals: Totals,
    pub items: Vec<OrderItemSnapshot>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalsError {
    /// A cart line has no matching resolved menu item. The caller's count
    /// check makes this unreachable for unknown or unavailable ids; hitting
    /// it means resolution and cart disagree, and failing beats silently
    /// undercounting the order.
    #[error("Cart line references unresolved menu item: {0}")]
    UnresolvedItem(String),
}

/// Compute order totals and materialize item snapshots.
///
/// Per cart line: locate the resolved menu item by id, accumulate
/// `price_cents * quantity` into the subtotal, and copy name/price/cost
/// verbatim into a snapshot. Tax is fixed at zero;
/// `total = subtotal + tax + tip`.
pub fn compute_totals(
    menu_items: &[MenuItem],
    cart: &[CartLine],
    tip_cents: i64,
) -> Result<PricedCart, TotalsError> {
    let mut subtotal_cents: i64 = 0;
    let mut items = Vec::with_capacity(cart.len());

    for line in cart {
        let menu_item = menu_items
            .iter()
            .find(|m| m.id.as_ref() == Some(&line.menu_item))
            .ok_or_else(|| TotalsError::UnresolvedItem(line.menu_item.to_string()))?;

        let quantity = i64::from(line.quantity);
        subtotal_cents += menu_item.price_cents * quantity;

        items.push(OrderItemSnapshot {
            menu_item: line.menu_item.clone(),
            name_snapshot: menu_item.name.clone(),
            price_cents_snapshot: menu_item.price_cents,
            cost_cents_snapshot: menu_item.cost_cents,
            quantity,
        });
    }

    let tax_cents = 0;
    let total_cents = subtotal_cents + tax_cents + tip_cents;

    Ok(PricedCart {
        totals: Totals {
            subtotal_cents,
            tax_cents,
            tip_cents,
            total_cents,
        },
        items,
    })
}
