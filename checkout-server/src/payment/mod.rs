//! Payment provider abstraction
//!
//! Hosted checkout-session creation behind a trait so handlers depend on the
//! seam, not on Stripe. Tests substitute a fake; production wires up
//! [`StripeClient`].

mod stripe;

pub use stripe::StripeClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::{MenuItem, OrderItemSnapshot};

/// Display name for the gratuity line item
const TIP_NAME: &str = "Tip";
const TIP_DESCRIPTION: &str = "Gratuity for service";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Provider rejected request ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl From<PaymentError> for crate::utils::AppError {
    fn from(err: PaymentError) -> Self {
        crate::utils::AppError::Payment(err.to_string())
    }
}

/// One priced line of a hosted checkout session
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub description: Option<String>,
    /// Unit price in minor currency units
    pub unit_amount_cents: i64,
    pub quantity: i64,
    pub currency: String,
}

/// Hosted checkout-session request (one-time-payment mode)
#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    pub line_items: Vec<LineItem>,
    /// Redirect target after successful payment
    pub success_url: String,
    /// Redirect target after cancelled payment
    pub cancel_url: String,
    /// Metadata linking the session back to the order
    pub order_id: String,
    pub store_id: String,
}

/// Created hosted checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Hosted-checkout provider seam
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// Build session line items from the persisted snapshots.
///
/// One line per snapshot (unit price = snapshot price, quantity from the
/// cart, description looked up from the resolved menu item), plus exactly one
/// trailing "Tip" line at a single unit when `tip_cents > 0`.
pub fn build_line_items(
    snapshots: &[OrderItemSnapshot],
    menu_items: &[MenuItem],
    tip_cents: i64,
    currency: &str,
) -> Vec<LineItem> {
    let mut line_items: Vec<LineItem> = snapshots
        .iter()
        .map(|snap| {
            let description = menu_items
                .iter()
                .find(|m| m.id.as_ref() == Some(&snap.menu_item))
                .and_then(|m| m.description.clone());

            LineItem {
                name: snap.name_snapshot.clone(),
                description,
                unit_amount_cents: snap.price_cents_snapshot,
                quantity: snap.quantity,
                currency: currency.to_string(),
            }
        })
        .collect();

    if tip_cents > 0 {
        line_items.push(LineItem {
            name: TIP_NAME.to_string(),
            description: Some(TIP_DESCRIPTION.to_string()),
            unit_amount_cents: tip_cents,
            quantity: 1,
            currency: currency.to_string(),
        });
    }

    line_items
}
