//! Checkout Session Handler
//!
//! Straight-line flow: validate → resolve store → resolve authoritative
//! prices → compute totals → persist order + snapshots (one transaction) →
//! create hosted payment session → link session id → respond.
//!
//! There is no retry and no compensation. A provider failure after the order
//! is written leaves a PLACED/PENDING order with no session id; that orphan
//! state is logged here and queryable via
//! [`OrderRepository::find_without_session`].

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::checkout::{self, CartLine};
use crate::core::ServerState;
use crate::db::models::OrderCreate;
use crate::db::repository::{MenuItemRepository, OrderRepository, StoreRepository};
use crate::payment::{CreateSessionRequest, build_line_items};
use crate::utils::validation::{MAX_CART_LINES, is_valid_e164};
use crate::utils::{AppError, AppResult};

const STORE_NOT_FOUND: &str = "Store not found";
const ITEMS_UNAVAILABLE: &str = "Some items are not available";

/// One requested cart line. Quantity only; pricing is never trusted from the
/// client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub menu_item_id: String,
    pub quantity: u32,
}

/// POST /api/checkout-session request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub store_id: String,
    pub cart_items: Vec<CartItemInput>,
    pub phone_e164: String,
    pub consent_call: bool,
    pub consent_sms: bool,
    pub tip_cents: i64,
}

impl CheckoutRequest {
    /// Semantic validation, applied before any database access
    fn validate(&self) -> AppResult<()> {
        let mut details = Vec::new();

        if self.cart_items.is_empty() {
            details.push("cartItems must not be empty".to_string());
        }
        if self.cart_items.len() > MAX_CART_LINES {
            details.push(format!("cartItems must not exceed {} lines", MAX_CART_LINES));
        }
        for (i, item) in self.cart_items.iter().enumerate() {
            if item.quantity == 0 {
                details.push(format!("cartItems[{}].quantity must be greater than 0", i));
            }
        }
        if self.tip_cents < 0 {
            details.push("tipCents must not be negative".to_string());
        }
        if !is_valid_e164(&self.phone_e164) {
            details.push("phoneE164 must be a valid E.164 phone number".to_string());
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_with_details(
                "Invalid request data",
                details,
            ))
        }
    }
}

/// POST /api/checkout-session response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub session_url: String,
    pub order_id: String,
}

/// POST /api/checkout-session
pub async fn create_session(
    State(state): State<ServerState>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    request.validate()?;

    let store_repo = StoreRepository::new(state.db.clone());
    let menu_repo = MenuItemRepository::new(state.db.clone());
    let order_repo = OrderRepository::new(state.db.clone());

    // 1. Store must exist
    let store_id = StoreRepository::parse_id(&request.store_id)
        .map_err(|_| AppError::not_found(STORE_NOT_FOUND))?;
    store_repo
        .find(&store_id)
        .await?
        .ok_or_else(|| AppError::not_found(STORE_NOT_FOUND))?;

    // 2. Resolve authoritative prices, scoped to this store and availability.
    // An id that does not parse can never resolve, so it falls under the
    // same count-mismatch policy as an unknown or cross-store id.
    let mut cart = Vec::with_capacity(request.cart_items.len());
    for item in &request.cart_items {
        let menu_item = MenuItemRepository::parse_id(&item.menu_item_id)
            .map_err(|_| AppError::unavailable(ITEMS_UNAVAILABLE))?;
        cart.push(CartLine {
            menu_item,
            quantity: item.quantity,
        });
    }

    let menu_items = menu_repo
        .find_available(
            store_id.clone(),
            cart.iter().map(|line| line.menu_item.clone()).collect(),
        )
        .await?;

    if menu_items.len() != cart.len() {
        return Err(AppError::unavailable(ITEMS_UNAVAILABLE));
    }

    // 3. Compute totals and materialize snapshots (pure)
    let priced = checkout::compute_totals(&menu_items, &cart, request.tip_cents)
        .map_err(|e| AppError::internal(format!("Cart/menu resolution disagreed: {}", e)))?;

    // 4. Persist order + snapshots atomically; order number is allocated
    // inside the transaction
    let order = order_repo
        .create_with_items(
            OrderCreate {
                store: store_id.clone(),
                customer_phone_e164: request.phone_e164.clone(),
                consent_call: request.consent_call,
                consent_sms: request.consent_sms,
                subtotal_cents: priced.totals.subtotal_cents,
                tax_cents: priced.totals.tax_cents,
                tip_cents: priced.totals.tip_cents,
                total_cents: priced.totals.total_cents,
                currency: checkout::CURRENCY.to_string(),
            },
            priced.items.clone(),
        )
        .await?;

    let order_record_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Created order has no id"))?;
    let order_id = order_record_id.to_string();

    // 5. Request a hosted payment session
    let session_request = CreateSessionRequest {
        line_items: build_line_items(
            &priced.items,
            &menu_items,
            request.tip_cents,
            checkout::CURRENCY,
        ),
        success_url: format!(
            "{}/success?session_id={{CHECKOUT_SESSION_ID}}",
            state.config.frontend_url
        ),
        cancel_url: format!("{}/cancel?order_id={}", state.config.frontend_url, order_id),
        order_id: order_id.clone(),
        store_id: store_id.to_string(),
    };

    let session = match state
        .payments
        .create_checkout_session(&session_request)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(
                order_id = %order_id,
                error = %e,
                "Payment session creation failed; order left without session"
            );
            return Err(e.into());
        }
    };

    // 6. Link the session back to the order
    if let Err(e) = order_repo
        .set_checkout_session(&order_record_id, &session.id)
        .await
    {
        tracing::error!(
            order_id = %order_id,
            session_id = %session.id,
            error = %e,
            "Failed to link payment session to order"
        );
        return Err(e.into());
    }

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        session_url: session.url,
        order_id,
    }))
}
