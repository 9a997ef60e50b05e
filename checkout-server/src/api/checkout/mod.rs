//! Checkout API module

mod handler;

pub use handler::{CartItemInput, CheckoutRequest, CheckoutResponse};

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/checkout-session", post(handler::create_session))
}
