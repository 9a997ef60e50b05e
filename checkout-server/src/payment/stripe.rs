//! Stripe Checkout Sessions client
//!
//! Talks to `POST /v1/checkout/sessions` directly over reqwest. Stripe takes
//! form-encoded bodies with bracket-indexed array params, so the request is
//! flattened into key/value pairs rather than JSON.

use async_trait::async_trait;
use serde::Deserialize;

use super::{CheckoutSession, CreateSessionRequest, PaymentError, PaymentProvider};

pub struct StripeClient {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: String, api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base,
        }
    }

    /// Flatten a session request into Stripe form params.
    ///
    /// Line item `i` becomes `line_items[i][price_data][...]` +
    /// `line_items[i][quantity]`; metadata carries the order/store linkage.
    fn form_params(request: &CreateSessionRequest) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("success_url".into(), request.success_url.clone()),
            ("cancel_url".into(), request.cancel_url.clone()),
            ("metadata[orderId]".into(), request.order_id.clone()),
            ("metadata[storeId]".into(), request.store_id.clone()),
        ];

        for (i, item) in request.line_items.iter().enumerate() {
            let prefix = format!("line_items[{}]", i);
            params.push((
                format!("{}[price_data][currency]", prefix),
                item.currency.clone(),
            ));
            params.push((
                format!("{}[price_data][product_data][name]", prefix),
                item.name.clone(),
            ));
            if let Some(description) = &item.description {
                params.push((
                    format!("{}[price_data][product_data][description]", prefix),
                    description.clone(),
                ));
            }
            params.push((
                format!("{}[price_data][unit_amount]", prefix),
                item.unit_amount_cents.to_string(),
            ));
            params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
        }

        params
    }
}

/// Subset of the session object we consume
#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = Self::form_params(request);

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        let url = session.url.ok_or_else(|| {
            PaymentError::InvalidResponse("Session response missing url".to_string())
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}
