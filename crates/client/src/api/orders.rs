//! Checkout endpoint: hosted payment sessions for an existing cart.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use freshcart_core::CartId;
use url::Url;

use crate::api::ApiClient;
use crate::api::envelope::EnvelopeHead;
use crate::error::ApiError;
use crate::session::AuthSession;
use crate::types::{CheckoutSession, ShippingAddress};

#[derive(Debug, Deserialize)]
struct CheckoutEnvelope {
    #[serde(flatten)]
    head: EnvelopeHead,
    session: Option<CheckoutSession>,
}

/// Client for order checkout.
#[derive(Clone)]
pub struct OrdersClient {
    api: ApiClient,
    session: AuthSession,
}

impl OrdersClient {
    /// Create a client reading credentials from the given session store.
    #[must_use]
    pub const fn new(api: ApiClient, session: AuthSession) -> Self {
        Self { api, session }
    }

    /// Create a hosted payment session for a cart.
    ///
    /// The payment provider redirects back to `return_url` after payment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotSignedIn`] without a credential, or the
    /// server's rejection when the cart id is stale or the address is
    /// refused.
    #[instrument(skip(self, address), fields(cart_id = %cart_id))]
    pub async fn checkout_session(
        &self,
        cart_id: &CartId,
        address: &ShippingAddress,
        return_url: &Url,
    ) -> Result<CheckoutSession, ApiError> {
        let Some(token) = self.session.token() else {
            return Err(ApiError::NotSignedIn);
        };

        let path = format!("orders/checkout-session/{cart_id}?url={return_url}");
        let body = json!({ "shippingAddress": address });

        let envelope: CheckoutEnvelope = self
            .api
            .request(Method::POST, &path, Some(&token), Some(&body))
            .await?;

        if !envelope.head.is_success() {
            return Err(ApiError::Rejected {
                message: envelope.head.failure_message(),
            });
        }

        envelope.session.ok_or(ApiError::Rejected {
            message: Some("Checkout session missing from response".to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_envelope_decodes_session_url() {
        let raw = r#"{
            "status": "success",
            "session": { "url": "https://checkout.stripe.com/pay/cs_test_123" }
        }"#;
        let envelope: CheckoutEnvelope = serde_json::from_str(raw).expect("decode");
        assert!(envelope.head.is_success());
        assert_eq!(
            envelope.session.map(|s| s.url),
            Some("https://checkout.stripe.com/pay/cs_test_123".to_owned())
        );
    }

    #[test]
    fn shipping_address_serializes_flat() {
        let address = ShippingAddress::new("12 Nile St", "01012345678", "Cairo").expect("valid");
        let body = json!({ "shippingAddress": address });
        assert_eq!(
            body,
            json!({
                "shippingAddress": {
                    "details": "12 Nile St",
                    "phone": "01012345678",
                    "city": "Cairo"
                }
            })
        );
    }
}
