//! Wishlist resource gateway.
//!
//! Same conventions as the cart gateway: one action type, one dispatch
//! point, credential header attached by the shared client. Mutation
//! responses acknowledge with ids only, so they decode as bare
//! acknowledgements; the populated listing comes from a fetch.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use freshcart_core::{BearerToken, ProductId};

use crate::api::ApiClient;
use crate::api::catalog::ProductWire;
use crate::api::envelope::{AckEnvelope, EnvelopeHead};
use crate::error::ApiError;
use crate::types::Product;

/// One mutating wishlist operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistAction {
    /// POST a product onto the wishlist.
    Add {
        /// Product to add.
        product_id: ProductId,
    },
    /// DELETE a product from the wishlist.
    Remove {
        /// Product to remove.
        product_id: ProductId,
    },
}

impl WishlistAction {
    pub(crate) const fn method(&self) -> Method {
        match self {
            Self::Add { .. } => Method::POST,
            Self::Remove { .. } => Method::DELETE,
        }
    }

    pub(crate) fn path(&self) -> String {
        match self {
            Self::Add { .. } => "wishlist".to_owned(),
            Self::Remove { product_id } => format!("wishlist/{product_id}"),
        }
    }

    pub(crate) fn body(&self) -> Option<serde_json::Value> {
        match self {
            Self::Add { product_id } => Some(json!({ "productId": product_id })),
            Self::Remove { .. } => None,
        }
    }
}

/// Raw wishlist listing envelope.
#[derive(Debug, Deserialize)]
pub struct WishlistEnvelope {
    #[serde(flatten)]
    head: EnvelopeHead,
    count: Option<u32>,
    data: Option<Vec<ProductWire>>,
}

/// Normalized successful wishlist payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WishlistPayload {
    /// Wishlist products in server order.
    pub products: Vec<Product>,
    /// Server-reported item count.
    pub count: u32,
}

impl WishlistEnvelope {
    /// Normalize the envelope into the payload or the server's failure
    /// message.
    ///
    /// The listing endpoint sets `status == "success"`; a present `data`
    /// array with no head marker is also accepted since the upstream is
    /// inconsistent about which endpoints carry one.
    ///
    /// # Errors
    ///
    /// Returns the optional server message on failure.
    pub fn into_outcome(self) -> Result<WishlistPayload, Option<String>> {
        if !self.head.is_success() && self.data.is_none() {
            return Err(self.head.failure_message());
        }

        let products: Vec<Product> = self
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Product::from)
            .collect();
        let count = self
            .count
            .unwrap_or_else(|| u32::try_from(products.len()).unwrap_or(u32::MAX));

        Ok(WishlistPayload { products, count })
    }
}

/// Remote wishlist operations.
#[allow(async_fn_in_trait)]
pub trait WishlistGateway: Send + Sync {
    /// GET the wishlist.
    async fn fetch(&self, token: &BearerToken) -> Result<WishlistEnvelope, ApiError>;

    /// Apply one mutating action; the response is an acknowledgement only.
    async fn mutate(
        &self,
        token: &BearerToken,
        action: &WishlistAction,
    ) -> Result<AckOutcome, ApiError>;
}

/// Normalized acknowledgement from a wishlist mutation: success, or the
/// server's failure message.
pub type AckOutcome = Result<(), Option<String>>;

/// HTTP implementation of [`WishlistGateway`].
#[derive(Clone)]
pub struct HttpWishlistGateway {
    api: ApiClient,
}

impl HttpWishlistGateway {
    /// Create a gateway on the shared API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl WishlistGateway for HttpWishlistGateway {
    #[instrument(skip(self, token))]
    async fn fetch(&self, token: &BearerToken) -> Result<WishlistEnvelope, ApiError> {
        self.api.get_with_retry("wishlist", Some(token)).await
    }

    #[instrument(skip(self, token))]
    async fn mutate(
        &self,
        token: &BearerToken,
        action: &WishlistAction,
    ) -> Result<AckOutcome, ApiError> {
        let ack: AckEnvelope = self
            .api
            .request(
                action.method(),
                &action.path(),
                Some(token),
                action.body().as_ref(),
            )
            .await?;
        Ok(ack.into_outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_method_path_and_body() {
        let add = WishlistAction::Add {
            product_id: ProductId::new("P1"),
        };
        assert_eq!(add.method(), Method::POST);
        assert_eq!(add.path(), "wishlist");
        assert_eq!(add.body(), Some(json!({ "productId": "P1" })));

        let remove = WishlistAction::Remove {
            product_id: ProductId::new("P1"),
        };
        assert_eq!(remove.method(), Method::DELETE);
        assert_eq!(remove.path(), "wishlist/P1");
        assert_eq!(remove.body(), None);
    }

    #[test]
    fn listing_envelope_decodes() {
        let raw = r#"{
            "status": "success",
            "count": 1,
            "data": [ {
                "_id": "P1",
                "title": "Woman Shawl",
                "price": 149
            } ]
        }"#;

        let envelope: WishlistEnvelope = serde_json::from_str(raw).expect("decode");
        let payload = envelope.into_outcome().expect("success");
        assert_eq!(payload.count, 1);
        assert_eq!(
            payload.products.first().map(|p| p.id.clone()),
            Some(ProductId::new("P1"))
        );
    }

    #[test]
    fn count_falls_back_to_listing_length() {
        let raw = r#"{ "status": "success", "data": [] }"#;
        let envelope: WishlistEnvelope = serde_json::from_str(raw).expect("decode");
        assert_eq!(envelope.into_outcome().expect("success").count, 0);
    }

    #[test]
    fn rejection_surfaces_server_message() {
        let raw = r#"{ "status": "fail", "message": "Expired token" }"#;
        let envelope: WishlistEnvelope = serde_json::from_str(raw).expect("decode");
        assert_eq!(
            envelope.into_outcome(),
            Err(Some("Expired token".to_owned()))
        );
    }
}
