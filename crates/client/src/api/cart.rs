//! Cart resource gateway.
//!
//! Every mutating call is described by one [`CartAction`] value and routed
//! through the single [`CartGateway::mutate`] dispatch point, which picks
//! the method, path, and body. The credential header is attached by
//! [`ApiClient`](super::ApiClient), so the five call sites cannot drift in
//! how they authenticate or how they interpret the envelope.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use freshcart_core::{BearerToken, CartId, Price, ProductId, Quantity};

use crate::api::ApiClient;
use crate::api::envelope::EnvelopeHead;
use crate::error::ApiError;
use crate::types::{CartLine, ProductRef};

// =============================================================================
// Actions
// =============================================================================

/// Tag identifying which kind of cart call is in flight.
///
/// `Remove` and `Clear` share the `Delete` tag: both are DELETE calls and
/// the busy-flag map tracks them together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Reading the cart resource.
    Fetch,
    /// Adding a product.
    Add,
    /// Changing a line quantity.
    Update,
    /// Removing a line or clearing the cart.
    Delete,
}

impl ActionKind {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Fallback display message when the server supplies none.
    pub(crate) const fn generic_failure(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch cart data.",
            Self::Add => "Failed to add product.",
            Self::Update => "Failed to update product.",
            Self::Delete => "Failed to delete product.",
        }
    }
}

/// One mutating cart operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// POST a product onto the cart.
    Add {
        /// Product to add (server starts the line at quantity 1).
        product_id: ProductId,
    },
    /// PUT a new quantity for a product's line.
    SetQuantity {
        /// Product whose line is updated.
        product_id: ProductId,
        /// Already clamped to the transmittable minimum.
        quantity: Quantity,
    },
    /// DELETE a product's line.
    Remove {
        /// Product whose line is removed.
        product_id: ProductId,
    },
    /// DELETE the whole cart resource.
    Clear,
}

impl CartAction {
    /// The busy-flag tag for this action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Add { .. } => ActionKind::Add,
            Self::SetQuantity { .. } => ActionKind::Update,
            Self::Remove { .. } | Self::Clear => ActionKind::Delete,
        }
    }

    pub(crate) const fn method(&self) -> Method {
        match self {
            Self::Add { .. } => Method::POST,
            Self::SetQuantity { .. } => Method::PUT,
            Self::Remove { .. } | Self::Clear => Method::DELETE,
        }
    }

    pub(crate) fn path(&self) -> String {
        match self {
            Self::Add { .. } | Self::Clear => "cart".to_owned(),
            Self::SetQuantity { product_id, .. } | Self::Remove { product_id } => {
                format!("cart/{product_id}")
            }
        }
    }

    pub(crate) fn body(&self) -> Option<serde_json::Value> {
        match self {
            Self::Add { product_id } => Some(json!({ "productId": product_id })),
            Self::SetQuantity { quantity, .. } => Some(json!({ "count": quantity })),
            Self::Remove { .. } | Self::Clear => None,
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Raw cart response envelope.
#[derive(Debug, Deserialize)]
pub struct CartEnvelope {
    #[serde(flatten)]
    head: EnvelopeHead,
    #[serde(rename = "numOfCartItems")]
    num_of_cart_items: Option<u32>,
    data: Option<CartDataWire>,
}

#[derive(Debug, Deserialize)]
struct CartDataWire {
    #[serde(rename = "_id")]
    id: Option<CartId>,
    products: Option<Vec<CartLineWire>>,
}

#[derive(Debug, Deserialize)]
struct CartLineWire {
    count: u32,
    price: Price,
    product: ProductRefWire,
}

/// Mutation responses sometimes carry only the product id where fetches
/// return the populated object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductRefWire {
    Populated {
        #[serde(rename = "_id")]
        id: ProductId,
        title: Option<String>,
        #[serde(rename = "imageCover")]
        image_cover: Option<String>,
    },
    Bare(ProductId),
}

impl From<ProductRefWire> for ProductRef {
    fn from(wire: ProductRefWire) -> Self {
        match wire {
            ProductRefWire::Populated {
                id,
                title,
                image_cover,
            } => Self {
                id,
                title,
                image_cover,
            },
            ProductRefWire::Bare(id) => Self::bare(id),
        }
    }
}

impl From<CartLineWire> for CartLine {
    fn from(wire: CartLineWire) -> Self {
        Self {
            product: wire.product.into(),
            quantity: Quantity::clamped(wire.count),
            unit_price: wire.price,
        }
    }
}

/// Normalized successful cart payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartPayload {
    /// Cart lines in server order.
    pub lines: Vec<CartLine>,
    /// Server-reported total item count (authoritative, not derived).
    pub count: u32,
    /// Cart resource id, when the response carried one.
    pub id: Option<CartId>,
}

impl CartEnvelope {
    /// Normalize the envelope: the payload on success, the server's failure
    /// message (if any) otherwise.
    ///
    /// # Errors
    ///
    /// Returns the optional server message when neither success marker is
    /// present.
    pub fn into_outcome(self) -> Result<CartPayload, Option<String>> {
        if !self.head.is_success() {
            return Err(self.head.failure_message());
        }

        let (id, lines) = match self.data {
            Some(data) => (
                data.id,
                data.products
                    .unwrap_or_default()
                    .into_iter()
                    .map(CartLine::from)
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        Ok(CartPayload {
            lines,
            count: self.num_of_cart_items.unwrap_or(0),
            id,
        })
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// Remote cart resource operations.
///
/// The trait seam lets synchronizer tests substitute an in-memory gateway.
#[allow(async_fn_in_trait)]
pub trait CartGateway: Send + Sync {
    /// GET the cart resource.
    async fn fetch(&self, token: &BearerToken) -> Result<CartEnvelope, ApiError>;

    /// Apply one mutating action. Single dispatch point for all five
    /// mutating call sites.
    async fn mutate(&self, token: &BearerToken, action: &CartAction)
    -> Result<CartEnvelope, ApiError>;
}

/// HTTP implementation of [`CartGateway`].
#[derive(Clone)]
pub struct HttpCartGateway {
    api: ApiClient,
}

impl HttpCartGateway {
    /// Create a gateway on the shared API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl CartGateway for HttpCartGateway {
    #[instrument(skip(self, token))]
    async fn fetch(&self, token: &BearerToken) -> Result<CartEnvelope, ApiError> {
        self.api.get_with_retry("cart", Some(token)).await
    }

    #[instrument(skip(self, token), fields(action = action.kind().as_str()))]
    async fn mutate(
        &self,
        token: &BearerToken,
        action: &CartAction,
    ) -> Result<CartEnvelope, ApiError> {
        self.api
            .request(
                action.method(),
                &action.path(),
                Some(token),
                action.body().as_ref(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_method_path_and_body() {
        let add = CartAction::Add {
            product_id: ProductId::new("P1"),
        };
        assert_eq!(add.method(), Method::POST);
        assert_eq!(add.path(), "cart");
        assert_eq!(add.body(), Some(json!({ "productId": "P1" })));
        assert_eq!(add.kind(), ActionKind::Add);

        let update = CartAction::SetQuantity {
            product_id: ProductId::new("P1"),
            quantity: Quantity::clamped(3),
        };
        assert_eq!(update.method(), Method::PUT);
        assert_eq!(update.path(), "cart/P1");
        assert_eq!(update.body(), Some(json!({ "count": 3 })));

        let remove = CartAction::Remove {
            product_id: ProductId::new("P1"),
        };
        assert_eq!(remove.method(), Method::DELETE);
        assert_eq!(remove.path(), "cart/P1");
        assert_eq!(remove.body(), None);
        assert_eq!(remove.kind(), ActionKind::Delete);

        assert_eq!(CartAction::Clear.method(), Method::DELETE);
        assert_eq!(CartAction::Clear.path(), "cart");
        assert_eq!(CartAction::Clear.kind(), ActionKind::Delete);
    }

    #[test]
    fn populated_fetch_envelope_decodes() {
        let raw = r#"{
            "status": "success",
            "numOfCartItems": 2,
            "data": {
                "_id": "cart-1",
                "products": [
                    {
                        "count": 2,
                        "price": 549,
                        "product": {
                            "_id": "P1",
                            "title": "Woman Shawl",
                            "imageCover": "https://cdn.example/shawl.jpg"
                        }
                    }
                ]
            }
        }"#;

        let envelope: CartEnvelope = serde_json::from_str(raw).expect("decode");
        let payload = envelope.into_outcome().expect("success");

        assert_eq!(payload.count, 2);
        assert_eq!(payload.id, Some(CartId::new("cart-1")));
        assert_eq!(payload.lines.len(), 1);

        let line = payload.lines.first().expect("one line");
        assert_eq!(line.product.id, ProductId::new("P1"));
        assert_eq!(line.product.title.as_deref(), Some("Woman Shawl"));
        assert_eq!(line.quantity, Quantity::clamped(2));
        assert_eq!(line.unit_price, Price::from(549u32));
    }

    #[test]
    fn bare_product_reference_decodes() {
        let raw = r#"{
            "message": "success",
            "numOfCartItems": 1,
            "data": { "_id": "cart-1", "products": [ { "count": 1, "price": 10, "product": "P1" } ] }
        }"#;

        let envelope: CartEnvelope = serde_json::from_str(raw).expect("decode");
        let payload = envelope.into_outcome().expect("success");
        let line = payload.lines.first().expect("one line");
        assert_eq!(line.product, ProductRef::bare(ProductId::new("P1")));
    }

    #[test]
    fn clear_acknowledgement_decodes_to_empty_payload() {
        let raw = r#"{ "message": "success" }"#;
        let envelope: CartEnvelope = serde_json::from_str(raw).expect("decode");
        let payload = envelope.into_outcome().expect("success");

        assert!(payload.lines.is_empty());
        assert_eq!(payload.count, 0);
        assert_eq!(payload.id, None);
    }

    #[test]
    fn rejection_surfaces_server_message() {
        let raw = r#"{ "status": "fail", "message": "Invalid product id" }"#;
        let envelope: CartEnvelope = serde_json::from_str(raw).expect("decode");
        assert_eq!(
            envelope.into_outcome(),
            Err(Some("Invalid product id".to_owned()))
        );
    }
}
