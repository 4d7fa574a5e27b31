//! Aggregate handle wiring all clients to one session and configuration.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::api::auth::AuthClient;
use crate::api::cart::HttpCartGateway;
use crate::api::catalog::{CatalogClient, HttpCatalogGateway};
use crate::api::orders::OrdersClient;
use crate::api::wishlist::HttpWishlistGateway;
use crate::cart::CartSynchronizer;
use crate::config::ClientConfig;
use crate::session::AuthSession;
use crate::wishlist::WishlistSynchronizer;

/// One storefront: shared HTTP client, one auth session, and the cart,
/// wishlist, catalog, and order clients wired to it.
///
/// Cheaply cloneable; consumers receive this by injection rather than
/// through any global state.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: ClientConfig,
    session: AuthSession,
    auth: AuthClient,
    catalog: CatalogClient,
    cart: CartSynchronizer,
    wishlist: WishlistSynchronizer,
    orders: OrdersClient,
}

impl Storefront {
    /// Create a storefront with a fresh, unauthenticated session.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_session(config, AuthSession::new())
    }

    /// Create a storefront around an existing session (e.g. a token taken
    /// from the environment on CLI startup).
    #[must_use]
    pub fn with_session(config: ClientConfig, session: AuthSession) -> Self {
        let api = ApiClient::new(config.clone());

        let auth = AuthClient::new(api.clone(), session.clone());
        let catalog = CatalogClient::new(
            HttpCatalogGateway::new(api.clone()),
            config.catalog_cache_ttl,
            config.catalog_cache_capacity,
        );
        let cart = CartSynchronizer::new(HttpCartGateway::new(api.clone()), session.clone());
        let wishlist =
            WishlistSynchronizer::new(HttpWishlistGateway::new(api.clone()), session.clone());
        let orders = OrdersClient::new(api, session.clone());

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                session,
                auth,
                catalog,
                cart,
                wishlist,
                orders,
            }),
        }
    }

    /// The configuration this storefront was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The shared authentication session.
    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.inner.session
    }

    /// Authentication endpoints.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Cached catalog reads.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// The cart synchronizer.
    #[must_use]
    pub fn cart(&self) -> &CartSynchronizer {
        &self.inner.cart
    }

    /// The wishlist synchronizer.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistSynchronizer {
        &self.inner.wishlist
    }

    /// Order checkout.
    #[must_use]
    pub fn orders(&self) -> &OrdersClient {
        &self.inner.orders
    }
}

#[cfg(test)]
mod tests {
    use freshcart_core::BearerToken;

    use super::*;

    #[test]
    fn components_share_one_session() {
        let storefront = Storefront::new(ClientConfig::default());
        assert!(!storefront.session().is_authenticated());

        storefront.session().set(BearerToken::new("tok"));
        assert!(storefront.auth().session().is_authenticated());
    }
}
