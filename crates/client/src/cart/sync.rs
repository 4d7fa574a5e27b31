//! Cart synchronizer.
//!
//! Issues gateway calls for each action and reconciles the local snapshot
//! with the server's response. The server is authoritative: a successful
//! response replaces the snapshot wholesale, a failed call leaves it fully
//! intact - there is no partial rollback and no client-side merge.
//!
//! Mutations are serialized through a single-flight lock so two concurrent
//! mutations cannot race their responses into the snapshot. `refresh` does
//! not take the lock; a read racing a mutation resolves last-response-wins.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use freshcart_core::{ProductId, Quantity};

use crate::api::cart::{ActionKind, CartAction, CartGateway, HttpCartGateway};
use crate::error::ApiError;
use crate::session::AuthSession;

use super::store::{CartSnapshot, CartStore};

/// Reconciles the local [`CartStore`] with the remote cart resource.
///
/// All operations are silent no-ops while no credential is present in the
/// session: they neither contact the gateway nor touch the store.
pub struct CartSynchronizer<G = HttpCartGateway> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for CartSynchronizer<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<G> {
    gateway: G,
    session: AuthSession,
    store: CartStore,
    /// Single-flight lock serializing mutating calls against this cart.
    mutations: Mutex<()>,
}

impl<G: CartGateway> CartSynchronizer<G> {
    /// Create a synchronizer over a gateway, with a fresh empty store.
    #[must_use]
    pub fn new(gateway: G, session: AuthSession) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                session,
                store: CartStore::new(),
                mutations: Mutex::new(()),
            }),
        }
    }

    /// The store consumers observe.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.inner.store
    }

    /// Fetch the cart and replace the snapshot on success.
    ///
    /// Fetch failures are recorded in the store's last-error slot and not
    /// returned; the prior snapshot stays visible.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let Some(token) = self.inner.session.token() else {
            return;
        };

        let _busy = self.inner.store.begin(ActionKind::Fetch);
        self.inner.store.clear_error();

        let outcome = match self.inner.gateway.fetch(&token).await {
            Ok(envelope) => envelope.into_outcome().map_err(|message| ApiError::Rejected { message }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(payload) => self.inner.store.replace(CartSnapshot {
                lines: payload.lines,
                count: payload.count,
                id: payload.id,
            }),
            Err(e) => {
                let message = display_message(&e, ActionKind::Fetch);
                tracing::warn!(error = %e, "cart fetch failed");
                self.inner.store.record_error(message);
            }
        }
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns the failure after recording it in the store, so a caller can
    /// surface an inline message next to the triggering control.
    pub async fn add(&self, product_id: ProductId) -> Result<(), ApiError> {
        self.apply(CartAction::Add { product_id }).await
    }

    /// Set the quantity of a product's line. Values below 1 are clamped to
    /// 1 before transmission.
    ///
    /// # Errors
    ///
    /// Returns the failure after recording it in the store.
    pub async fn set_quantity(&self, product_id: ProductId, count: u32) -> Result<(), ApiError> {
        self.apply(CartAction::SetQuantity {
            product_id,
            quantity: Quantity::clamped(count),
        })
        .await
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// Returns the failure after recording it in the store.
    pub async fn remove(&self, product_id: ProductId) -> Result<(), ApiError> {
        self.apply(CartAction::Remove { product_id }).await
    }

    /// Delete the whole cart resource.
    ///
    /// # Errors
    ///
    /// Returns the failure after recording it in the store.
    pub async fn clear(&self) -> Result<(), ApiError> {
        self.apply(CartAction::Clear).await
    }

    /// All mutating call sites funnel through here.
    #[instrument(skip(self), fields(action = action.kind().as_str()))]
    async fn apply(&self, action: CartAction) -> Result<(), ApiError> {
        let Some(token) = self.inner.session.token() else {
            // No credential: silently skipped, not an error.
            return Ok(());
        };

        let _serialized = self.inner.mutations.lock().await;
        let kind = action.kind();
        let _busy = self.inner.store.begin(kind);
        self.inner.store.clear_error();

        let outcome = match self.inner.gateway.mutate(&token, &action).await {
            Ok(envelope) => envelope.into_outcome().map_err(|message| ApiError::Rejected { message }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(payload) => {
                // The cart id is kept from the prior snapshot when a
                // mutation response (e.g. a clear acknowledgement) omits it.
                let id = payload.id.or_else(|| self.inner.store.id());
                self.inner.store.replace(CartSnapshot {
                    lines: payload.lines,
                    count: payload.count,
                    id,
                });
                Ok(())
            }
            Err(e) => {
                self.inner.store.record_error(display_message(&e, kind));
                Err(e)
            }
        }
    }
}

/// Display text for the store: the server's own message when there is one,
/// the per-action generic otherwise.
fn display_message(err: &ApiError, kind: ActionKind) -> String {
    err.server_message()
        .map_or_else(|| kind.generic_failure().to_owned(), str::to_owned)
}
