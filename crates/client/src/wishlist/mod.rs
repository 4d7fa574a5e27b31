//! Wishlist state synchronization.
//!
//! Mirrors the cart pair on a smaller scale: a passive [`WishlistStore`]
//! and a [`WishlistSynchronizer`] with fetch and toggle operations. Toggle
//! consults the current snapshot for membership, issues a plain add or
//! remove, and refetches - mutation responses acknowledge with ids only,
//! so the populated listing always comes from the server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::Mutex;
use tracing::instrument;

use freshcart_core::ProductId;

use crate::api::wishlist::{
    HttpWishlistGateway, WishlistAction, WishlistGateway, WishlistPayload,
};
use crate::error::ApiError;
use crate::session::AuthSession;
use crate::types::Product;

/// Fallback display message for wishlist fetch failures.
const FETCH_FAILURE: &str = "Failed to fetch wishlist.";
/// Fallback display message for wishlist mutation failures.
const TOGGLE_FAILURE: &str = "Failed to update wishlist.";

/// The client's local copy of the wishlist.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WishlistSnapshot {
    /// Wishlist products in server order.
    pub products: Vec<Product>,
    /// Server-reported item count.
    pub count: u32,
}

impl WishlistSnapshot {
    /// Whether the given product is on the wishlist.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.iter().any(|p| &p.id == product_id)
    }
}

/// What a toggle ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    /// The product was absent and has been added.
    Added,
    /// The product was present and has been removed.
    Removed,
}

/// Passive container for the wishlist snapshot, busy flags, and last error.
#[derive(Clone, Default)]
pub struct WishlistStore {
    inner: Arc<WishlistStoreInner>,
}

#[derive(Default)]
struct WishlistStoreInner {
    snapshot: StdMutex<WishlistSnapshot>,
    loading: AtomicBool,
    mutating: AtomicBool,
    last_error: StdMutex<Option<String>>,
}

impl WishlistStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> WishlistSnapshot {
        self.inner
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Server-reported item count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.inner
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// Whether a toggle is in flight.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        self.inner.mutating.load(Ordering::SeqCst)
    }

    /// The most recent failure message, if the last settled call failed.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, snapshot: WishlistSnapshot) {
        *self
            .inner
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    fn record_error(&self, message: String) {
        *self
            .inner
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message);
    }

    fn clear_error(&self) {
        *self
            .inner
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn begin(&self, flag: fn(&WishlistStoreInner) -> &AtomicBool) -> WishlistBusyGuard {
        flag(&self.inner).store(true, Ordering::SeqCst);
        WishlistBusyGuard {
            inner: Arc::clone(&self.inner),
            flag,
        }
    }
}

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("count", &self.count())
            .field("last_error", &self.last_error())
            .finish_non_exhaustive()
    }
}

struct WishlistBusyGuard {
    inner: Arc<WishlistStoreInner>,
    flag: fn(&WishlistStoreInner) -> &AtomicBool,
}

impl Drop for WishlistBusyGuard {
    fn drop(&mut self) {
        (self.flag)(&self.inner).store(false, Ordering::SeqCst);
    }
}

/// Reconciles the local [`WishlistStore`] with the remote wishlist.
///
/// Operations are silent no-ops while no credential is present.
pub struct WishlistSynchronizer<G = HttpWishlistGateway> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for WishlistSynchronizer<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<G> {
    gateway: G,
    session: AuthSession,
    store: WishlistStore,
    /// Serializes toggles so membership checks see settled state.
    mutations: Mutex<()>,
}

impl<G: WishlistGateway> WishlistSynchronizer<G> {
    /// Create a synchronizer over a gateway, with a fresh empty store.
    #[must_use]
    pub fn new(gateway: G, session: AuthSession) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                session,
                store: WishlistStore::new(),
                mutations: Mutex::new(()),
            }),
        }
    }

    /// The store consumers observe.
    #[must_use]
    pub fn store(&self) -> &WishlistStore {
        &self.inner.store
    }

    /// Fetch the wishlist and replace the snapshot on success. Failures are
    /// recorded, not returned.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let Some(token) = self.inner.session.token() else {
            return;
        };

        let _busy = self.inner.store.begin(|i| &i.loading);
        self.inner.store.clear_error();

        let outcome = match self.inner.gateway.fetch(&token).await {
            Ok(envelope) => envelope.into_outcome(),
            Err(e) => Err(e.server_message().map(str::to_owned)),
        };

        match outcome {
            Ok(payload) => self.apply_payload(payload),
            Err(server_message) => {
                let message = server_message.unwrap_or_else(|| FETCH_FAILURE.to_owned());
                tracing::warn!(error = %message, "wishlist fetch failed");
                self.inner.store.record_error(message);
            }
        }
    }

    /// Toggle a product's wishlist membership: add when absent, remove when
    /// present, then refetch the populated listing.
    ///
    /// # Errors
    ///
    /// Returns the failure after recording it in the store. A missing
    /// credential is a silent no-op reported as [`Toggled::Added`] never
    /// having happened - the call returns `Ok(None)`.
    pub async fn toggle(&self, product_id: ProductId) -> Result<Option<Toggled>, ApiError> {
        let Some(token) = self.inner.session.token() else {
            return Ok(None);
        };

        let _serialized = self.inner.mutations.lock().await;
        let _busy = self.inner.store.begin(|i| &i.mutating);
        self.inner.store.clear_error();

        let (action, toggled) = if self.inner.store.snapshot().contains(&product_id) {
            (WishlistAction::Remove { product_id }, Toggled::Removed)
        } else {
            (WishlistAction::Add { product_id }, Toggled::Added)
        };

        let ack = match self.inner.gateway.mutate(&token, &action).await {
            Ok(ack) => ack,
            Err(e) => {
                let message = e
                    .server_message()
                    .map_or_else(|| TOGGLE_FAILURE.to_owned(), str::to_owned);
                self.inner.store.record_error(message);
                return Err(e);
            }
        };

        if let Err(server_message) = ack {
            let message = server_message
                .clone()
                .unwrap_or_else(|| TOGGLE_FAILURE.to_owned());
            self.inner.store.record_error(message);
            return Err(ApiError::Rejected {
                message: server_message,
            });
        }

        // Mutation acknowledged with ids only; refetch the populated list.
        if let Ok(envelope) = self.inner.gateway.fetch(&token).await
            && let Ok(payload) = envelope.into_outcome()
        {
            self.apply_payload(payload);
        }

        Ok(Some(toggled))
    }

    fn apply_payload(&self, payload: WishlistPayload) {
        self.inner.store.replace(WishlistSnapshot {
            products: payload.products,
            count: payload.count,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use freshcart_core::BearerToken;

    use crate::api::wishlist::{AckOutcome, WishlistEnvelope};

    use super::*;

    #[derive(Default)]
    struct FakeGateway {
        fetches: StdMutex<VecDeque<WishlistEnvelope>>,
        acks: StdMutex<VecDeque<AckOutcome>>,
        actions_seen: StdMutex<Vec<WishlistAction>>,
    }

    impl FakeGateway {
        fn queue_fetch(&self, raw: &str) {
            self.fetches
                .lock()
                .expect("lock")
                .push_back(serde_json::from_str(raw).expect("fixture decodes"));
        }

        fn queue_ack(&self, ack: AckOutcome) {
            self.acks.lock().expect("lock").push_back(ack);
        }

        fn actions(&self) -> Vec<WishlistAction> {
            self.actions_seen.lock().expect("lock").clone()
        }
    }

    impl WishlistGateway for FakeGateway {
        async fn fetch(&self, _token: &BearerToken) -> Result<WishlistEnvelope, ApiError> {
            Ok(self
                .fetches
                .lock()
                .expect("lock")
                .pop_front()
                .expect("unexpected fetch"))
        }

        async fn mutate(
            &self,
            _token: &BearerToken,
            action: &WishlistAction,
        ) -> Result<AckOutcome, ApiError> {
            self.actions_seen.lock().expect("lock").push(action.clone());
            Ok(self
                .acks
                .lock()
                .expect("lock")
                .pop_front()
                .expect("unexpected mutation"))
        }
    }

    fn signed_in() -> AuthSession {
        AuthSession::with_token(BearerToken::new("tok"))
    }

    const LIST_WITH_P1: &str = r#"{
        "status": "success",
        "count": 1,
        "data": [ { "_id": "P1", "title": "Woman Shawl", "price": 149 } ]
    }"#;

    const EMPTY_LIST: &str = r#"{ "status": "success", "count": 0, "data": [] }"#;

    #[tokio::test]
    async fn refresh_populates_snapshot() {
        let gateway = FakeGateway::default();
        gateway.queue_fetch(LIST_WITH_P1);
        let sync = WishlistSynchronizer::new(gateway, signed_in());

        sync.refresh().await;

        let snapshot = sync.store().snapshot();
        assert_eq!(snapshot.count, 1);
        assert!(snapshot.contains(&ProductId::new("P1")));
    }

    #[tokio::test]
    async fn toggle_adds_when_absent() {
        let gateway = FakeGateway::default();
        gateway.queue_ack(Ok(()));
        gateway.queue_fetch(LIST_WITH_P1);
        let sync = WishlistSynchronizer::new(gateway, signed_in());

        let toggled = sync
            .toggle(ProductId::new("P1"))
            .await
            .expect("toggle succeeds");
        assert_eq!(toggled, Some(Toggled::Added));
        assert_eq!(
            sync.inner.gateway.actions(),
            vec![WishlistAction::Add {
                product_id: ProductId::new("P1")
            }]
        );
        assert!(sync.store().snapshot().contains(&ProductId::new("P1")));
    }

    #[tokio::test]
    async fn toggle_removes_when_present() {
        let gateway = FakeGateway::default();
        gateway.queue_fetch(LIST_WITH_P1);
        gateway.queue_ack(Ok(()));
        gateway.queue_fetch(EMPTY_LIST);
        let sync = WishlistSynchronizer::new(gateway, signed_in());

        sync.refresh().await;
        let toggled = sync
            .toggle(ProductId::new("P1"))
            .await
            .expect("toggle succeeds");

        assert_eq!(toggled, Some(Toggled::Removed));
        assert_eq!(
            sync.inner.gateway.actions(),
            vec![WishlistAction::Remove {
                product_id: ProductId::new("P1")
            }]
        );
        assert_eq!(sync.store().count(), 0);
    }

    #[tokio::test]
    async fn toggle_without_credential_is_a_silent_no_op() {
        let gateway = FakeGateway::default();
        let sync = WishlistSynchronizer::new(gateway, AuthSession::new());

        let toggled = sync
            .toggle(ProductId::new("P1"))
            .await
            .expect("silent no-op");
        assert_eq!(toggled, None);
        assert!(sync.inner.gateway.actions().is_empty());
    }

    #[tokio::test]
    async fn rejected_toggle_records_and_returns_the_error() {
        let gateway = FakeGateway::default();
        gateway.queue_ack(Err(Some("Expired token".to_owned())));
        let sync = WishlistSynchronizer::new(gateway, signed_in());

        let err = sync
            .toggle(ProductId::new("P1"))
            .await
            .expect_err("rejected");
        assert_eq!(err.server_message(), Some("Expired token"));
        assert_eq!(sync.store().last_error().as_deref(), Some("Expired token"));
        assert!(!sync.store().is_mutating());
    }
}
