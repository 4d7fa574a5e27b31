//! Passive cart state container.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use freshcart_core::CartId;

use crate::api::cart::ActionKind;
use crate::types::CartLine;

/// The client's full local copy of cart state.
///
/// Always a wholesale copy of the most recent successful server response;
/// never patched or merged client-side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartSnapshot {
    /// Cart lines in server order (order is not semantically significant).
    pub lines: Vec<CartLine>,
    /// Server-reported total item count. The server is authoritative; this
    /// is not necessarily `sum(lines.quantity)`.
    pub count: u32,
    /// Remote cart resource id. Set only from a server response.
    pub id: Option<CartId>,
}

/// Independent busy flag per action tag. Multiple different actions may be
/// busy at once.
#[derive(Debug, Default)]
struct BusyFlags {
    fetch: AtomicBool,
    add: AtomicBool,
    update: AtomicBool,
    delete: AtomicBool,
}

impl BusyFlags {
    const fn flag(&self, kind: ActionKind) -> &AtomicBool {
        match kind {
            ActionKind::Fetch => &self.fetch,
            ActionKind::Add => &self.add,
            ActionKind::Update => &self.update,
            ActionKind::Delete => &self.delete,
        }
    }
}

/// Passive container for the cart snapshot, per-action busy flags, and the
/// last-error slot.
///
/// No validation happens here. Consumers hold clones and read; the
/// synchronizer performs all writes.
#[derive(Clone, Default)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

#[derive(Default)]
struct CartStoreInner {
    snapshot: RwLock<CartSnapshot>,
    busy: BusyFlags,
    last_error: RwLock<Option<String>>,
}

impl CartStore {
    /// Create an empty store (no cart fetched yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Server-reported item count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }

    /// Remote cart id, once one has been observed.
    #[must_use]
    pub fn id(&self) -> Option<CartId> {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .id
            .clone()
    }

    /// Whether the given action is currently in flight.
    #[must_use]
    pub fn is_busy(&self, kind: ActionKind) -> bool {
        self.inner.busy.flag(kind).load(Ordering::SeqCst)
    }

    /// Whether the cart is being fetched (the snapshot-wide loading state).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_busy(ActionKind::Fetch)
    }

    /// The most recent failure message, if the last settled call failed.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner
            .last_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the snapshot wholesale.
    pub(crate) fn replace(&self, snapshot: CartSnapshot) {
        *self
            .inner
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    pub(crate) fn record_error(&self, message: String) {
        *self
            .inner
            .last_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(message);
    }

    pub(crate) fn clear_error(&self) {
        *self
            .inner
            .last_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Mark `kind` busy until the returned guard drops.
    ///
    /// The guard clears the flag on settlement - success, error, and early
    /// return alike.
    pub(crate) fn begin(&self, kind: ActionKind) -> BusyGuard {
        self.inner.busy.flag(kind).store(true, Ordering::SeqCst);
        BusyGuard {
            inner: Arc::clone(&self.inner),
            kind,
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("snapshot", &self.snapshot())
            .field("last_error", &self.last_error())
            .finish_non_exhaustive()
    }
}

/// Clears the owning store's busy flag for one action when dropped.
pub(crate) struct BusyGuard {
    inner: Arc<CartStoreInner>,
    kind: ActionKind,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.busy.flag(self.kind).store(false, Ordering::SeqCst);
    }
}
