//! Cart state synchronization.
//!
//! Split the way the rest of the crate is: a passive [`CartStore`] holding
//! the snapshot, busy flags, and last error, and a [`CartSynchronizer`]
//! that issues gateway calls and reconciles the snapshot with each server
//! response. Consumers read the store; only the synchronizer writes to it.

mod store;
mod sync;

pub use crate::api::cart::ActionKind;
pub use store::{CartSnapshot, CartStore};
pub use sync::CartSynchronizer;
