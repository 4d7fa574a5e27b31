//! FreshCart client library.
//!
//! Typed access to the FreshCart storefront REST API: authentication, the
//! product catalog, and synchronized cart and wishlist state.
//!
//! # Architecture
//!
//! - The server is the source of truth - every successful response replaces
//!   the local snapshot wholesale, nothing is patched or merged client-side
//! - One gateway per resource behind a trait seam, HTTP implementations on a
//!   shared [`api::ApiClient`]
//! - Passive stores ([`cart::CartStore`], [`wishlist::WishlistStore`]) expose
//!   read-only observations; only their synchronizer writes to them
//! - Catalog reads are cached in memory via `moka` (1 hour TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use freshcart_client::{config::ClientConfig, state::Storefront};
//!
//! let storefront = Storefront::new(ClientConfig::from_env()?);
//!
//! storefront.auth().sign_in(&email, password).await?;
//! storefront.cart().add("6428ebc6dc1175abc65ca0b9".into()).await?;
//!
//! let snapshot = storefront.cart().store().snapshot();
//! println!("{} items in cart", snapshot.count);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod types;
pub mod wishlist;

pub use config::ClientConfig;
pub use error::ApiError;
pub use session::AuthSession;
pub use state::Storefront;
