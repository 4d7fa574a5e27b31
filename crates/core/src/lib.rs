//! FreshCart Core - Shared types library.
//!
//! This crate provides common types used across all FreshCart components:
//! - `client` - API gateway, cart/wishlist synchronization, catalog reads
//! - `cli` - Command-line tool exercising the client library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, quantities,
//!   emails, and credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
