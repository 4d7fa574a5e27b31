//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use freshcart_client::AuthSession;
use freshcart_client::error::ApiError;
use freshcart_core::{BearerToken, EmailError};
use thiserror::Error;

/// Environment variable holding the session token between invocations.
pub const TOKEN_ENV: &str = "FRESHCART_TOKEN";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The email argument did not parse.
    #[error(transparent)]
    Email(#[from] EmailError),

    /// The shipping address arguments did not validate.
    #[error(transparent)]
    Address(#[from] freshcart_client::types::AddressError),

    /// The return URL did not parse.
    #[error("Invalid return URL: {0}")]
    Url(#[from] url::ParseError),

    /// A cart-scoped command ran before any cart id was known.
    #[error("No cart known for this session - add something first or pass --cart-id")]
    NoCart,

    /// A fetch failed; the store recorded this message.
    #[error("{0}")]
    Failed(String),
}

/// Build the session from `FRESHCART_TOKEN`, when set.
#[must_use]
pub fn session_from_env() -> AuthSession {
    dotenvy::dotenv().ok();
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => AuthSession::with_token(BearerToken::new(token)),
        _ => AuthSession::new(),
    }
}
