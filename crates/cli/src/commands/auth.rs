//! Sign-in and token verification commands.
//!
//! # Usage
//!
//! ```bash
//! fc-cli login -e user@example.com -p "hunter2..."
//! fc-cli verify
//! ```

use freshcart_client::Storefront;
use freshcart_core::Email;
use tracing::info;

use super::{CommandError, TOKEN_ENV};

/// Sign in and print the token for use in later invocations.
///
/// # Errors
///
/// Returns an error if the email does not parse or the server rejects the
/// credentials.
pub async fn login(
    storefront: &Storefront,
    email: &str,
    password: &str,
) -> Result<(), CommandError> {
    let email = Email::parse(email)?;

    let user = storefront.auth().sign_in(&email, password).await?;

    info!("Signed in as {} <{}>", user.name, user.email);
    if let Some(token) = storefront.session().token() {
        info!("Export the session token for later commands:");
        info!("  export {}={}", TOKEN_ENV, token.expose());
    }
    Ok(())
}

/// Verify the stored token against the server.
///
/// # Errors
///
/// Returns an error if no token is stored or the server rejects it.
pub async fn verify(storefront: &Storefront) -> Result<(), CommandError> {
    storefront.auth().verify().await?;
    info!("Token is valid");
    Ok(())
}
