//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! fc-cli checkout --details "12 Nile St" --phone 01012345678 --city Cairo
//! ```
//!
//! Uses the cart id the server reports for this session unless `--cart-id`
//! is passed explicitly.

use freshcart_client::Storefront;
use freshcart_client::types::ShippingAddress;
use freshcart_core::CartId;
use tracing::info;
use url::Url;

use super::CommandError;

/// Create a hosted payment session and print its URL.
///
/// # Errors
///
/// Returns an error when not signed in, when the address does not validate,
/// when no cart id can be determined, or when the server rejects the
/// request.
pub async fn create_session(
    storefront: &Storefront,
    details: &str,
    phone: &str,
    city: &str,
    cart_id: Option<&str>,
    return_url: &str,
) -> Result<(), CommandError> {
    let address = ShippingAddress::new(details, phone, city)?;
    let return_url = Url::parse(return_url)?;

    let cart_id = match cart_id {
        Some(id) => CartId::new(id),
        None => {
            // The server reports the cart id on fetch.
            storefront.cart().refresh().await;
            storefront
                .cart()
                .store()
                .id()
                .ok_or(CommandError::NoCart)?
        }
    };

    let session = storefront
        .orders()
        .checkout_session(&cart_id, &address, &return_url)
        .await?;

    info!("Checkout session created for cart {cart_id}");
    info!("Complete payment at:");
    info!("  {}", session.url);
    Ok(())
}
