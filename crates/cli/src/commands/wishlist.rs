//! Wishlist commands.
//!
//! # Usage
//!
//! ```bash
//! fc-cli wishlist show
//! fc-cli wishlist toggle <product-id>
//! ```

use freshcart_client::Storefront;
use freshcart_client::error::ApiError;
use freshcart_client::wishlist::Toggled;
use freshcart_core::ProductId;
use tracing::info;

use super::CommandError;

/// Fetch and display the wishlist.
///
/// # Errors
///
/// Returns an error when not signed in or when the fetch failed.
pub async fn show(storefront: &Storefront) -> Result<(), CommandError> {
    require_session(storefront)?;

    storefront.wishlist().refresh().await;

    if let Some(message) = storefront.wishlist().store().last_error() {
        return Err(CommandError::Failed(message));
    }

    let snapshot = storefront.wishlist().store().snapshot();
    if snapshot.products.is_empty() {
        info!("Wishlist is empty");
        return Ok(());
    }

    info!("Wishlist ({} item(s)):", snapshot.count);
    for product in &snapshot.products {
        info!("  {}  {}  [{}]", product.title, product.price, product.id);
    }
    Ok(())
}

/// Add or remove a product from the wishlist.
///
/// # Errors
///
/// Returns an error when not signed in or when the server rejects the
/// mutation.
pub async fn toggle(storefront: &Storefront, product_id: &str) -> Result<(), CommandError> {
    require_session(storefront)?;

    let toggled = storefront
        .wishlist()
        .toggle(ProductId::new(product_id))
        .await?;

    match toggled {
        Some(Toggled::Added) => info!("Added {product_id} to the wishlist"),
        Some(Toggled::Removed) => info!("Removed {product_id} from the wishlist"),
        None => return Err(CommandError::Api(ApiError::NotSignedIn)),
    }
    Ok(())
}

fn require_session(storefront: &Storefront) -> Result<(), CommandError> {
    if storefront.session().is_authenticated() {
        Ok(())
    } else {
        Err(CommandError::Api(ApiError::NotSignedIn))
    }
}
