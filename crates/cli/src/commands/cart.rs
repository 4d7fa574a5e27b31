//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! fc-cli cart show
//! fc-cli cart add <product-id>
//! fc-cli cart set-quantity <product-id> <count>
//! fc-cli cart remove <product-id>
//! fc-cli cart clear
//! ```
//!
//! All commands require `FRESHCART_TOKEN`; without it the synchronizer
//! skips the call silently, which these commands report as "not signed in".

use freshcart_client::Storefront;
use freshcart_client::cart::CartSnapshot;
use freshcart_client::error::ApiError;
use freshcart_core::ProductId;
use tracing::info;

use super::CommandError;

/// Fetch and display the cart.
///
/// # Errors
///
/// Returns an error when not signed in or when the fetch failed.
pub async fn show(storefront: &Storefront) -> Result<(), CommandError> {
    require_session(storefront)?;

    storefront.cart().refresh().await;

    // Fetch failures are recorded on the store rather than returned.
    if let Some(message) = storefront.cart().store().last_error() {
        return Err(CommandError::Failed(message));
    }

    display(&storefront.cart().store().snapshot());
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error when not signed in or when the server rejects the add.
pub async fn add(storefront: &Storefront, product_id: &str) -> Result<(), CommandError> {
    require_session(storefront)?;

    storefront
        .cart()
        .add(ProductId::new(product_id))
        .await?;

    info!(
        "Added {product_id}; cart now holds {} item(s)",
        storefront.cart().store().count()
    );
    Ok(())
}

/// Set the quantity of a cart line.
///
/// # Errors
///
/// Returns an error when not signed in or when the server rejects the
/// update.
pub async fn set_quantity(
    storefront: &Storefront,
    product_id: &str,
    count: u32,
) -> Result<(), CommandError> {
    require_session(storefront)?;

    storefront
        .cart()
        .set_quantity(ProductId::new(product_id), count)
        .await?;

    info!(
        "Updated {product_id}; cart now holds {} item(s)",
        storefront.cart().store().count()
    );
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error when not signed in or when the server rejects the
/// removal.
pub async fn remove(storefront: &Storefront, product_id: &str) -> Result<(), CommandError> {
    require_session(storefront)?;

    storefront
        .cart()
        .remove(ProductId::new(product_id))
        .await?;

    info!(
        "Removed {product_id}; cart now holds {} item(s)",
        storefront.cart().store().count()
    );
    Ok(())
}

/// Delete the whole cart.
///
/// # Errors
///
/// Returns an error when not signed in or when the server rejects the
/// clear.
pub async fn clear(storefront: &Storefront) -> Result<(), CommandError> {
    require_session(storefront)?;

    storefront.cart().clear().await?;
    info!("Cart cleared");
    Ok(())
}

fn display(snapshot: &CartSnapshot) {
    if snapshot.lines.is_empty() {
        info!("Cart is empty");
        return;
    }

    info!("Cart ({} item(s)):", snapshot.count);
    for line in &snapshot.lines {
        info!(
            "  {} x{}  {}  [{}]",
            line.product.title.as_deref().unwrap_or("(unnamed product)"),
            line.quantity,
            line.line_total(),
            line.product.id,
        );
    }
    if let Some(id) = &snapshot.id {
        info!("Cart id: {id}");
    }
}

fn require_session(storefront: &Storefront) -> Result<(), CommandError> {
    if storefront.session().is_authenticated() {
        Ok(())
    } else {
        Err(CommandError::Api(ApiError::NotSignedIn))
    }
}
