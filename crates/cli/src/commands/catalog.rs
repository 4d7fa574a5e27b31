//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! fc-cli products list
//! fc-cli products show <id>
//! fc-cli categories
//! fc-cli brands
//! ```
//!
//! Catalog reads are public; no token required.

use freshcart_client::Storefront;
use freshcart_core::ProductId;
use tracing::info;

use super::CommandError;

/// List the product catalog.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn products(storefront: &Storefront) -> Result<(), CommandError> {
    let products = storefront.catalog().products().await?;

    info!("{} product(s):", products.len());
    for product in products.iter() {
        info!(
            "  {}  {}  [{}]",
            product.title, product.price, product.id
        );
    }
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns an error if the product is not found or the request fails.
pub async fn product(storefront: &Storefront, id: &str) -> Result<(), CommandError> {
    let product = storefront.catalog().product(&ProductId::new(id)).await?;

    info!("{}", product.title);
    info!("  Price: {}", product.price);
    info!(
        "  Rating: {} ({} review(s))",
        product.ratings_average, product.ratings_quantity
    );
    if let Some(category) = &product.category {
        info!("  Category: {}", category.name);
    }
    if let Some(brand) = &product.brand {
        info!("  Brand: {}", brand.name);
    }
    if let Some(description) = &product.description {
        info!("  {description}");
    }
    Ok(())
}

/// List product categories.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn categories(storefront: &Storefront) -> Result<(), CommandError> {
    let categories = storefront.catalog().categories().await?;

    info!("{} categor(ies):", categories.len());
    for category in categories.iter() {
        info!("  {}  [{}]", category.name, category.id);
    }
    Ok(())
}

/// List product brands.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn brands(storefront: &Storefront) -> Result<(), CommandError> {
    let brands = storefront.catalog().brands().await?;

    info!("{} brand(s):", brands.len());
    for brand in brands.iter() {
        info!("  {}  [{}]", brand.name, brand.id);
    }
    Ok(())
}
