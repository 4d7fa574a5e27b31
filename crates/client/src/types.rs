//! Domain types for the storefront API.
//!
//! These types provide a clean API separate from the raw wire envelopes the
//! gateways decode (see [`crate::api`]).

use chrono::{DateTime, Utc};
use freshcart_core::{BrandId, CategoryId, Price, ProductId, Quantity};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Types
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Category image URL.
    pub image: Option<String>,
}

/// A product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Brand ID.
    pub id: BrandId,
    /// Display name.
    pub name: String,
    /// Brand logo URL.
    pub image: Option<String>,
}

/// A catalog product as returned by the listing and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long description (detail endpoint only).
    pub description: Option<String>,
    /// Cover image URL.
    pub image_cover: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Average review rating.
    pub ratings_average: f64,
    /// Number of reviews.
    pub ratings_quantity: u32,
    /// Owning category.
    pub category: Option<Category>,
    /// Owning brand.
    pub brand: Option<Brand>,
    /// Server-side creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Denormalized product display fields embedded in a cart line.
///
/// These are whatever the server returned at snapshot time; they are not
/// refreshed independently and age until the next full fetch. Mutation
/// responses sometimes carry only the bare product id, in which case the
/// display fields are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product ID.
    pub id: ProductId,
    /// Display title, when the server populated the reference.
    pub title: Option<String>,
    /// Cover image URL, when populated.
    pub image_cover: Option<String>,
}

impl ProductRef {
    /// A reference carrying only the id (unpopulated mutation responses).
    #[must_use]
    pub const fn bare(id: ProductId) -> Self {
        Self {
            id,
            title: None,
            image_cover: None,
        }
    }
}

/// One line of the cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line holds.
    pub product: ProductRef,
    /// How many units.
    pub quantity: Quantity,
    /// Server-reported unit price at snapshot time.
    pub unit_price: Price,
}

impl CartLine {
    /// The displayed line total. Derived for display only, never stored.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity.get())
    }
}

// =============================================================================
// Checkout Types
// =============================================================================

/// Shipping address collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingAddress {
    /// Free-form street details.
    pub details: String,
    /// Egyptian mobile number (11 digits, `01[0125]` prefix).
    pub phone: String,
    /// Destination city.
    pub city: String,
}

/// Errors from shipping-address validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("details must be at least 3 characters long")]
    DetailsTooShort,
    #[error("phone must be a valid Egyptian mobile number")]
    InvalidPhone,
    #[error("city cannot be empty")]
    EmptyCity,
}

impl ShippingAddress {
    /// Validate and build a shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the details are shorter than 3 characters, the
    /// phone is not an Egyptian mobile number, or the city is empty.
    pub fn new(
        details: impl Into<String>,
        phone: impl Into<String>,
        city: impl Into<String>,
    ) -> Result<Self, AddressError> {
        let details = details.into();
        let phone = phone.into();
        let city = city.into();

        if details.chars().count() < 3 {
            return Err(AddressError::DetailsTooShort);
        }
        if !is_egyptian_mobile(&phone) {
            return Err(AddressError::InvalidPhone);
        }
        if city.is_empty() {
            return Err(AddressError::EmptyCity);
        }

        Ok(Self {
            details,
            phone,
            city,
        })
    }
}

/// `01[0125]` followed by 8 digits.
fn is_egyptian_mobile(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 11
        && bytes.first() == Some(&b'0')
        && bytes.get(1) == Some(&b'1')
        && matches!(bytes.get(2), Some(b'0' | b'1' | b'2' | b'5'))
        && bytes.iter().skip(3).all(u8::is_ascii_digit)
}

/// A hosted payment session created for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    /// URL of the hosted payment page the customer is redirected to.
    pub url: String,
}
