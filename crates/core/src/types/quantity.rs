//! Cart line quantity with a server-safe lower bound.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A cart line quantity.
///
/// The upstream cart API treats a count below one as invalid, so quantities
/// are clamped to a minimum of 1 before they are ever transmitted. The upper
/// bound is left to the server.
///
/// # Example
///
/// ```
/// use freshcart_core::Quantity;
///
/// assert_eq!(Quantity::clamped(0).get(), 1);
/// assert_eq!(Quantity::clamped(7).get(), 7);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// The minimum transmittable quantity.
    pub const MIN: Self = Self(1);

    /// Create a quantity, clamping values below 1 up to the minimum.
    #[must_use]
    pub const fn clamped(count: u32) -> Self {
        if count < 1 { Self::MIN } else { Self(count) }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_zero_to_one() {
        assert_eq!(Quantity::clamped(0), Quantity::MIN);
    }

    #[test]
    fn preserves_values_at_or_above_one() {
        assert_eq!(Quantity::clamped(1).get(), 1);
        assert_eq!(Quantity::clamped(42).get(), 42);
    }

    #[test]
    fn default_is_minimum() {
        assert_eq!(Quantity::default(), Quantity::MIN);
    }
}
