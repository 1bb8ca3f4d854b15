//! Verification and geocoding results.

use serde::{Deserialize, Serialize};

/// Outcome of an address verification call.
///
/// Only the provider's single `addressfound` flag is modeled; there is no
/// partial or fuzzy match data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationResult {
    pub found: bool,
}

impl VerificationResult {
    /// Result for a matching address.
    pub const FOUND: Self = Self { found: true };
    /// Result for an address the provider does not know.
    pub const NOT_FOUND: Self = Self { found: false };
}

impl From<bool> for VerificationResult {
    fn from(found: bool) -> Self {
        Self { found }
    }
}

/// Address resolved from a coordinate pair.
///
/// The provider omits fields freely, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    /// First display line (street and building).
    pub address_line1: Option<String>,
    /// Second display line (district, city and postal code).
    pub address_line2: Option<String>,
    pub building_number: Option<String>,
    pub street: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub additional_number: Option<String>,
    pub unit_number: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(VerificationResult::from(true), VerificationResult::FOUND);
        assert_eq!(VerificationResult::from(false), VerificationResult::NOT_FOUND);
    }
}
