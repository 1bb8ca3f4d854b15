//! Core types for Saudi national addresses.
//!
//! This module provides type-safe wrappers for the national address domain.

pub mod address;
pub mod language;
pub mod lookup;
pub mod numbers;
pub mod verification;

pub use address::{
    AddressField, CheckoutAddress, CheckoutFieldError, CheckoutRules, FieldVisibility,
};
pub use language::Language;
pub use lookup::{ALL_REGIONS, City, District, Region};
pub use numbers::{AdditionalNumber, BuildingNumber, PostalCode, ValidationError};
pub use verification::{GeocodedAddress, VerificationResult};
