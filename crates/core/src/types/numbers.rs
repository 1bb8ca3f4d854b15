//! Numeric parts of a national address.
//!
//! Building number, postal code and additional number are submitted as free
//! text. They are parsed strictly: surrounding whitespace is ignored, but
//! anything that is not a whole decimal number is rejected rather than
//! coerced to zero.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors produced when address input fails shape checks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The field was empty.
    #[error("{field} is required")]
    Missing {
        /// Human field name.
        field: &'static str,
    },
    /// The field is not a whole number.
    #[error("{field} must be numeric")]
    NotNumeric {
        /// Human field name.
        field: &'static str,
    },
    /// The field is zero or negative.
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Human field name.
        field: &'static str,
    },
    /// The field is negative.
    #[error("{field} cannot be negative")]
    Negative {
        /// Human field name.
        field: &'static str,
    },
}

impl ValidationError {
    /// Human name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::NotNumeric { field }
            | Self::NotPositive { field }
            | Self::Negative { field } => field,
        }
    }
}

fn parse_integer(input: &str, field: &'static str) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::NotNumeric { field })
}

fn require_positive(value: i64, field: &'static str) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field });
    }
    u32::try_from(value).map_err(|_| ValidationError::NotNumeric { field })
}

/// Building number of a national address (4 digits in practice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingNumber(u32);

impl BuildingNumber {
    pub(crate) const FIELD: &'static str = "Building number";

    /// Parse a building number from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, non-numeric or not positive.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::try_from_i64(parse_integer(s, Self::FIELD)?)
    }

    /// Build from an already-numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero or negative.
    pub fn try_from_i64(value: i64) -> Result<Self, ValidationError> {
        require_positive(value, Self::FIELD).map(Self)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Postal (zip) code of a national address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(u32);

impl PostalCode {
    pub(crate) const FIELD: &'static str = "Postal code";

    /// Parse a postal code from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, non-numeric or not positive.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::try_from_i64(parse_integer(s, Self::FIELD)?)
    }

    /// Build from an already-numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero or negative.
    pub fn try_from_i64(value: i64) -> Result<Self, ValidationError> {
        require_positive(value, Self::FIELD).map(Self)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether the code is written as exactly five ASCII digits.
    #[must_use]
    pub fn is_five_digits(raw: &str) -> bool {
        raw.len() == 5 && raw.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Additional number of a national address.
///
/// Optional on the form; an absent value is sent to the provider as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AdditionalNumber(u32);

impl AdditionalNumber {
    pub(crate) const FIELD: &'static str = "Additional number";

    /// Parse an additional number; empty input means zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is non-numeric or negative.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::try_from_i64(parse_integer(s, Self::FIELD)?)
    }

    /// Build from an already-numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative.
    pub fn try_from_i64(value: i64) -> Result<Self, ValidationError> {
        if value < 0 {
            return Err(ValidationError::Negative { field: Self::FIELD });
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ValidationError::NotNumeric { field: Self::FIELD })
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

macro_rules! impl_display {
    ($($name:ident),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

impl_display!(BuildingNumber, PostalCode, AdditionalNumber);
