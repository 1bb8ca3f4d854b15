//! Response language for the national address API.

use serde::{Deserialize, Serialize};

/// Language of place names returned by the national address API.
///
/// The provider accepts exactly two codes: `A` (Arabic) and `E` (English).
/// Anything else is normalized to Arabic before it reaches the wire.
///
/// ```
/// use saudi_address_core::Language;
///
/// assert_eq!(Language::from_code_lossy("E"), Language::English);
/// assert_eq!(Language::from_code_lossy("fr"), Language::Arabic);
/// assert_eq!(Language::English.code(), "E");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "A")]
    Arabic,
    #[serde(rename = "E")]
    English,
}

impl Language {
    /// Parse a provider language code, falling back to Arabic.
    #[must_use]
    pub fn from_code_lossy(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// Normalize an optional code as submitted by a form.
    #[must_use]
    pub fn from_optional_code(code: Option<&str>) -> Self {
        code.map(Self::from_code_lossy).unwrap_or_default()
    }

    /// The single-letter code sent to the provider.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Arabic => "A",
            Self::English => "E",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::Arabic),
            "E" => Ok(Self::English),
            _ => Err(format!("invalid language code: {s}")),
        }
    }
}
