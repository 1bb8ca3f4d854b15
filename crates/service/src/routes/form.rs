//! Lenient deserializers for browser-submitted fields.
//!
//! Checkout scripts send ids and numbers as either JSON strings or numbers.

use saudi_address_core::Language;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// An id field: missing, empty or non-numeric reads as `0`.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Integer(n)) => n,
        Some(StringOrNumber::Text(s)) => s.trim().parse().unwrap_or(0),
        #[allow(clippy::cast_possible_truncation)] // whole-number ids only
        Some(StringOrNumber::Float(n)) if n.is_finite() => n.trunc() as i64,
        Some(StringOrNumber::Float(_)) | None => 0,
    })
}

/// A free-text numeric field kept as text for strict parsing later.
pub fn number_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Text(s)) => s,
        Some(StringOrNumber::Integer(n)) => n.to_string(),
        Some(StringOrNumber::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// A language code: anything but `A`/`E` reads as Arabic.
pub fn language<'de, D>(deserializer: D) -> Result<Language, D::Error>
where
    D: Deserializer<'de>,
{
    let code = Option::<String>::deserialize(deserializer)?;
    Ok(Language::from_optional_code(code.as_deref()))
}
