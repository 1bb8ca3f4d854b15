//! Provider response shapes and their conversion to core types.
//!
//! The provider is loose with types: ids arrive as strings or numbers,
//! coordinates as strings, and flags occasionally as strings. Everything is
//! accepted here and normalized before it leaves the module.

use saudi_address_core::{City, District, GeocodedAddress, Region};
use serde::{Deserialize, Deserializer};

/// A JSON scalar that should be read as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value
        .map(|v| clean_text(&v.into_text()))
        .filter(|s| !s.is_empty()))
}

fn optional_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Float(n)) => Some(n),
        #[allow(clippy::cast_precision_loss)] // coordinates are small integers at most
        Some(Scalar::Integer(n)) => Some(n as f64),
        Some(Scalar::Text(s)) => s.trim().parse().ok(),
        Some(Scalar::Bool(_)) | None => None,
    })
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Bool(b) => Ok(b),
        Scalar::Integer(n) => Ok(n != 0),
        Scalar::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Scalar::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        Scalar::Text(s) => Err(serde::de::Error::custom(format!(
            "invalid addressfound value: {s}"
        ))),
        Scalar::Float(_) => Err(serde::de::Error::custom("invalid addressfound value")),
    }
}

/// Strip control characters, trim, and collapse runs of whitespace.
pub fn clean_text(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One `{Id, Name}` lookup entry.
#[derive(Debug, Deserialize)]
pub struct WireEntry {
    #[serde(rename = "Id", deserialize_with = "text")]
    id: String,
    #[serde(rename = "Name", deserialize_with = "text")]
    name: String,
}

impl WireEntry {
    fn into_parts(self) -> (String, String) {
        (clean_text(&self.id), clean_text(&self.name))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegionsEnvelope {
    #[serde(rename = "Regions")]
    pub regions: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CitiesEnvelope {
    #[serde(rename = "Cities")]
    pub cities: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DistrictsEnvelope {
    #[serde(rename = "Districts")]
    pub districts: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEnvelope {
    #[serde(rename = "addressfound", deserialize_with = "flag")]
    pub address_found: bool,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeEnvelope {
    #[serde(rename = "Addresses")]
    pub addresses: Vec<WireAddress>,
}

/// One entry of the geocode `Addresses` list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WireAddress {
    #[serde(rename = "Address1", deserialize_with = "optional_text")]
    address1: Option<String>,
    #[serde(rename = "Address2", deserialize_with = "optional_text")]
    address2: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    building_number: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    street: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    district: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    city: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    region_name: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    post_code: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    additional_number: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    unit_number: Option<String>,
    #[serde(deserialize_with = "optional_coordinate")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "optional_coordinate")]
    longitude: Option<f64>,
}

impl From<WireAddress> for GeocodedAddress {
    fn from(wire: WireAddress) -> Self {
        Self {
            address_line1: wire.address1,
            address_line2: wire.address2,
            building_number: wire.building_number,
            street: wire.street,
            district: wire.district,
            city: wire.city,
            region: wire.region_name,
            postal_code: wire.post_code,
            additional_number: wire.additional_number,
            unit_number: wire.unit_number,
            latitude: wire.latitude,
            longitude: wire.longitude,
        }
    }
}

macro_rules! impl_from_entry {
    ($($name:ident),*) => {
        $(
            impl From<WireEntry> for $name {
                fn from(entry: WireEntry) -> Self {
                    let (id, name) = entry.into_parts();
                    Self::new(id, name)
                }
            }
        )*
    };
}

impl_from_entry!(Region, City, District);
