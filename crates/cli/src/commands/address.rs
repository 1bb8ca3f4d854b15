//! Address verification and geocoding.

use saudi_address_core::Language;
use saudi_address_service::national_address::NationalAddressClient;
use saudi_address_service::verifier::AddressVerifier;
use serde_json::{Value, json};

use super::CommandError;

pub async fn verify(
    client: &NationalAddressClient,
    building_number: &str,
    postal_code: &str,
    additional_number: &str,
    language: Language,
) -> Result<Value, CommandError> {
    let outcome = AddressVerifier::new(client.clone())
        .verify(building_number, postal_code, additional_number, language)
        .await?;

    Ok(json!({ "verified": outcome.is_verified() }))
}

pub async fn geocode(
    client: &NationalAddressClient,
    lat: f64,
    lng: f64,
    language: Language,
) -> Result<Value, CommandError> {
    let address = client.geocode(lat, lng, language).await?;
    Ok(serde_json::to_value(address)?)
}
