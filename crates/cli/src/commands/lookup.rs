//! Region, city and district listings.

use saudi_address_core::Language;
use saudi_address_service::national_address::NationalAddressClient;
use serde_json::Value;

use super::CommandError;

pub async fn regions(
    client: &NationalAddressClient,
    language: Language,
) -> Result<Value, CommandError> {
    let regions = client.get_regions(language).await?;
    Ok(serde_json::to_value(regions)?)
}

pub async fn cities(
    client: &NationalAddressClient,
    region_id: i64,
    language: Language,
) -> Result<Value, CommandError> {
    let cities = client.get_cities(region_id, language).await?;
    Ok(serde_json::to_value(cities)?)
}

pub async fn districts(
    client: &NationalAddressClient,
    city_id: i64,
    language: Language,
) -> Result<Value, CommandError> {
    let districts = client.get_districts(city_id, language).await?;
    Ok(serde_json::to_value(districts)?)
}
