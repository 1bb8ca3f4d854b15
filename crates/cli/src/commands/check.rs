//! Connectivity test.

use saudi_address_core::Language;
use saudi_address_service::national_address::NationalAddressClient;
use serde_json::{Value, json};

use super::CommandError;

/// Fetch regions without the cache and report how many came back.
pub async fn connection(
    client: &NationalAddressClient,
    language: Language,
) -> Result<Value, CommandError> {
    let regions_count = client.check_connection(language).await?;
    tracing::info!(regions_count, "National address API reachable");

    Ok(json!({
        "message": "API connection successful!",
        "regions_count": regions_count,
    }))
}
