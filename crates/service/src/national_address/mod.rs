//! Saudi National Address API client.
//!
//! Talks to the national address provider's REST API and turns its replies
//! into core types:
//! - region, city and district lookups (cached with `moka`)
//! - building number / postal code verification
//! - reverse geocoding of a coordinate pair
//!
//! # Wire format
//!
//! Every endpoint is a `GET` with the parameters in the query string, ending
//! in `format=JSON&api_key=..`. Bodies come back as windows-1256 and are
//! transcoded before parsing (see [`encoding`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use saudi_address_core::Language;
//! use saudi_address_service::national_address::NationalAddressClient;
//!
//! let client = NationalAddressClient::new(&config.national_address)?;
//!
//! let regions = client.get_regions(Language::Arabic).await?;
//! let cities = client.get_cities(saudi_address_core::ALL_REGIONS, Language::English).await?;
//! let result = client.verify_address(8228, 12643, 2121, Language::Arabic).await?;
//! ```

mod cache;
pub mod encoding;
mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod transport;
mod wire;

pub use error::{AddressError, TransportError};
pub use transport::{HttpTransport, Transport, USER_AGENT};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use saudi_address_core::{
    AdditionalNumber, BuildingNumber, City, District, GeocodedAddress, Language, PostalCode,
    Region, ValidationError, VerificationResult,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::NationalAddressConfig;

use cache::{CacheKey, CacheValue, MAX_ENTRIES};
use encoding::decode_body;
use wire::{CitiesEnvelope, DistrictsEnvelope, GeocodeEnvelope, RegionsEnvelope, VerifyEnvelope};

// =============================================================================
// NationalAddressClient
// =============================================================================

/// Client for the Saudi National Address API.
///
/// Cheap to clone; clones share the transport and the lookup cache. The
/// client holds no other mutable state, so concurrent calls need no locking.
#[derive(Clone)]
pub struct NationalAddressClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: SecretString,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl std::fmt::Debug for NationalAddressClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NationalAddressClient")
            .field("base_url", &self.inner.base_url)
            .field("api_key", &"[REDACTED]")
            .field("cache_enabled", &self.inner.cache.is_some())
            .finish_non_exhaustive()
    }
}

fn build_cache(ttl: Option<Duration>) -> Cache<CacheKey, CacheValue> {
    let builder = Cache::builder().max_capacity(MAX_ENTRIES);
    match ttl {
        Some(ttl) => builder.time_to_live(ttl).build(),
        None => builder.build(),
    }
}

impl NationalAddressClient {
    /// Create a client that talks HTTP with `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &NationalAddressConfig) -> Result<Self, AddressError> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(config: &NationalAddressConfig, transport: Arc<dyn Transport>) -> Self {
        let cache = config.cache_enabled.then(|| build_cache(config.cache_ttl));

        Self {
            inner: Arc::new(ClientInner {
                transport,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
                cache,
            }),
        }
    }

    /// Whether an API key is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.inner.api_key.expose_secret().is_empty()
    }

    // =========================================================================
    // Lookups (cached)
    // =========================================================================

    /// Get all regions.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not configured, the request fails,
    /// or the response has no `Regions` list.
    #[instrument(skip(self))]
    pub async fn get_regions(&self, language: Language) -> Result<Vec<Region>, AddressError> {
        self.ensure_configured()?;

        let key = CacheKey::Regions { language };
        if let Some(CacheValue::Regions(regions)) = self.cached(&key).await {
            debug!("Cache hit for regions");
            return Ok(regions);
        }

        let regions = self.fetch_regions(language).await?;
        self.store(key, CacheValue::Regions(regions.clone())).await;

        Ok(regions)
    }

    /// Get the cities of a region.
    ///
    /// Pass [`ALL_REGIONS`](saudi_address_core::ALL_REGIONS) (`-1`) for every
    /// city. Any other id, negative or not, is sent as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not configured, the request fails,
    /// or the response has no `Cities` list.
    #[instrument(skip(self))]
    pub async fn get_cities(
        &self,
        region_id: i64,
        language: Language,
    ) -> Result<Vec<City>, AddressError> {
        self.ensure_configured()?;

        let key = CacheKey::Cities {
            region_id,
            language,
        };
        if let Some(CacheValue::Cities(cities)) = self.cached(&key).await {
            debug!("Cache hit for cities");
            return Ok(cities);
        }

        let url = self.endpoint(
            "lookup/cities",
            &[
                ("regionid", region_id.to_string()),
                ("language", language.code().to_string()),
            ],
        )?;
        let envelope: CitiesEnvelope = self.fetch(&url).await?;
        let cities: Vec<City> = envelope.cities.into_iter().map(City::from).collect();

        self.store(key, CacheValue::Cities(cities.clone())).await;

        Ok(cities)
    }

    /// Get the districts of a city.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not configured, the request fails,
    /// or the response has no `Districts` list.
    #[instrument(skip(self))]
    pub async fn get_districts(
        &self,
        city_id: i64,
        language: Language,
    ) -> Result<Vec<District>, AddressError> {
        self.ensure_configured()?;

        let key = CacheKey::Districts { city_id, language };
        if let Some(CacheValue::Districts(districts)) = self.cached(&key).await {
            debug!("Cache hit for districts");
            return Ok(districts);
        }

        let url = self.endpoint(
            "lookup/districts",
            &[
                ("cityid", city_id.to_string()),
                ("language", language.code().to_string()),
            ],
        )?;
        let envelope: DistrictsEnvelope = self.fetch(&url).await?;
        let districts: Vec<District> = envelope.districts.into_iter().map(District::from).collect();

        self.store(key, CacheValue::Districts(districts.clone())).await;

        Ok(districts)
    }

    /// Drop every cached lookup.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
        }
    }

    // =========================================================================
    // Uncached operations
    // =========================================================================

    /// Verify a building number / postal code / additional number triple.
    ///
    /// Building number and postal code must be positive and the additional
    /// number non-negative (`0` when the customer has none); otherwise no
    /// request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not configured, the input fails
    /// validation, the request fails, or the response has no `addressfound`.
    #[instrument(skip(self))]
    pub async fn verify_address(
        &self,
        building_number: i64,
        postal_code: i64,
        additional_number: i64,
        language: Language,
    ) -> Result<VerificationResult, AddressError> {
        self.ensure_configured()?;

        let building_number = BuildingNumber::try_from_i64(building_number)?;
        let postal_code = PostalCode::try_from_i64(postal_code)?;
        let additional_number = AdditionalNumber::try_from_i64(additional_number)?;

        let url = self.endpoint(
            "Address/address-verify",
            &[
                ("buildingnumber", building_number.to_string()),
                ("zipcode", postal_code.to_string()),
                ("additionalnumber", additional_number.to_string()),
                ("language", language.code().to_string()),
            ],
        )?;
        let envelope: VerifyEnvelope = self.fetch(&url).await?;

        debug!(found = envelope.address_found, "Address verification answered");

        Ok(VerificationResult::from(envelope.address_found))
    }

    /// Resolve a coordinate pair to the nearest national address.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not configured, a coordinate is not
    /// finite, the request fails, or the response has no addresses.
    #[instrument(skip(self))]
    pub async fn geocode(
        &self,
        lat: f64,
        lng: f64,
        language: Language,
    ) -> Result<GeocodedAddress, AddressError> {
        self.ensure_configured()?;

        if !lat.is_finite() {
            return Err(ValidationError::NotNumeric { field: "Latitude" }.into());
        }
        if !lng.is_finite() {
            return Err(ValidationError::NotNumeric { field: "Longitude" }.into());
        }

        let url = self.endpoint(
            "Address/address-geocode",
            &[
                ("lat", lat.to_string()),
                ("long", lng.to_string()),
                ("language", language.code().to_string()),
            ],
        )?;
        let envelope: GeocodeEnvelope = self.fetch(&url).await?;

        envelope
            .addresses
            .into_iter()
            .next()
            .map(GeocodedAddress::from)
            .ok_or_else(|| AddressError::MalformedResponse("no addresses returned".to_string()))
    }

    /// Connectivity check: fetch regions bypassing the cache.
    ///
    /// Returns the number of regions the provider reported.
    ///
    /// # Errors
    ///
    /// Same as [`get_regions`](Self::get_regions).
    #[instrument(skip(self))]
    pub async fn check_connection(&self, language: Language) -> Result<usize, AddressError> {
        self.ensure_configured()?;
        let regions = self.fetch_regions(language).await?;
        Ok(regions.len())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_configured(&self) -> Result<(), AddressError> {
        if self.is_configured() {
            Ok(())
        } else {
            warn!("National address API key is not set");
            Err(AddressError::NotConfigured)
        }
    }

    async fn fetch_regions(&self, language: Language) -> Result<Vec<Region>, AddressError> {
        let url = self.endpoint(
            "lookup/regions",
            &[("language", language.code().to_string())],
        )?;
        let envelope: RegionsEnvelope = self.fetch(&url).await?;
        Ok(envelope.regions.into_iter().map(Region::from).collect())
    }

    /// Build `{base_url}/{path}?{params}&format=JSON&api_key={key}`.
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, AddressError> {
        let mut url = Url::parse(&format!("{}/{path}", self.inner.base_url))
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(name, value)| (*name, value.as_str())))
            .append_pair("format", "JSON")
            .append_pair("api_key", self.inner.api_key.expose_secret());

        Ok(url)
    }

    /// GET, transcode and parse. The URL is never logged; it carries the key.
    async fn fetch<T: DeserializeOwned>(&self, url: &Url) -> Result<T, AddressError> {
        let body = self.inner.transport.get(url).await.map_err(|e| {
            warn!(path = url.path(), error = %e, "National address request failed");
            AddressError::Transport(e)
        })?;

        let text = decode_body(&body);

        serde_json::from_str(&text).map_err(|e| {
            error!(
                path = url.path(),
                error = %e,
                body = %text.chars().take(200).collect::<String>(),
                "Failed to parse national address response"
            );
            AddressError::MalformedResponse(e.to_string())
        })
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }
}
