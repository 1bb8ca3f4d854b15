//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SERVICE_NONCE_SECRET` - Key for signing request nonces (min 32 chars, high entropy)
//! - `SERVICE_ADMIN_TOKEN` - Bearer token for admin endpoints (high entropy)
//!
//! ## Optional
//! - `SERVICE_HOST` - Bind address (default: 127.0.0.1)
//! - `SERVICE_PORT` - Listen port (default: 3000)
//! - `SERVICE_NONCE_TTL_SECS` - Nonce lifetime (default: 43200)
//! - `NATIONAL_ADDRESS_API_URL` - Provider base URL (default: `https://apina.address.gov.sa/NationalAddress/v3.1`)
//! - `NATIONAL_ADDRESS_API_KEY` - Provider API key (empty disables lookups)
//! - `NATIONAL_ADDRESS_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `NATIONAL_ADDRESS_CACHE_ENABLED` - Cache lookups (default: true)
//! - `NATIONAL_ADDRESS_CACHE_TTL_SECS` - Cache entry lifetime (default: process lifetime)
//! - `SAUDI_ADDRESS_ENABLED` - Show the address section at checkout (default: true)
//! - `SAUDI_ADDRESS_REQUIRED` - Make visible fields required (default: true)
//! - `SAUDI_ADDRESS_LANGUAGE` - `A` or `E` (default: A)
//! - `SAUDI_ADDRESS_VERIFY` - Verify addresses at checkout (default: false)
//! - `SAUDI_ADDRESS_SHOW_REGION`, `_CITY`, `_DISTRICT`, `_BUILDING_NUMBER`,
//!   `_POSTAL_CODE` (default: true), `_ADDITIONAL_NUMBER`, `_STREET`,
//!   `_UNIT_NUMBER` (default: false) - Field visibility
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use saudi_address_core::{CheckoutRules, FieldVisibility, Language};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Default provider base URL.
pub const DEFAULT_API_URL: &str = "https://apina.address.gov.sa/NationalAddress/v3.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NONCE_TTL_SECS: u64 = 12 * 60 * 60;
const MIN_NONCE_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Key for signing request nonces
    pub nonce_secret: SecretString,
    /// How long an issued nonce stays valid
    pub nonce_ttl: Duration,
    /// Bearer token guarding admin endpoints
    pub admin_token: SecretString,
    /// National address provider configuration
    pub national_address: NationalAddressConfig,
    /// Checkout behaviour
    pub checkout: CheckoutSettings,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// National address provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct NationalAddressConfig {
    /// Provider base URL, without trailing slash
    pub base_url: String,
    /// Provider API key; empty means lookups are disabled
    pub api_key: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
    /// Whether region/city/district lookups are cached
    pub cache_enabled: bool,
    /// Optional cache entry lifetime; `None` keeps entries for the process lifetime
    pub cache_ttl: Option<Duration>,
}

impl std::fmt::Debug for NationalAddressConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NationalAddressConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Checkout behaviour for the national address section.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutSettings {
    /// Default language for lookups
    pub language: Language,
    /// Whether submitted addresses are verified with the provider
    pub verify_address: bool,
    /// Enabled/required/visibility rules
    pub rules: CheckoutRules,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SERVICE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SERVICE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SERVICE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SERVICE_PORT".to_string(), e.to_string()))?;

        let nonce_secret = get_validated_secret("SERVICE_NONCE_SECRET")?;
        validate_secret_length(&nonce_secret, "SERVICE_NONCE_SECRET")?;
        let nonce_ttl = get_duration_secs("SERVICE_NONCE_TTL_SECS", DEFAULT_NONCE_TTL_SECS)?;
        let admin_token = get_validated_secret("SERVICE_ADMIN_TOKEN")?;

        Ok(Self {
            host,
            port,
            nonce_secret,
            nonce_ttl,
            admin_token,
            national_address: NationalAddressConfig::from_env()?,
            checkout: CheckoutSettings::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl NationalAddressConfig {
    /// Provider configuration with default timeout and caching.
    #[must_use]
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_enabled: true,
            cache_ttl: None,
        }
    }

    /// Load the provider subset of the configuration.
    ///
    /// Used on its own by the CLI, which needs no server secrets.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("NATIONAL_ADDRESS_API_URL", DEFAULT_API_URL);
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("NATIONAL_ADDRESS_API_URL".to_string(), e.to_string())
        })?;

        let api_key = SecretString::from(
            get_optional_env("NATIONAL_ADDRESS_API_KEY")
                .map(|key| key.trim().to_string())
                .unwrap_or_default(),
        );

        let cache_ttl = match get_optional_env("NATIONAL_ADDRESS_CACHE_TTL_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_secs(
                "NATIONAL_ADDRESS_CACHE_TTL_SECS",
                &raw,
            )?)),
            None => None,
        };

        Ok(Self {
            timeout: get_duration_secs("NATIONAL_ADDRESS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            cache_enabled: get_bool_env("NATIONAL_ADDRESS_CACHE_ENABLED", true)?,
            cache_ttl,
            ..Self::new(&base_url, api_key)
        })
    }

    /// Whether an API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

impl CheckoutSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = FieldVisibility::default();
        let visibility = FieldVisibility {
            region: get_bool_env("SAUDI_ADDRESS_SHOW_REGION", defaults.region)?,
            city: get_bool_env("SAUDI_ADDRESS_SHOW_CITY", defaults.city)?,
            district: get_bool_env("SAUDI_ADDRESS_SHOW_DISTRICT", defaults.district)?,
            building_number: get_bool_env(
                "SAUDI_ADDRESS_SHOW_BUILDING_NUMBER",
                defaults.building_number,
            )?,
            postal_code: get_bool_env("SAUDI_ADDRESS_SHOW_POSTAL_CODE", defaults.postal_code)?,
            additional_number: get_bool_env(
                "SAUDI_ADDRESS_SHOW_ADDITIONAL_NUMBER",
                defaults.additional_number,
            )?,
            street: get_bool_env("SAUDI_ADDRESS_SHOW_STREET", defaults.street)?,
            unit_number: get_bool_env("SAUDI_ADDRESS_SHOW_UNIT_NUMBER", defaults.unit_number)?,
        };

        Ok(Self {
            language: Language::from_code_lossy(&get_env_or_default("SAUDI_ADDRESS_LANGUAGE", "A")),
            verify_address: get_bool_env("SAUDI_ADDRESS_VERIFY", false)?,
            rules: CheckoutRules {
                enabled: get_bool_env("SAUDI_ADDRESS_ENABLED", true)?,
                required: get_bool_env("SAUDI_ADDRESS_REQUIRED", true)?,
                visibility,
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a boolean environment variable with a default value.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| parse_bool(key, &raw))
}

/// Get a duration in whole seconds with a default value.
fn get_duration_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    get_optional_env(key)
        .map_or(Ok(default), |raw| parse_secs(key, &raw))
        .map(Duration::from_secs)
}

/// Parse the boolean spellings accepted in settings.
fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_NONCE_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_NONCE_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_spellings() {
        for raw in ["true", "YES", "1", " on "] {
            assert!(parse_bool("K", raw).unwrap(), "{raw}");
        }
        for raw in ["false", "No", "0", "off"] {
            assert!(!parse_bool("K", raw).unwrap(), "{raw}");
        }
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        assert!(matches!(
            parse_bool("SAUDI_ADDRESS_ENABLED", "maybe"),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "SAUDI_ADDRESS_ENABLED"
        ));
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("K", "30").unwrap(), 30);
        assert!(parse_secs("K", "-1").is_err());
        assert!(parse_secs("K", "1.5").is_err());
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-admin-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_secret_length() {
        assert!(validate_secret_length(&SecretString::from("short"), "K").is_err());
        assert!(validate_secret_length(&SecretString::from("a".repeat(32)), "K").is_ok());
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = NationalAddressConfig::new("https://api.example/v3/", SecretString::from("K"));
        assert_eq!(config.base_url, "https://api.example/v3");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.cache_enabled);
        assert!(config.cache_ttl.is_none());
    }

    #[test]
    fn test_is_configured() {
        assert!(!NationalAddressConfig::new(DEFAULT_API_URL, SecretString::from("")).is_configured());
        assert!(NationalAddressConfig::new(DEFAULT_API_URL, SecretString::from("K")).is_configured());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            NationalAddressConfig::new(DEFAULT_API_URL, SecretString::from("super_secret_api_key"));
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("apina.address.gov.sa"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }
}
