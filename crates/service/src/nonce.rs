//! Signed, expiring request tokens.
//!
//! A nonce is `"{expires_unix}.{hex(hmac_sha256(secret, "{action}:{expires_unix}"))}"`.
//! It is bound to one [`NonceAction`], so a checkout token cannot be replayed
//! against admin endpoints, and stops validating once `expires_unix` passes.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

/// What a nonce authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceAction {
    /// Storefront lookup and verification requests.
    Checkout,
    /// Admin connectivity test.
    Admin,
}

impl NonceAction {
    /// Name mixed into the signature.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Checkout => "saudi_address_nonce",
            Self::Admin => "saudi_address_admin_nonce",
        }
    }
}

/// Reasons a nonce fails to verify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonceError {
    #[error("malformed nonce")]
    Malformed,
    #[error("nonce expired")]
    Expired,
    #[error("nonce signature mismatch")]
    Mismatch,
    #[error("system clock error: {0}")]
    Clock(String),
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Issues and checks nonces with a server-side secret.
#[derive(Clone)]
pub struct NonceIssuer {
    secret: SecretString,
    ttl: Duration,
}

impl std::fmt::Debug for NonceIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceIssuer")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn now_unix() -> Result<u64, NonceError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| NonceError::Clock(e.to_string()))
}

impl NonceIssuer {
    #[must_use]
    pub fn new(secret: SecretString, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Lifetime of issued nonces.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a nonce for `action`, valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns error if the system clock is before the Unix epoch.
    pub fn issue(&self, action: NonceAction) -> Result<String, NonceError> {
        self.issue_at(action, now_unix()?)
    }

    /// Issue a nonce as if the current time were `now` (Unix seconds).
    ///
    /// # Errors
    ///
    /// Returns error if the signing key is rejected.
    pub fn issue_at(&self, action: NonceAction, now: u64) -> Result<String, NonceError> {
        let expires = now.saturating_add(self.ttl.as_secs());
        Ok(format!("{expires}.{}", self.sign(action, expires)?))
    }

    /// Check a nonce for `action` against the current time.
    ///
    /// # Errors
    ///
    /// Returns error if the nonce is malformed, expired, or signed for
    /// another action or with another secret.
    pub fn verify(&self, action: NonceAction, nonce: &str) -> Result<(), NonceError> {
        self.verify_at(action, nonce, now_unix()?)
    }

    /// Check a nonce as if the current time were `now` (Unix seconds).
    ///
    /// # Errors
    ///
    /// Same as [`verify`](Self::verify).
    pub fn verify_at(&self, action: NonceAction, nonce: &str, now: u64) -> Result<(), NonceError> {
        let (expires, signature) = nonce.trim().split_once('.').ok_or(NonceError::Malformed)?;
        let expires: u64 = expires.parse().map_err(|_| NonceError::Malformed)?;

        let expected = self.sign(action, expires)?;
        if !constant_time_compare(&expected, signature) {
            return Err(NonceError::Mismatch);
        }

        if now > expires {
            return Err(NonceError::Expired);
        }

        debug!(action = action.name(), "Nonce verified");
        Ok(())
    }

    fn sign(&self, action: NonceAction, expires: u64) -> Result<String, NonceError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| NonceError::InvalidKey(e.to_string()))?;
        mac.update(format!("{}:{expires}", action.name()).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Constant-time string comparison to prevent timing attacks.
pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NOW: u64 = 1_760_000_000;

    fn issuer() -> NonceIssuer {
        NonceIssuer::new(
            SecretString::from("k9F$2mQ!vX7#pL4@wZ8&tR1*yB6^nC3%"),
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn test_issue_then_verify() {
        let issuer = issuer();
        let nonce = issuer.issue_at(NonceAction::Checkout, NOW).unwrap();
        assert!(nonce.starts_with(&format!("{}.", NOW + 3600)));
        assert!(issuer.verify_at(NonceAction::Checkout, &nonce, NOW).is_ok());
        assert!(issuer.verify_at(NonceAction::Checkout, &nonce, NOW + 3600).is_ok());
    }

    #[test]
    fn test_issue_uses_current_time() {
        let issuer = issuer();
        let nonce = issuer.issue(NonceAction::Admin).unwrap();
        assert!(issuer.verify(NonceAction::Admin, &nonce).is_ok());
    }

    #[test]
    fn test_expired() {
        let issuer = issuer();
        let nonce = issuer.issue_at(NonceAction::Checkout, NOW).unwrap();
        assert_eq!(
            issuer.verify_at(NonceAction::Checkout, &nonce, NOW + 3601),
            Err(NonceError::Expired)
        );
    }

    #[test]
    fn test_bound_to_action() {
        let issuer = issuer();
        let nonce = issuer.issue_at(NonceAction::Checkout, NOW).unwrap();
        assert_eq!(
            issuer.verify_at(NonceAction::Admin, &nonce, NOW),
            Err(NonceError::Mismatch)
        );
    }

    #[test]
    fn test_bound_to_secret() {
        let nonce = issuer().issue_at(NonceAction::Checkout, NOW).unwrap();
        let other = NonceIssuer::new(
            SecretString::from("a different secret of enough length!!"),
            Duration::from_secs(3600),
        );
        assert_eq!(
            other.verify_at(NonceAction::Checkout, &nonce, NOW),
            Err(NonceError::Mismatch)
        );
    }

    #[test]
    fn test_tampered_expiry_is_rejected() {
        let issuer = issuer();
        let nonce = issuer.issue_at(NonceAction::Checkout, NOW).unwrap();
        let (_, signature) = nonce.split_once('.').unwrap();
        let forged = format!("{}.{signature}", NOW + 999_999);
        assert_eq!(
            issuer.verify_at(NonceAction::Checkout, &forged, NOW),
            Err(NonceError::Mismatch)
        );
    }

    #[test]
    fn test_malformed() {
        let issuer = issuer();
        for nonce in ["", "abc", "12345", "x.deadbeef"] {
            assert_eq!(
                issuer.verify_at(NonceAction::Checkout, nonce, NOW),
                Err(NonceError::Malformed),
                "{nonce:?}"
            );
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug_output = format!("{:?}", issuer());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("k9F$2mQ"));
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
        assert!(!constant_time_compare("a", "b"));
    }
}
