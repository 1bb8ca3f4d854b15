//! Address verification on top of the national address client.
//!
//! Takes the numbers as the customer typed them, checks their shape locally
//! and only then asks the provider whether the address exists.

use saudi_address_core::{AdditionalNumber, BuildingNumber, CheckoutAddress, Language, PostalCode};
use tracing::{debug, instrument};

use crate::national_address::{AddressError, NationalAddressClient};

/// What the provider said about an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    NotFound,
}

impl VerificationOutcome {
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Verifies building number / postal code pairs with the provider.
#[derive(Debug, Clone)]
pub struct AddressVerifier {
    client: NationalAddressClient,
}

impl AddressVerifier {
    #[must_use]
    pub fn new(client: NationalAddressClient) -> Self {
        Self { client }
    }

    /// Verify an address from raw form input.
    ///
    /// `additional_number` may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Validation`] without contacting the provider if
    /// a number is missing, non-numeric or out of range, or whatever the
    /// client returns otherwise.
    #[instrument(skip(self))]
    pub async fn verify(
        &self,
        building_number: &str,
        postal_code: &str,
        additional_number: &str,
        language: Language,
    ) -> Result<VerificationOutcome, AddressError> {
        let building_number = BuildingNumber::parse(building_number)?;
        let postal_code = PostalCode::parse(postal_code)?;
        let additional_number = AdditionalNumber::parse(additional_number)?;

        self.verify_numbers(building_number, postal_code, additional_number, language)
            .await
    }

    /// Verify already-validated numbers.
    ///
    /// # Errors
    ///
    /// Returns whatever the client returns.
    pub async fn verify_numbers(
        &self,
        building_number: BuildingNumber,
        postal_code: PostalCode,
        additional_number: AdditionalNumber,
        language: Language,
    ) -> Result<VerificationOutcome, AddressError> {
        let result = self
            .client
            .verify_address(
                i64::from(building_number.get()),
                i64::from(postal_code.get()),
                i64::from(additional_number.get()),
                language,
            )
            .await?;

        let outcome = if result.found {
            VerificationOutcome::Verified
        } else {
            VerificationOutcome::NotFound
        };
        debug!(?outcome, "Address verification finished");

        Ok(outcome)
    }

    /// Verify the numbers of a submitted checkout address.
    ///
    /// # Errors
    ///
    /// Same as [`verify`](Self::verify).
    pub async fn verify_checkout(
        &self,
        address: &CheckoutAddress,
        language: Language,
    ) -> Result<VerificationOutcome, AddressError> {
        self.verify(
            &address.building_number,
            &address.postal_code,
            &address.additional_number,
            language,
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use saudi_address_core::ValidationError;
    use secrecy::SecretString;

    use super::*;
    use crate::config::NationalAddressConfig;
    use crate::national_address::testing::MockTransport;

    fn verifier(transport: &Arc<MockTransport>) -> AddressVerifier {
        let config = NationalAddressConfig::new("https://api.example/v3", SecretString::from("K"));
        AddressVerifier::new(NationalAddressClient::with_transport(
            &config,
            transport.clone(),
        ))
    }

    fn found(flag: bool) -> Arc<MockTransport> {
        Arc::new(MockTransport::new().respond_json(
            "/Address/address-verify",
            &format!(r#"{{"addressfound": {flag}}}"#),
        ))
    }

    #[tokio::test]
    async fn test_verified() {
        let transport = found(true);
        let outcome = verifier(&transport)
            .verify("8228", "12643", "2121", Language::English)
            .await
            .unwrap();

        assert_eq!(outcome, VerificationOutcome::Verified);
        assert!(
            transport
                .requested_urls()
                .first()
                .unwrap()
                .as_str()
                .contains("buildingnumber=8228&zipcode=12643&additionalnumber=2121&language=E")
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let transport = found(false);
        let outcome = verifier(&transport)
            .verify("8228", "12643", "", Language::Arabic)
            .await
            .unwrap();

        assert_eq!(outcome, VerificationOutcome::NotFound);
        assert!(!outcome.is_verified());
        assert!(
            transport
                .requested_urls()
                .first()
                .unwrap()
                .as_str()
                .contains("additionalnumber=0&")
        );
    }

    #[tokio::test]
    async fn test_bad_input_never_reaches_the_network() {
        let transport = found(true);
        let verifier = verifier(&transport);

        for (building, postal, additional) in [
            ("0", "12345", ""),
            ("100", "0", ""),
            ("", "12345", ""),
            ("abc", "12345", ""),
            ("100", "12a45", ""),
            ("100", "12345", "x"),
            ("100", "12345", "-3"),
        ] {
            let result = verifier
                .verify(building, postal, additional, Language::Arabic)
                .await;
            assert!(
                matches!(result, Err(AddressError::Validation(_))),
                "{building:?} {postal:?} {additional:?}"
            );
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_building_number_message() {
        let transport = found(true);
        let err = verifier(&transport)
            .verify(" ", "12345", "", Language::Arabic)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AddressError::Validation(ValidationError::Missing {
                field: "Building number"
            })
        ));
    }

    #[tokio::test]
    async fn test_verify_checkout_uses_address_numbers() {
        let transport = found(true);
        let address = CheckoutAddress {
            building_number: "100".to_string(),
            postal_code: "12345".to_string(),
            ..CheckoutAddress::default()
        };

        let outcome = verifier(&transport)
            .verify_checkout(&address, Language::Arabic)
            .await
            .unwrap();

        assert!(outcome.is_verified());
        assert_eq!(transport.calls(), 1);
    }
}
