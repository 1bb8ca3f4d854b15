//! Checkout national address fields.
//!
//! The host renders and stores these fields; this module owns their keys,
//! visibility rules, validation and the values that are safe to persist.

use serde::{Deserialize, Serialize};

use super::numbers::{AdditionalNumber, BuildingNumber, PostalCode, ValidationError};

/// One of the national address fields shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Region,
    City,
    District,
    BuildingNumber,
    PostalCode,
    AdditionalNumber,
    Street,
    UnitNumber,
}

impl AddressField {
    /// Every field, in display order.
    pub const ALL: [Self; 8] = [
        Self::Region,
        Self::City,
        Self::District,
        Self::BuildingNumber,
        Self::PostalCode,
        Self::AdditionalNumber,
        Self::Street,
        Self::UnitNumber,
    ];

    /// Form input name, also used as the customer meta key.
    #[must_use]
    pub const fn form_key(self) -> &'static str {
        match self {
            Self::Region => "saudi_region",
            Self::City => "saudi_city",
            Self::District => "saudi_district",
            Self::BuildingNumber => "saudi_building_number",
            Self::PostalCode => "saudi_postal_code",
            Self::AdditionalNumber => "saudi_additional_number",
            Self::Street => "saudi_street",
            Self::UnitNumber => "saudi_unit_number",
        }
    }

    /// Key under which the value is stored against an order.
    #[must_use]
    pub const fn order_meta_key(self) -> &'static str {
        match self {
            Self::Region => "_saudi_region",
            Self::City => "_saudi_city",
            Self::District => "_saudi_district",
            Self::BuildingNumber => "_saudi_building_number",
            Self::PostalCode => "_saudi_postal_code",
            Self::AdditionalNumber => "_saudi_additional_number",
            Self::Street => "_saudi_street",
            Self::UnitNumber => "_saudi_unit_number",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::City => "City",
            Self::District => "District",
            Self::BuildingNumber => "Building Number",
            Self::PostalCode => "Postal Code",
            Self::AdditionalNumber => "Additional Number",
            Self::Street => "Street",
            Self::UnitNumber => "Unit Number",
        }
    }

    /// Whether the field takes part in the required check.
    ///
    /// Additional number, street and unit number are always optional.
    #[must_use]
    pub const fn can_be_required(self) -> bool {
        matches!(
            self,
            Self::Region | Self::City | Self::District | Self::BuildingNumber | Self::PostalCode
        )
    }
}

impl std::fmt::Display for AddressField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which fields are shown on the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FieldVisibility {
    pub region: bool,
    pub city: bool,
    pub district: bool,
    pub building_number: bool,
    pub postal_code: bool,
    pub additional_number: bool,
    pub street: bool,
    pub unit_number: bool,
}

impl Default for FieldVisibility {
    fn default() -> Self {
        Self {
            region: true,
            city: true,
            district: true,
            building_number: true,
            postal_code: true,
            additional_number: false,
            street: false,
            unit_number: false,
        }
    }
}

impl FieldVisibility {
    /// Whether a field is shown.
    #[must_use]
    pub const fn is_visible(&self, field: AddressField) -> bool {
        match field {
            AddressField::Region => self.region,
            AddressField::City => self.city,
            AddressField::District => self.district,
            AddressField::BuildingNumber => self.building_number,
            AddressField::PostalCode => self.postal_code,
            AddressField::AdditionalNumber => self.additional_number,
            AddressField::Street => self.street,
            AddressField::UnitNumber => self.unit_number,
        }
    }
}

/// Checkout rules for the national address section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRules {
    /// Whether the section is shown at all.
    pub enabled: bool,
    /// Whether visible fields must be filled in.
    pub required: bool,
    pub visibility: FieldVisibility,
}

impl Default for CheckoutRules {
    fn default() -> Self {
        Self {
            enabled: true,
            required: true,
            visibility: FieldVisibility::default(),
        }
    }
}

/// A field-level checkout problem.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutFieldError {
    #[error("{0} is a required field.")]
    Required(AddressField),
    #[error("Postal code must be 5 digits.")]
    PostalCodeFormat,
    #[error("Building number must be numeric.")]
    BuildingNumberNotNumeric,
    #[error("Additional number must be numeric.")]
    AdditionalNumberNotNumeric,
    #[error("{0} must be greater than zero.")]
    NotPositive(AddressField),
}

impl CheckoutFieldError {
    /// The field the error belongs to.
    #[must_use]
    pub const fn field(&self) -> AddressField {
        match self {
            Self::Required(field) => *field,
            Self::PostalCodeFormat => AddressField::PostalCode,
            Self::BuildingNumberNotNumeric => AddressField::BuildingNumber,
            Self::AdditionalNumberNotNumeric => AddressField::AdditionalNumber,
            Self::NotPositive(field) => *field,
        }
    }

    /// Field-level form of a number parse failure.
    #[must_use]
    pub fn from_validation(err: &ValidationError) -> Self {
        let field = match err.field() {
            f if f == PostalCode::FIELD => AddressField::PostalCode,
            f if f == AdditionalNumber::FIELD => AddressField::AdditionalNumber,
            _ => AddressField::BuildingNumber,
        };
        match err {
            ValidationError::Missing { .. } => Self::Required(field),
            ValidationError::NotPositive { .. } => Self::NotPositive(field),
            ValidationError::NotNumeric { .. } | ValidationError::Negative { .. } => match field {
                AddressField::PostalCode => Self::PostalCodeFormat,
                AddressField::AdditionalNumber => Self::AdditionalNumberNotNumeric,
                _ => Self::BuildingNumberNotNumeric,
            },
        }
    }
}

/// National address values as submitted at checkout.
///
/// Field names on the wire are the form keys (`saudi_region`, ...). Missing
/// keys deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutAddress {
    #[serde(rename = "saudi_region", default)]
    pub region: String,
    #[serde(rename = "saudi_city", default)]
    pub city: String,
    #[serde(rename = "saudi_district", default)]
    pub district: String,
    #[serde(rename = "saudi_building_number", default)]
    pub building_number: String,
    #[serde(rename = "saudi_postal_code", default)]
    pub postal_code: String,
    #[serde(rename = "saudi_additional_number", default)]
    pub additional_number: String,
    #[serde(rename = "saudi_street", default)]
    pub street: String,
    #[serde(rename = "saudi_unit_number", default)]
    pub unit_number: String,
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl CheckoutAddress {
    /// Raw value of a field.
    #[must_use]
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Region => &self.region,
            AddressField::City => &self.city,
            AddressField::District => &self.district,
            AddressField::BuildingNumber => &self.building_number,
            AddressField::PostalCode => &self.postal_code,
            AddressField::AdditionalNumber => &self.additional_number,
            AddressField::Street => &self.street,
            AddressField::UnitNumber => &self.unit_number,
        }
    }

    fn slot_mut(&mut self, field: AddressField) -> &mut String {
        match field {
            AddressField::Region => &mut self.region,
            AddressField::City => &mut self.city,
            AddressField::District => &mut self.district,
            AddressField::BuildingNumber => &mut self.building_number,
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::AdditionalNumber => &mut self.additional_number,
            AddressField::Street => &mut self.street,
            AddressField::UnitNumber => &mut self.unit_number,
        }
    }

    /// Set the value of a field.
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// Whether every field is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        AddressField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }

    /// Validate the submitted values against the checkout rules.
    ///
    /// Nothing is checked unless the section is both enabled and required.
    /// The required check covers visible fields only; format checks apply
    /// to any non-empty value.
    ///
    /// # Errors
    ///
    /// Returns every problem found, in field order.
    pub fn validate(&self, rules: &CheckoutRules) -> Result<(), Vec<CheckoutFieldError>> {
        if !rules.enabled || !rules.required {
            return Ok(());
        }

        let mut errors: Vec<CheckoutFieldError> = AddressField::ALL
            .into_iter()
            .filter(|field| field.can_be_required() && rules.visibility.is_visible(*field))
            .filter(|field| self.get(*field).trim().is_empty())
            .map(CheckoutFieldError::Required)
            .collect();

        let postal_code = self.postal_code.trim();
        if !postal_code.is_empty() {
            if !PostalCode::is_five_digits(postal_code) {
                errors.push(CheckoutFieldError::PostalCodeFormat);
            } else if let Err(e) = PostalCode::parse(postal_code) {
                errors.push(CheckoutFieldError::from_validation(&e));
            }
        }

        let building_number = self.building_number.trim();
        if !building_number.is_empty() {
            if !is_digits(building_number) {
                errors.push(CheckoutFieldError::BuildingNumberNotNumeric);
            } else if let Err(e) = BuildingNumber::parse(building_number) {
                errors.push(CheckoutFieldError::from_validation(&e));
            }
        }

        let additional_number = self.additional_number.trim();
        if !additional_number.is_empty() && !is_digits(additional_number) {
            errors.push(CheckoutFieldError::AdditionalNumberNotNumeric);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Non-empty trimmed values, ready for the host to store.
    #[must_use]
    pub fn persistable_entries(&self) -> Vec<(AddressField, &str)> {
        AddressField::ALL
            .into_iter()
            .map(|field| (field, self.get(field).trim()))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }

    /// Fill blank fields from a customer's saved address.
    pub fn prefill_from(&mut self, saved: &Self) {
        for field in AddressField::ALL {
            if self.get(field).trim().is_empty() {
                let value = saved.get(field);
                if !value.is_empty() {
                    self.set(field, value);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> CheckoutAddress {
        CheckoutAddress {
            region: "1".to_string(),
            city: "3".to_string(),
            district: "10100003001".to_string(),
            building_number: "8228".to_string(),
            postal_code: "12643".to_string(),
            ..CheckoutAddress::default()
        }
    }

    #[test]
    fn test_meta_keys() {
        assert_eq!(AddressField::Region.form_key(), "saudi_region");
        assert_eq!(AddressField::UnitNumber.order_meta_key(), "_saudi_unit_number");
    }

    #[test]
    fn test_complete_address_is_valid() {
        assert!(complete().validate(&CheckoutRules::default()).is_ok());
    }

    #[test]
    fn test_missing_visible_fields_are_reported() {
        let address = CheckoutAddress {
            postal_code: "12643".to_string(),
            ..CheckoutAddress::default()
        };
        let errors = address.validate(&CheckoutRules::default()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(CheckoutFieldError::field).collect();
        assert_eq!(
            fields,
            vec![
                AddressField::Region,
                AddressField::City,
                AddressField::District,
                AddressField::BuildingNumber,
            ]
        );
        assert_eq!(errors.first().unwrap().to_string(), "Region is a required field.");
    }

    #[test]
    fn test_hidden_fields_are_not_required() {
        let mut rules = CheckoutRules::default();
        rules.visibility.district = false;
        let address = CheckoutAddress {
            district: String::new(),
            ..complete()
        };
        assert!(address.validate(&rules).is_ok());
    }

    #[test]
    fn test_not_required_skips_everything() {
        let rules = CheckoutRules {
            required: false,
            ..CheckoutRules::default()
        };
        let address = CheckoutAddress {
            postal_code: "abc".to_string(),
            ..CheckoutAddress::default()
        };
        assert!(address.validate(&rules).is_ok());
    }

    #[test]
    fn test_disabled_skips_everything() {
        let rules = CheckoutRules {
            enabled: false,
            ..CheckoutRules::default()
        };
        assert!(CheckoutAddress::default().validate(&rules).is_ok());
    }

    #[test]
    fn test_format_errors() {
        let address = CheckoutAddress {
            postal_code: "1264".to_string(),
            building_number: "82b".to_string(),
            additional_number: "x".to_string(),
            ..complete()
        };
        let errors = address.validate(&CheckoutRules::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                CheckoutFieldError::PostalCodeFormat,
                CheckoutFieldError::BuildingNumberNotNumeric,
                CheckoutFieldError::AdditionalNumberNotNumeric,
            ]
        );
    }

    #[test]
    fn test_all_zero_numbers_are_rejected() {
        let address = CheckoutAddress {
            postal_code: "00000".to_string(),
            building_number: "0000".to_string(),
            ..complete()
        };
        let errors = address.validate(&CheckoutRules::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                CheckoutFieldError::NotPositive(AddressField::PostalCode),
                CheckoutFieldError::NotPositive(AddressField::BuildingNumber),
            ]
        );
        assert_eq!(
            errors.last().unwrap().to_string(),
            "Building Number must be greater than zero."
        );
    }

    #[test]
    fn test_field_error_from_validation() {
        let err = PostalCode::parse("0").unwrap_err();
        assert_eq!(
            CheckoutFieldError::from_validation(&err),
            CheckoutFieldError::NotPositive(AddressField::PostalCode)
        );
        let err = BuildingNumber::parse("").unwrap_err();
        assert_eq!(
            CheckoutFieldError::from_validation(&err),
            CheckoutFieldError::Required(AddressField::BuildingNumber)
        );
        let err = AdditionalNumber::parse("-3").unwrap_err();
        assert_eq!(
            CheckoutFieldError::from_validation(&err),
            CheckoutFieldError::AdditionalNumberNotNumeric
        );
    }

    #[test]
    fn test_persistable_entries_skip_blank() {
        let address = CheckoutAddress {
            street: "  King Fahd Road ".to_string(),
            unit_number: "   ".to_string(),
            ..complete()
        };
        let entries = address.persistable_entries();
        assert_eq!(entries.len(), 6);
        assert!(entries.contains(&(AddressField::Street, "King Fahd Road")));
        assert!(!entries.iter().any(|(f, _)| *f == AddressField::UnitNumber));
    }

    #[test]
    fn test_prefill_only_fills_blank_fields() {
        let saved = CheckoutAddress {
            city: "9".to_string(),
            street: "Olaya Street".to_string(),
            ..complete()
        };
        let mut submitted = CheckoutAddress {
            city: "3".to_string(),
            ..CheckoutAddress::default()
        };
        submitted.prefill_from(&saved);
        assert_eq!(submitted.city, "3");
        assert_eq!(submitted.street, "Olaya Street");
        assert_eq!(submitted.postal_code, "12643");
    }

    #[test]
    fn test_deserialize_form_keys() {
        let address: CheckoutAddress =
            serde_json::from_str(r#"{"saudi_region":"1","saudi_postal_code":"12643"}"#).unwrap();
        assert_eq!(address.region, "1");
        assert_eq!(address.postal_code, "12643");
        assert!(address.city.is_empty());
    }
}
