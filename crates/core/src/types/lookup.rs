//! Lookup entries returned by the national address API.
//!
//! Regions, cities and districts share the same `{ id, name }` shape. Each is
//! its own type so a city id can't be passed where a region id is expected.

/// Region id meaning "cities of every region".
pub const ALL_REGIONS: i64 = -1;

/// Macro to define a lookup entry type.
///
/// Creates a struct with public `id` and `name` string fields and:
/// - `Serialize`/`Deserialize` as `{ "id": .., "name": .. }`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - a `new()` constructor
///
/// # Example
///
/// ```rust
/// # use saudi_address_core::define_lookup_entry;
/// define_lookup_entry!(Governorate, "A governorate.");
///
/// let g = Governorate::new("7", "Al Kharj");
/// assert_eq!(g.id, "7");
/// ```
#[macro_export]
macro_rules! define_lookup_entry {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        pub struct $name {
            /// Provider identifier.
            pub id: String,
            /// Display name in the requested language.
            pub name: String,
        }

        impl $name {
            /// Create a new entry.
            #[must_use]
            pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    id: id.into(),
                    name: name.into(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} ({})", self.name, self.id)
            }
        }
    };
}

define_lookup_entry!(Region, "An administrative region (e.g. Riyadh Region).");
define_lookup_entry!(City, "A city within a region.");
define_lookup_entry!(District, "A district (neighbourhood) within a city.");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_lowercase_fields() {
        let region = Region::new("1", "منطقة الرياض");
        let json = serde_json::to_string(&region).unwrap();
        assert_eq!(json, r#"{"id":"1","name":"منطقة الرياض"}"#);
    }

    #[test]
    fn test_display() {
        let city = City::new("3", "Riyadh");
        assert_eq!(city.to_string(), "Riyadh (3)");
    }
}
