//! Cache types for lookup responses.

use saudi_address_core::{City, District, Language, Region};

/// Most entries the lookup cache holds.
pub const MAX_ENTRIES: u64 = 4096;

/// Cache key: operation plus parameters.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Regions { language: Language },
    Cities { region_id: i64, language: Language },
    Districts { city_id: i64, language: Language },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Regions(Vec<Region>),
    Cities(Vec<City>),
    Districts(Vec<District>),
}
