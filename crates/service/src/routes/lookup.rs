//! Region, city and district dropdown data.

use axum::{Json, extract::State};
use saudi_address_core::{City, District, Language, Region};
use serde::Deserialize;
use tracing::instrument;

use super::form;
use crate::error::{AppError, Envelope, Result, success};
use crate::extract::JsonBody;
use crate::nonce::NonceAction;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegionsRequest {
    #[serde(default)]
    pub nonce: String,
    #[serde(default, deserialize_with = "form::language")]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct CitiesRequest {
    #[serde(default)]
    pub nonce: String,
    #[serde(default, deserialize_with = "form::lenient_id")]
    pub region_id: i64,
    #[serde(default, deserialize_with = "form::language")]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct DistrictsRequest {
    #[serde(default)]
    pub nonce: String,
    #[serde(default, deserialize_with = "form::lenient_id")]
    pub city_id: i64,
    #[serde(default, deserialize_with = "form::language")]
    pub language: Language,
}

/// `POST /api/regions`
#[instrument(skip(state, req), fields(language = %req.language))]
pub async fn regions(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegionsRequest>,
) -> Result<Json<Envelope<Vec<Region>>>> {
    state.check_nonce(NonceAction::Checkout, &req.nonce)?;

    let regions = state
        .client()
        .get_regions(req.language)
        .await
        .map_err(|e| AppError::address("Failed to load regions", e))?;

    Ok(success(regions))
}

/// `POST /api/cities`
#[instrument(skip(state, req), fields(region_id = req.region_id, language = %req.language))]
pub async fn cities(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CitiesRequest>,
) -> Result<Json<Envelope<Vec<City>>>> {
    state.check_nonce(NonceAction::Checkout, &req.nonce)?;

    let cities = state
        .client()
        .get_cities(req.region_id, req.language)
        .await
        .map_err(|e| AppError::address("Failed to load cities", e))?;

    Ok(success(cities))
}

/// `POST /api/districts`
#[instrument(skip(state, req), fields(city_id = req.city_id, language = %req.language))]
pub async fn districts(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DistrictsRequest>,
) -> Result<Json<Envelope<Vec<District>>>> {
    state.check_nonce(NonceAction::Checkout, &req.nonce)?;

    let districts = state
        .client()
        .get_districts(req.city_id, req.language)
        .await
        .map_err(|e| AppError::address("Failed to load districts", e))?;

    Ok(success(districts))
}
