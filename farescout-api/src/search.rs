use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use farescout_core::search::{RoundTripOption, RoundTripRequest, StayOption, StayRequest};
use serde::Deserialize;
use tracing::debug;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchParams {
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchParams {
    pub destination: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flight", get(search_flights))
        .route("/hotel", get(search_hotels))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /flight
/// Cheapest round trips from the configured origin, every price tie included
async fn search_flights(
    State(state): State<AppState>,
    params: Result<Query<FlightSearchParams>, QueryRejection>,
) -> Result<Json<Vec<RoundTripOption>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::ValidationError(e.body_text()))?;
    debug!("Flight search: {:?}", params);

    let request = RoundTripRequest::parse(
        params.destination.as_deref(),
        params.departure_date.as_deref(),
        params.return_date.as_deref(),
    )?;

    let options = state
        .within_deadline(state.search.cheapest_round_trip(&request))
        .await?;

    Ok(Json(options))
}

/// GET /hotel
async fn search_hotels(
    State(state): State<AppState>,
    params: Result<Query<HotelSearchParams>, QueryRejection>,
) -> Result<Json<Vec<StayOption>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::ValidationError(e.body_text()))?;
    debug!("Hotel search: {:?}", params);

    let request = StayRequest::parse(
        params.destination.as_deref(),
        params.check_in_date.as_deref(),
        params.check_out_date.as_deref(),
    )?;

    let options = state.within_deadline(state.search.cheapest_stay(&request)).await?;

    Ok(Json(options))
}
