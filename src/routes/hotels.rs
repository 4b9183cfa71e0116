//! Hotel catalog route handlers
//!
//! Every write drops the cached catalog snapshot so the next pricing call
//! sees the new rates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::HotelRow;
use crate::pricing::models::HotelRateSheet;
use crate::pricing::requests::HotelPayload;
use crate::pricing::responses::HotelResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HotelListQuery {
    pub city: Option<String>,
}

fn validate_sheet(sheet: &HotelRateSheet) -> Result<()> {
    if sheet.name.is_empty() || sheet.city.is_empty() {
        return Err(AppError::Validation("Missing hotel name or city".to_string()));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HotelListQuery>,
) -> Result<Json<Vec<HotelResponse>>> {
    let city = query.city.as_deref().filter(|c| !c.is_empty());
    let hotels = db::list_hotels(&state.db, city).await?;

    Ok(Json(hotels.into_iter().map(HotelRow::into_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<HotelPayload>,
) -> Result<(StatusCode, Json<HotelResponse>)> {
    let sheet = payload.into_rate_sheet();
    validate_sheet(&sheet)?;

    let hotel = db::insert_hotel(&state.db, &sheet).await?;
    state.cache.invalidate_catalog().await;
    tracing::info!("Hotel {} ({}) added to catalog", hotel.name, hotel.city);

    Ok((StatusCode::CREATED, Json(hotel.into_response())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HotelPayload>,
) -> Result<Json<HotelResponse>> {
    let sheet = payload.into_rate_sheet();
    validate_sheet(&sheet)?;

    let hotel = db::update_hotel(&state.db, id, &sheet).await?;
    state.cache.invalidate_catalog().await;
    tracing::info!("Hotel {} updated", hotel.id);

    Ok(Json(hotel.into_response()))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    db::delete_hotel(&state.db, id).await?;
    state.cache.invalidate_catalog().await;
    tracing::info!("Hotel {} removed from catalog", id);

    Ok(StatusCode::NO_CONTENT)
}
