//! Trip option ("settings") route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::trip_option::TripOption;
use crate::models::{TripCategory, TripOptions};
use crate::pricing::amount::{self, Amount};
use crate::AppState;

/// New option from the settings screen
#[derive(Debug, Deserialize)]
pub struct NewTripOption {
    pub category: TripCategory,
    pub label: String,
    #[serde(default, with = "amount")]
    pub price: Amount,
}

/// Partial edit of an option
#[derive(Debug, Deserialize)]
pub struct TripOptionUpdate {
    pub label: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub price: Option<Amount>,
}

/// Present field decodes parse-or-zero, absent stays `None`
fn optional_amount<'de, D>(deserializer: D) -> std::result::Result<Option<Amount>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    amount::deserialize(deserializer).map(Some)
}

fn clean_label(label: &str) -> Result<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(AppError::Validation("Missing label".to_string()));
    }
    Ok(label.to_string())
}

/// All options grouped by category
pub async fn list(State(state): State<AppState>) -> Result<Json<TripOptions>> {
    if let Some(cached) = state.cache.get_trip_options().await {
        tracing::debug!("Cache HIT for trip options");
        return Ok(Json((*cached).clone()));
    }

    tracing::debug!("Cache MISS for trip options");
    let generation = state.cache.trip_options_generation();
    let rows = db::list_trip_options(&state.db).await?;
    let grouped: Arc<TripOptions> = state
        .cache
        .set_trip_options(TripOptions::group(&rows), generation)
        .await;

    Ok(Json((*grouped).clone()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewTripOption>,
) -> Result<(StatusCode, Json<TripOption>)> {
    let label = clean_label(&payload.label)?;

    let row = db::insert_trip_option(&state.db, payload.category, &label, payload.price).await?;
    state.cache.invalidate_trip_options().await;
    tracing::info!("Trip option {:?} added to {}", row.label, row.category);

    let option = row
        .to_option()
        .ok_or_else(|| AppError::Internal(format!("Unknown category {}", row.category)))?;
    Ok((StatusCode::CREATED, Json(option)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TripOptionUpdate>,
) -> Result<Json<TripOption>> {
    let label = payload.label.as_deref().map(clean_label).transpose()?;

    let row = db::update_trip_option(&state.db, id, label.as_deref(), payload.price).await?;
    state.cache.invalidate_trip_options().await;

    let option = row
        .to_option()
        .ok_or_else(|| AppError::Internal(format!("Unknown category {}", row.category)))?;
    Ok(Json(option))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    db::delete_trip_option(&state.db, id).await?;
    state.cache.invalidate_trip_options().await;

    Ok(StatusCode::NO_CONTENT)
}
