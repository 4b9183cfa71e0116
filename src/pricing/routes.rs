//! Pricing API routes

use axum::{extract::State, routing::post, Json, Router};

use crate::error::Result;
use crate::AppState;

use super::requests::QuotePayload;
use super::responses::QuotePricingResponse;
use super::services;

pub fn router() -> Router<AppState> {
    Router::new().route("/pricing/quote", post(price_quote))
}

/// Price a draft without saving it
async fn price_quote(
    State(state): State<AppState>,
    Json(payload): Json<QuotePayload>,
) -> Result<Json<QuotePricingResponse>> {
    let draft = payload.into_draft();
    let pricing = services::price_draft(&state.db, &state.cache, &draft).await?;

    Ok(Json(pricing.into()))
}
