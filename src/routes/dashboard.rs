//! Dashboard summary handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::Result;
use crate::models::QuoteRecord;
use crate::pricing::amount::{self, Amount};
use crate::pricing::responses::QuoteResponse;
use crate::AppState;

const RECENT_QUOTES: i64 = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// Only count this seller's quotes; all quotes when absent
    pub created_by: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub quotes_count: i64,
    #[serde(with = "amount")]
    pub total_revenue: Amount,
    pub hotels_count: i64,
    pub recent_quotes: Vec<QuoteResponse>,
}

pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardStats>> {
    let created_by = query.created_by.as_deref().filter(|c| !c.is_empty());

    let (quotes_count, total_revenue) = db::quote_totals(&state.db, created_by).await?;
    let hotels_count = db::count_hotels(&state.db).await?;
    let recent = db::recent_quotes(&state.db, created_by, RECENT_QUOTES).await?;

    Ok(Json(DashboardStats {
        quotes_count,
        total_revenue,
        hotels_count,
        recent_quotes: recent.into_iter().map(QuoteRecord::into_response).collect(),
    }))
}
