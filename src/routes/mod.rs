//! HTTP route handlers

pub mod dashboard;
pub mod hotels;
pub mod quotes;
pub mod settings;
pub mod users;

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: CacheStats,
}

/// Liveness check; never touches the database
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/quotes", get(quotes::list).post(quotes::create))
        .route(
            "/quotes/:id",
            get(quotes::detail).put(quotes::replace).delete(quotes::remove),
        )
        .route("/quotes/:id/sheet", get(quotes::sheet))
        .route("/hotels", get(hotels::list).post(hotels::create))
        .route("/hotels/:id", put(hotels::update).delete(hotels::remove))
        .route("/settings", get(settings::list).post(settings::create))
        .route("/settings/:id", put(settings::update).delete(settings::remove))
        .route("/dashboard", get(dashboard::stats))
        .route("/auth/login", post(users::login))
        .route("/auth/seed", get(users::seed))
        .route("/auth/create", post(users::create))
        .route("/auth/users", get(users::list))
        .route("/auth/users/:id", put(users::update).delete(users::remove))
}
