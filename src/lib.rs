//! Umrah & Hajj quote service.
//!
//! REST backend for the agency's mobile app: accounts, quotes, the hotel
//! catalog and trip options, with every quote priced server-side by
//! [`pricing`].

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod password;
pub mod pricing;
pub mod routes;

use axum::Router;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cache::AppCache;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .merge(pricing::router())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
