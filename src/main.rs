use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use umrah_quotes::cache::{self, AppCache};
use umrah_quotes::config::Config;
use umrah_quotes::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "umrah_quotes=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    let cache = AppCache::new();
    tokio::spawn(cache::start_cache_warmer(
        cache.clone(),
        db.clone(),
        config.cache_refresh,
    ));

    let app = app(AppState { db, cache });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
