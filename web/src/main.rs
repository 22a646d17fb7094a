use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web::app::{router, AppState};
use web::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file for local development
    // Try to load from parent directory first (when run from web/)
    // then fall back to current directory
    dotenvy::from_filename("../.env")
        .or_else(|_| dotenvy::dotenv())
        .ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,web=debug,availability=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Tracing initialized");

    let config = Config::from_env().context("invalid configuration")?;
    let addr = config.site_addr;
    tracing::info!(time_zone = %config.time_zone, window_days = config.upcoming_window_days, "configuration loaded");

    let app = router(AppState::new(config));

    tracing::info!("listening on http://{}", &addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
