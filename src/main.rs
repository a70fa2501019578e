mod api;
mod app;
mod config;
mod domain;
mod error;
mod logging;
mod middleware;
mod pipeline;
mod routes;
mod schema;
mod services;

use std::sync::Arc;

use anyhow::Result;

use pipeline::Orchestrator;
use services::catalog::CatalogLoader;
use services::llm::{BedrockClient, LlmAdapter};
use services::weather::{OpenWeatherClient, WeatherContextBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting outfit pipeline backend"
    );

    // Completion model client
    let model = BedrockClient::new(
        &settings.llm_region,
        &settings.llm_model_id,
        &settings.llm_access_key,
        &settings.llm_secret,
        settings.llm_timeout,
    )?;
    let llm = LlmAdapter::new(Arc::new(model), settings.llm_timeout);

    // Weather provider and context builder
    let provider = OpenWeatherClient::new(
        &settings.weather_api_key,
        settings.weather_timeout,
        settings.retry_max,
        settings.retry_base_delay,
    )?;
    let weather = WeatherContextBuilder::new(
        Arc::new(provider),
        settings.cache_ttl_weather,
        settings.forecast_max_days,
    );

    // Catalog loader; probe it once so a bad path fails loudly at boot
    let catalog = Arc::new(CatalogLoader::new(
        settings.catalog_path.clone(),
        settings.cache_ttl_catalog,
    ));
    match catalog.snapshot().await {
        Ok(snapshot) => tracing::info!(items = snapshot.len(), "Catalog loaded"),
        Err(e) => tracing::warn!(error = %e, "Catalog unavailable at startup - will retry per request"),
    }

    let orchestrator = Orchestrator::new(
        llm,
        weather,
        Arc::clone(&catalog),
        settings.session_ttl.as_secs(),
    );

    // Create application state
    let state = app::AppState::new(settings.clone(), orchestrator, catalog);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
