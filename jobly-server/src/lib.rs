pub mod settings;

pub use settings::{Settings, SettingsError};

use axum::Router;
use jobly_core::ServerConfig;
use jobly_restlette::{build_company_router, build_job_router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the full Axum application from a ServerConfig.
pub fn build_app(config: ServerConfig) -> Router {
    let companies = build_company_router(
        &config.companies.path,
        config.companies.repository,
        Arc::clone(&config.auth),
    );
    let jobs = build_job_router(
        &config.jobs.path,
        config.jobs.repository,
        Arc::clone(&config.auth),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(companies)
        .merge(jobs)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the server on the configured port.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let port = config.port;
    let app = build_app(config);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(port, "jobly listening");
    axum::serve(listener, app).await?;
    Ok(())
}
