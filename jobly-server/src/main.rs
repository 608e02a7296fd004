use jobly_core::{CompanyRestletteConfig, JobRestletteConfig, ServerConfig};
use jobly_postgres::{connect, PostgresCompanyRepository, PostgresJobRepository};
use jobly_server::{run, Settings};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jobly=info,tower_http=info,sqlx=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();

    let settings = Settings::from_env()?;
    let pool = connect(&settings.database_url).await?;

    let config = ServerConfig {
        port: settings.port,
        auth: settings.auth(),
        companies: CompanyRestletteConfig {
            path: "/companies".into(),
            repository: Arc::new(PostgresCompanyRepository::new(pool.clone())),
        },
        jobs: JobRestletteConfig {
            path: "/jobs".into(),
            repository: Arc::new(PostgresJobRepository::new(pool)),
        },
    };

    run(config).await
}
