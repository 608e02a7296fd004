use crate::convert::storage_error;
use jobly_core::{JoblyError, Result};
use sqlx::PgPool;

const CREATE_COMPANIES: &str = "CREATE TABLE IF NOT EXISTS companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
)";

const CREATE_JOBS: &str = "CREATE TABLE IF NOT EXISTS jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
)";

/// Open a pool and make sure the `companies` and `jobs` tables exist.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPool::connect(database_url)
        .await
        .map_err(|e| JoblyError::Storage(e.to_string()))?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for ddl in [CREATE_COMPANIES, CREATE_JOBS] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(storage_error)?;
    }
    tracing::debug!("schema ready");
    Ok(())
}
