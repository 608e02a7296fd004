use jobly_core::{Company, JoblyError, Result};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::Row;

/// Bind a JSON value with the Postgres type matching its kind.
///
/// Integers bind as `int8` and fractions as `float8`; Postgres casts both on assignment to
/// `integer`/`numeric` columns. Null binds as an untyped-compatible `int8` NULL.
pub(crate) fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => query.bind(i),
            (None, Some(f)) => query.bind(f),
            (None, None) => query.bind(n.to_string()),
        },
        Value::String(s) => query.bind(s.as_str()),
        other => query.bind(other.to_string()),
    }
}

pub(crate) fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    values: &'q [Value],
) -> Query<'q, Postgres, PgArguments> {
    for value in values {
        query = bind_value(query, value);
    }
    query
}

/// Classify a driver error by SQLSTATE. Bad client data becomes a validation error.
pub(crate) fn storage_error(err: sqlx::Error) -> JoblyError {
    if let Some(db_err) = err.as_database_error() {
        let message = db_err.message().to_string();
        match db_err.code().as_deref() {
            Some("23505") => return JoblyError::Validation(format!("duplicate value: {message}")),
            Some("23502" | "23514" | "22P02" | "22003" | "42804") => {
                return JoblyError::Validation(message)
            }
            _ => {}
        }
    }
    JoblyError::Storage(err.to_string())
}

pub(crate) fn row_to_company(row: &PgRow) -> Result<Company> {
    let get_err = |e: sqlx::Error| JoblyError::Storage(e.to_string());
    Ok(Company {
        handle: row.try_get("handle").map_err(get_err)?,
        name: row.try_get("name").map_err(get_err)?,
        description: row.try_get("description").map_err(get_err)?,
        num_employees: row.try_get("num_employees").map_err(get_err)?,
        logo_url: row.try_get("logo_url").map_err(get_err)?,
    })
}
