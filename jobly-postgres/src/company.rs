use crate::convert::{bind_all, row_to_company, storage_error};
use crate::query::{build_filter, check_fields, check_integers, sql_for_partial_update, FilterOp, FilterRule, FilterSpec};
use async_trait::async_trait;
use jobly_core::{
    Company, CompanyDetail, CompanyRepository, FieldMap, JoblyError, JobSummary, Result, Stash,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

const TRANSLATIONS: &[(&str, &str)] = &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

const INTEGERS: &[&str] = &["numEmployees"];

const UPDATABLE: &[&str] = &["name", "description", "numEmployees", "logoUrl"];

pub const COMPANY_FILTERS: FilterSpec = FilterSpec {
    rules: &[
        FilterRule {
            key: "name",
            column: "name",
            op: FilterOp::Contains,
        },
        FilterRule {
            key: "minEmployees",
            column: "num_employees",
            op: FilterOp::AtLeast,
        },
        FilterRule {
            key: "maxEmployees",
            column: "num_employees",
            op: FilterOp::AtMost,
        },
    ],
    range: Some(("minEmployees", "maxEmployees")),
};

pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_job_summary(row: &PgRow) -> Result<JobSummary> {
        let get_err = |e: sqlx::Error| JoblyError::Storage(e.to_string());
        Ok(JobSummary {
            id: row.try_get("id").map_err(get_err)?,
            title: row.try_get("title").map_err(get_err)?,
            salary: row.try_get("salary").map_err(get_err)?,
            equity: row.try_get("equity").map_err(get_err)?,
        })
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn create(&self, company: Company) -> Result<Company> {
        let existing = sqlx::query("SELECT handle FROM companies WHERE handle = $1")
            .bind(&company.handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        if existing.is_some() {
            return Err(JoblyError::validation(format!(
                "duplicate company: {}",
                company.handle
            )));
        }

        let sql = format!(
            "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&company.handle)
            .bind(&company.name)
            .bind(&company.description)
            .bind(company.num_employees)
            .bind(&company.logo_url)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        row_to_company(&row)
    }

    async fn find_all(&self, filters: &Stash) -> Result<Vec<Company>> {
        let where_part = build_filter(filters, &COMPANY_FILTERS)?;
        let sql = format!(
            "SELECT {COLUMNS} FROM companies {} ORDER BY name",
            where_part.where_sql()
        );
        debug!(%sql, params = where_part.values.len(), "finding companies");

        let rows = bind_all(sqlx::query(&sql), &where_part.values)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(row_to_company).collect()
    }

    async fn get(&self, handle: &str) -> Result<CompanyDetail> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        let row = sqlx::query(&sql)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| JoblyError::not_found(format!("no company: {handle}")))?;
        let company = row_to_company(&row)?;

        let job_rows = sqlx::query(
            "SELECT id, title, salary, equity::float8 AS equity
             FROM jobs WHERE company_handle = $1
             ORDER BY id",
        )
        .bind(handle)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let jobs = job_rows
            .iter()
            .map(Self::row_to_job_summary)
            .collect::<Result<Vec<_>>>()?;

        Ok(CompanyDetail { company, jobs })
    }

    async fn update(&self, handle: &str, data: &FieldMap) -> Result<Company> {
        check_fields(data, UPDATABLE)?;
        check_integers(data, INTEGERS)?;
        let set = sql_for_partial_update(data, TRANSLATIONS)?;
        let handle_idx = set.values.len() + 1;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${handle_idx} RETURNING {COLUMNS}",
            set.clause
        );
        debug!(%sql, params = handle_idx, "updating company");

        let row = bind_all(sqlx::query(&sql), &set.values)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| JoblyError::not_found(format!("no company: {handle}")))?;

        row_to_company(&row)
    }

    async fn remove(&self, handle: &str) -> Result<()> {
        let row = sqlx::query("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(_) => Ok(()),
            None => Err(JoblyError::not_found(format!("no company: {handle}"))),
        }
    }
}
