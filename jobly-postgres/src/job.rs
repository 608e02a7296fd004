use crate::convert::{bind_all, row_to_company, storage_error};
use crate::query::{build_filter, check_fields, check_integers, sql_for_partial_update, FilterOp, FilterRule, FilterSpec};
use async_trait::async_trait;
use jobly_core::{
    FieldMap, Job, JobDetail, JobRepository, JoblyError, NewJob, Result, Stash,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

// equity is NUMERIC in the table and read back as float8.
const COLUMNS: &str = "id, title, salary, equity::float8 AS equity, company_handle";

const INTEGERS: &[&str] = &["salary"];

const UPDATABLE: &[&str] = &["title", "salary", "equity"];

pub const JOB_FILTERS: FilterSpec = FilterSpec {
    rules: &[
        FilterRule {
            key: "title",
            column: "title",
            op: FilterOp::Contains,
        },
        FilterRule {
            key: "minSalary",
            column: "salary",
            op: FilterOp::AtLeast,
        },
        FilterRule {
            key: "hasEquity",
            column: "equity",
            op: FilterOp::NonZero,
        },
    ],
    range: None,
};

pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_job(row: &PgRow) -> Result<Job> {
        let get_err = |e: sqlx::Error| JoblyError::Storage(e.to_string());
        Ok(Job {
            id: row.try_get("id").map_err(get_err)?,
            title: row.try_get("title").map_err(get_err)?,
            salary: row.try_get("salary").map_err(get_err)?,
            equity: row.try_get("equity").map_err(get_err)?,
            company_handle: row.try_get("company_handle").map_err(get_err)?,
        })
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn create(&self, job: NewJob) -> Result<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&job.title)
            .bind(job.salary)
            .bind(job.equity)
            .bind(&job.company_handle)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let missing_company = e
                    .as_database_error()
                    .is_some_and(|db| db.is_foreign_key_violation());
                if missing_company {
                    JoblyError::not_found(format!("no company: {}", job.company_handle))
                } else {
                    storage_error(e)
                }
            })?;

        Self::row_to_job(&row)
    }

    async fn find_all(&self, filters: &Stash) -> Result<Vec<Job>> {
        let where_part = build_filter(filters, &JOB_FILTERS)?;
        let sql = format!(
            "SELECT {COLUMNS} FROM jobs {} ORDER BY title, id",
            where_part.where_sql()
        );
        debug!(%sql, params = where_part.values.len(), "finding jobs");

        let rows = bind_all(sqlx::query(&sql), &where_part.values)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(Self::row_to_job).collect()
    }

    async fn get(&self, id: i32) -> Result<JobDetail> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| JoblyError::not_found(format!("no job: {id}")))?;
        let job = Self::row_to_job(&row)?;

        let company_row = sqlx::query(
            "SELECT handle, name, description, num_employees, logo_url
             FROM companies WHERE handle = $1",
        )
        .bind(&job.company_handle)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        let company = row_to_company(&company_row)?;

        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }

    async fn update(&self, id: i32, data: &FieldMap) -> Result<Job> {
        check_fields(data, UPDATABLE)?;
        check_integers(data, INTEGERS)?;
        let set = sql_for_partial_update(data, &[])?;
        let id_idx = set.values.len() + 1;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${id_idx} RETURNING {COLUMNS}",
            set.clause
        );
        debug!(%sql, params = id_idx, "updating job");

        let row = bind_all(sqlx::query(&sql), &set.values)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| JoblyError::not_found(format!("no job: {id}")))?;

        Self::row_to_job(&row)
    }

    async fn remove(&self, id: i32) -> Result<()> {
        let row = sqlx::query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(_) => Ok(()),
            None => Err(JoblyError::not_found(format!("no job: {id}"))),
        }
    }
}
