pub mod auth;
pub mod config;
pub mod error;
pub mod field;
pub mod testing;

pub use auth::{Auth, BearerAuth, NoAuth};
pub use config::{CompanyRestletteConfig, JobRestletteConfig, ServerConfig};
pub use error::{JoblyError, Result};
pub use field::FieldMap;

use serde::{Deserialize, Serialize};

/// Untyped JSON object as received from a request body or query string.
pub type Stash = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Company {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// A company together with the jobs it posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<f64>,
    pub company_handle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
}

/// A job with its owning company in place of the bare handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company: Company,
}

#[async_trait::async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, company: Company) -> Result<Company>;
    /// Recognized filters: `name`, `minEmployees`, `maxEmployees`.
    async fn find_all(&self, filters: &Stash) -> Result<Vec<Company>>;
    async fn get(&self, handle: &str) -> Result<CompanyDetail>;
    async fn update(&self, handle: &str, data: &FieldMap) -> Result<Company>;
    async fn remove(&self, handle: &str) -> Result<()>;
}

#[async_trait::async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: NewJob) -> Result<Job>;
    /// Recognized filters: `title`, `minSalary`, `hasEquity`.
    async fn find_all(&self, filters: &Stash) -> Result<Vec<Job>>;
    async fn get(&self, id: i32) -> Result<JobDetail>;
    async fn update(&self, id: i32, data: &FieldMap) -> Result<Job>;
    async fn remove(&self, id: i32) -> Result<()>;
}
