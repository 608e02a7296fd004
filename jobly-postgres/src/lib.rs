mod company;
mod convert;
mod job;
pub mod query;
mod schema;

pub use company::{PostgresCompanyRepository, COMPANY_FILTERS};
pub use job::{PostgresJobRepository, JOB_FILTERS};
pub use schema::{connect, init_schema};
