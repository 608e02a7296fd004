mod error;
mod routes;

pub use error::ApiError;
pub use routes::{build_company_router, build_job_router};
