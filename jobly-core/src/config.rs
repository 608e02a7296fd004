use crate::{Auth, CompanyRepository, JobRepository};
use std::sync::Arc;

pub struct CompanyRestletteConfig {
    pub path: String,
    pub repository: Arc<dyn CompanyRepository>,
}

pub struct JobRestletteConfig {
    pub path: String,
    pub repository: Arc<dyn JobRepository>,
}

pub struct ServerConfig {
    pub port: u16,
    pub auth: Arc<dyn Auth>,
    pub companies: CompanyRestletteConfig,
    pub jobs: JobRestletteConfig,
}
