use cucumber::World;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct CertWorld {
    pub client: reqwest::Client,
    // Injected by the test runner's before hook.
    pub server_addr: Option<String>,
    pub admin_token: Option<String>,

    // Job ids by title, for `<job.TITLE>` references in paths.
    pub job_ids: HashMap<String, i64>,
    pub last_status: Option<u16>,
    pub last_response: Option<Value>,
}

impl CertWorld {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            server_addr: None,
            admin_token: None,
            job_ids: HashMap::new(),
            last_status: None,
            last_response: None,
        }
    }

    pub fn server_addr(&self) -> &str {
        self.server_addr
            .as_deref()
            .expect("server_addr must be set before this step")
    }

    /// Replace `<job.TITLE>` references with the id the job was created under.
    pub fn resolve(&self, path: &str) -> String {
        let mut resolved = path.to_string();
        for (title, id) in &self.job_ids {
            resolved = resolved.replace(&format!("<job.{title}>"), &id.to_string());
        }
        resolved
    }

    pub fn response(&self) -> &Value {
        self.last_response.as_ref().expect("no response")
    }
}

impl Default for CertWorld {
    fn default() -> Self {
        Self::new()
    }
}
