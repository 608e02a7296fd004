use jobly_core::{Auth, BearerAuth, NoAuth};
use std::sync::Arc;

const DEFAULT_PORT: u16 = 3001;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("PORT is not a valid port: {0}")]
    InvalidPort(String),
}

/// Process settings read from the environment, after loading `.env` if present.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub admin_token: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let database_url = lookup("DATABASE_URL").ok_or(SettingsError::MissingDatabaseUrl)?;
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| SettingsError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let admin_token = lookup("ADMIN_TOKEN").filter(|t| !t.is_empty());

        Ok(Self {
            database_url,
            port,
            admin_token,
        })
    }

    pub fn auth(&self) -> Arc<dyn Auth> {
        match &self.admin_token {
            Some(token) => Arc::new(BearerAuth::new(token.clone())),
            None => {
                tracing::warn!("ADMIN_TOKEN not set; admin routes are open");
                Arc::new(NoAuth)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_port_and_leaves_auth_open() {
        let settings = Settings::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/jobly")]))
            .unwrap();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.admin_token, None);
    }

    #[test]
    fn reads_port_and_token() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/jobly"),
            ("PORT", "8080"),
            ("ADMIN_TOKEN", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.admin_token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn rejects_missing_url_and_bad_port() {
        assert!(matches!(
            Settings::from_lookup(lookup(&[])),
            Err(SettingsError::MissingDatabaseUrl)
        ));
        assert!(matches!(
            Settings::from_lookup(lookup(&[("DATABASE_URL", "x"), ("PORT", "http")])),
            Err(SettingsError::InvalidPort(_))
        ));
    }
}
