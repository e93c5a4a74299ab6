//! Client configuration, read from the environment.

use std::path::PathBuf;

use anyhow::Context;

use stockpad_observability::LogFormat;

pub const API_URL_ENV: &str = "STOCKPAD_API_URL";
pub const DATA_DIR_ENV: &str = "STOCKPAD_DATA_DIR";
pub const LOG_FORMAT_ENV: &str = stockpad_observability::tracing::LOG_FORMAT_ENV;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
const SESSION_DB_FILE: &str = "session.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Directory holding the session database.
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_url(&api_url.into()),
            data_dir: data_dir.into(),
            log_format: LogFormat::default(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::debug!("{API_URL_ENV} not set; using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            });

        let data_dir = match lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let log_format = lookup(LOG_FORMAT_ENV)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Ok(Self {
            api_url: normalize_url(&api_url),
            data_dir,
            log_format,
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_url(api_url);
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn session_db_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_DB_FILE)
    }
}

fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// `{app_data_dir}/stockpad`.
fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        }))
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    Ok(base.join("stockpad"))
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_ENV, "https://inventory.example.com/api/"),
            (DATA_DIR_ENV, "/tmp/stockpad-test"),
            (LOG_FORMAT_ENV, "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://inventory.example.com/api");
        assert_eq!(config.session_db_path(), PathBuf::from("/tmp/stockpad-test/session.db"));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn api_url_defaults_to_localhost() {
        let config =
            ClientConfig::from_lookup(lookup(&[(DATA_DIR_ENV, "/tmp/stockpad-test")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn overrides_replace_env_values() {
        let config = ClientConfig::new("http://a", "/tmp/a")
            .with_api_url("http://b/")
            .with_data_dir("/tmp/b");
        assert_eq!(config.api_url, "http://b");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/b"));
    }

    #[test]
    fn unknown_log_format_falls_back_to_json() {
        let config = ClientConfig::from_lookup(lookup(&[
            (DATA_DIR_ENV, "/tmp/x"),
            (LOG_FORMAT_ENV, "yaml"),
        ]))
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
