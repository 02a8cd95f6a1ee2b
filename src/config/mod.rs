use crate::error::ConfigError;
use crate::views::View;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "casedesk";
const CONFIG_FILE_NAME: &str = "config.json";
const SESSION_DB_NAME: &str = "session.db";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub dashboard_path: String,
    pub login_path: String,
    pub analyze_endpoint: String,
    pub history_endpoint: String,
    pub token_key: String,
    pub date_format: String,
    pub history_policy: HistoryPolicy,
    pub initial_view: View,
    pub labels: SubmitLabels,
    pub request_timeout_secs: Option<u64>,
}

/// Which history fetch gets to paint when activations overlap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// A new activation aborts the previous fetch; stale results are dropped.
    LatestActivation,
    /// Every fetch paints when it resolves, so the last one to resolve wins.
    LastResolved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SubmitLabels {
    pub idle: String,
    pub busy: String,
}

impl Default for SubmitLabels {
    fn default() -> Self {
        Self {
            idle: "Analyze Case".to_string(),
            busy: "Analyzing...".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            dashboard_path: "/dashboard".to_string(),
            login_path: "/login".to_string(),
            analyze_endpoint: "/api/analyze".to_string(),
            history_endpoint: "/api/history/".to_string(),
            token_key: "token".to_string(),
            date_format: "%m/%d/%Y".to_string(),
            history_policy: HistoryPolicy::LatestActivation,
            initial_view: View::NewCase,
            labels: SubmitLabels::default(),
            request_timeout_secs: None,
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit file, or from the default location when `path` is
    /// `None`. A missing default file yields the defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("CASEDESK_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(token_key) = lookup("CASEDESK_TOKEN_KEY") {
            self.token_key = token_key;
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn analyze_url(&self) -> String {
        join_url(&self.base_url, &self.analyze_endpoint)
    }

    pub fn history_url(&self) -> String {
        join_url(&self.base_url, &self.history_endpoint)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn default_session_db_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(SESSION_DB_NAME))
}

fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_dashboard_routes() {
        let config = DashboardConfig::default();
        assert_eq!(config.dashboard_path, "/dashboard");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.token_key, "token");
        assert_eq!(config.history_policy, HistoryPolicy::LatestActivation);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.labels.idle, "Analyze Case");
        assert_eq!(config.labels.busy, "Analyzing...");
    }

    #[test]
    fn test_urls_join_without_double_slash() {
        let config = DashboardConfig::default().with_base_url("http://localhost:9000/");
        assert_eq!(config.analyze_url(), "http://localhost:9000/api/analyze");
        assert_eq!(config.history_url(), "http://localhost:9000/api/history/");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{"base_url": "https://cases.example", "history_policy": "last_resolved"}"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://cases.example");
        assert_eq!(config.history_policy, HistoryPolicy::LastResolved);
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.initial_view, View::NewCase);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CASEDESK_BASE_URL", "http://override:1234"),
            ("CASEDESK_TOKEN_KEY", "jwt"),
        ]
        .into_iter()
        .collect();

        let config = DashboardConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "http://override:1234");
        assert_eq!(config.token_key, "jwt");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = DashboardConfig::from_file(Path::new("/nonexistent/casedesk.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
