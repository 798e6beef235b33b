//! Environment-driven configuration.
//!
//! Every section reads through a lookup function so tests can feed a map
//! instead of mutating the process environment. The `from_env` variants load
//! `.env` first, the same way the rest of the tooling does.

use crate::errors::{ConfigError, ConfigResult};
use std::env;
use std::str::FromStr;

pub const DEFAULT_JIRA_BASE_URL: &str = "https://yorkb2e.atlassian.net";
pub const DEFAULT_PROJECT_KEY: &str = "TCM";
pub const DEFAULT_MAX_RESULTS: u32 = 100;
pub const DEFAULT_MCP_SERVER_URL: &str = "https://mcp.cloud.cdata.com/mcp/";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

fn load_dotenv() {
    dotenv::dotenv().ok();
}

fn process_env(var: &str) -> Option<String> {
    env::var(var).ok()
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, var: &str) -> ConfigResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, var).ok_or_else(|| ConfigError::missing(var))
}

fn parsed_or<F, T>(lookup: &F, var: &str, default: T) -> ConfigResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, var) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::invalid(var, &raw, e)),
        None => Ok(default),
    }
}

/// Where and how to reach the capacity-management tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub base_url: String,
    /// Credentials stay optional here; the fetcher rejects a missing pair
    /// before it sends anything.
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub project_key: String,
    pub max_results: u32,
}

impl TrackerConfig {
    pub fn from_env() -> ConfigResult<Self> {
        load_dotenv();
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            base_url: non_empty(&lookup, "JIRA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_JIRA_BASE_URL.to_string()),
            email: non_empty(&lookup, "JIRA_EMAIL"),
            api_token: non_empty(&lookup, "JIRA_API_TOKEN"),
            project_key: non_empty(&lookup, "TCM_PROJECT_KEY")
                .unwrap_or_else(|| DEFAULT_PROJECT_KEY.to_string()),
            max_results: parsed_or(&lookup, "TCM_MAX_RESULTS", DEFAULT_MAX_RESULTS)?,
        })
    }
}

/// Remote MCP endpoint serving the documentation tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpConfig {
    pub server_url: String,
    pub email: String,
    pub access_token: String,
}

impl McpConfig {
    pub fn from_env() -> ConfigResult<Self> {
        load_dotenv();
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server_url: non_empty(&lookup, "MCP_SERVER_URL")
                .unwrap_or_else(|| DEFAULT_MCP_SERVER_URL.to_string()),
            email: required(&lookup, "CDATA_EMAIL")?,
            access_token: required(&lookup, "CDATA_ACCESS_TOKEN")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
}

impl LlmConfig {
    pub fn from_env() -> ConfigResult<Self> {
        load_dotenv();
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: required(&lookup, "ANTHROPIC_API_KEY")?,
            model: non_empty(&lookup, "ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            base_url: non_empty(&lookup, "ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            max_tokens: parsed_or(&lookup, "MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
        })
    }
}

/// Everything the interactive assistant needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub mcp: McpConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> ConfigResult<Self> {
        load_dotenv();
        Self::from_lookup(process_env)
    }

    /// MCP credentials are checked before the LLM key, matching the order
    /// operators see the errors in at startup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            tracker: TrackerConfig::from_lookup(&lookup)?,
            mcp: McpConfig::from_lookup(&lookup)?,
            llm: LlmConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_tracker_defaults() {
        let config = TrackerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_JIRA_BASE_URL);
        assert_eq!(config.project_key, "TCM");
        assert_eq!(config.max_results, 100);
        assert!(config.email.is_none());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_tracker_blank_values_count_as_unset() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            ("JIRA_EMAIL", "   "),
            ("JIRA_API_TOKEN", ""),
        ]))
        .unwrap();
        assert!(config.email.is_none());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_tracker_invalid_max_results() {
        let err = TrackerConfig::from_lookup(lookup_from(&[("TCM_MAX_RESULTS", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "TCM_MAX_RESULTS"));
    }

    #[test]
    fn test_mcp_requires_credentials() {
        let err = McpConfig::from_lookup(lookup_from(&[("CDATA_EMAIL", "a@b.c")])).unwrap_err();
        assert_eq!(err, ConfigError::missing("CDATA_ACCESS_TOKEN"));
    }

    #[test]
    fn test_app_config_reports_mcp_before_llm() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::missing("CDATA_EMAIL"));
    }

    #[test]
    fn test_app_config_complete() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JIRA_BASE_URL", "https://tracker.example.com/"),
            ("CDATA_EMAIL", "ops@example.com"),
            ("CDATA_ACCESS_TOKEN", "pat"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("MAX_TOKENS", "2048"),
        ]))
        .unwrap();
        assert_eq!(config.tracker.base_url, "https://tracker.example.com/");
        assert_eq!(config.mcp.server_url, DEFAULT_MCP_SERVER_URL);
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.llm.model, DEFAULT_ANTHROPIC_MODEL);
    }
}
