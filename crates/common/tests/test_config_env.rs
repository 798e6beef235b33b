use common::{ConfigError, LlmConfig, TrackerConfig};
use serial_test::serial;

#[test]
#[serial]
fn test_tracker_config_reads_process_env() {
    std::env::set_var("JIRA_EMAIL", "ops@example.com");
    std::env::set_var("JIRA_API_TOKEN", "token");
    std::env::set_var("TCM_PROJECT_KEY", "CAP");

    let config = TrackerConfig::from_env().unwrap();
    assert_eq!(config.email.as_deref(), Some("ops@example.com"));
    assert_eq!(config.api_token.as_deref(), Some("token"));
    assert_eq!(config.project_key, "CAP");

    std::env::remove_var("JIRA_EMAIL");
    std::env::remove_var("JIRA_API_TOKEN");
    std::env::remove_var("TCM_PROJECT_KEY");
}

#[test]
#[serial]
fn test_llm_config_missing_key() {
    let old = std::env::var("ANTHROPIC_API_KEY").ok();
    std::env::set_var("ANTHROPIC_API_KEY", "");

    let result = LlmConfig::from_env();
    assert_eq!(result.unwrap_err(), ConfigError::missing("ANTHROPIC_API_KEY"));

    match old {
        Some(value) => std::env::set_var("ANTHROPIC_API_KEY", value),
        None => std::env::remove_var("ANTHROPIC_API_KEY"),
    }
}
