pub mod config;
pub mod errors;
pub mod logging;

pub use config::{AppConfig, LlmConfig, McpConfig, TrackerConfig};
pub use errors::{ConfigError, ConfigResult};
pub use logging::{init_logging, LoggingConfig, OperationTimer, StructuredLogEntry};
