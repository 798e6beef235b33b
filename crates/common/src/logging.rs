use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// One JSON log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLogEntry {
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

/// Layer that renders every event as a single JSON line, on stderr unless
/// another writer is given.
///
/// stdout belongs to the conversation, so logs never go there.
pub struct JsonFormatter<W = fn() -> io::Stderr> {
    make_writer: W,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            make_writer: io::stderr,
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> JsonFormatter<W> {
    pub fn with_writer<W2>(self, make_writer: W2) -> JsonFormatter<W2>
    where
        W2: for<'w> MakeWriter<'w> + 'static,
    {
        JsonFormatter { make_writer }
    }
}

impl<S, W> Layer<S> for JsonFormatter<W>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let entry = StructuredLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level: level_name(event.metadata().level()).to_string(),
            target: event.metadata().target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        };

        if let Ok(json) = serde_json::to_string(&entry) {
            let mut writer = self.make_writer.make_writer();
            let _ = writeln!(writer, "{}", json);
        }
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: HashMap<String, Value>,
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                Value::String(format!("{:?}", value)),
            );
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), Value::Bool(value));
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Fallback level when RUST_LOG is not set
    pub level: Level,
    pub json_output: bool,
    pub color_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_output: false,
            color_output: true,
        }
    }
}

impl LoggingConfig {
    /// Reads `LOG_FORMAT` (`json` or `pretty`) on top of the defaults.
    pub fn from_env() -> Self {
        let json_output = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self {
            json_output,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    if config.json_output {
        let subscriber = Registry::default().with(env_filter).with(JsonFormatter::new());
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_ansi(config.color_output)
            .without_time();
        let subscriber = Registry::default().with(env_filter).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

/// Measures an operation and logs its duration on completion
pub struct OperationTimer {
    start: std::time::Instant,
    operation_name: String,
}

impl OperationTimer {
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation_name: operation_name.into(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn finish_with_result<T, E: std::fmt::Display>(self, result: &Result<T, E>) {
        let duration_ms = self.elapsed_ms();
        match result {
            Ok(_) => tracing::info!(
                operation = %self.operation_name,
                duration_ms = duration_ms,
                success = true,
                "Operation completed"
            ),
            Err(e) => tracing::warn!(
                operation = %self.operation_name,
                duration_ms = duration_ms,
                success = false,
                error = %e,
                "Operation failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_log_entry_flattens_fields() {
        let mut fields = HashMap::new();
        fields.insert("count".to_string(), Value::from(42));
        let entry = StructuredLogEntry {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            level: "INFO".to_string(),
            target: "projects::cache".to_string(),
            message: "Loaded active projects".to_string(),
            fields,
        };

        let json: Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "INFO");
        assert_eq!(json["count"], 42);
        assert!(json.get("fields").is_none());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_json_formatter_writes_one_line_per_event() {
        let captured = Captured::default();
        let subscriber =
            Registry::default().with(JsonFormatter::new().with_writer(captured.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(count = 3u64, project = "TCM", "Tracker search failed");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.lines().count(), 1);
        let json: Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(json["level"], "WARN");
        assert_eq!(json["message"], "Tracker search failed");
        assert_eq!(json["count"], 3);
        assert_eq!(json["project"], "TCM");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_default_level_is_quiet() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert!(!config.json_output);
    }

    #[test]
    fn test_operation_timer_reports_result() {
        let timer = OperationTimer::new("test_operation");
        let result: Result<(), String> = Err("boom".into());
        timer.finish_with_result(&result);
    }
}
