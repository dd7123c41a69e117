use crate::config::LoggingConfig;
use crate::events::dispatcher::init_events;
use crate::events::model::LogLevel;
use crate::events::sink::{ConsoleSink, JsonFileSink, LogSink};
use std::sync::Arc;

const DEFAULT_AUDIT_PATH: &str = "logs/mesh_audit.jsonl";
const DEFAULT_AUDIT_MAX_BYTES: u64 = 5 * 1024 * 1024;
const DEFAULT_AUDIT_BACKUPS: u32 = 3;

/// Console plus rotating JSONL audit log, all defaults.
pub async fn init_default_events() {
    init_events_with_options(None, None).await
}

/// Sink setup driven by the `[logging]` config section.
pub async fn init_events_from_config(logging: Option<&LoggingConfig>) {
    init_events_with_options(logging, None).await
}

pub async fn init_events_with_options(
    logging: Option<&LoggingConfig>,
    console_min_level: Option<LogLevel>,
) {
    let mut sinks: Vec<Arc<dyn LogSink>> = Vec::new();

    if !logging.and_then(|l| l.disable_console).unwrap_or(false) {
        sinks.push(Arc::new(ConsoleSink::new(console_min_level)));
    }

    let path = logging
        .and_then(|l| l.json_path.as_deref())
        .unwrap_or(DEFAULT_AUDIT_PATH);
    let max_bytes = logging
        .and_then(|l| l.json_max_bytes)
        .map(|b| b as u64)
        .unwrap_or(DEFAULT_AUDIT_MAX_BYTES);
    let backups = logging
        .and_then(|l| l.json_rotate)
        .unwrap_or(DEFAULT_AUDIT_BACKUPS);
    match JsonFileSink::new(path, true, max_bytes, backups).await {
        Ok(sink) => sinks.push(Arc::new(sink)),
        Err(_) => {
            // Audit file unavailable; run with whatever sinks remain.
        }
    }

    init_events(sinks, 1024).await;
}
