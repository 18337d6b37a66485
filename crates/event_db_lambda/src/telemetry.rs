//! Structured JSON log lines on stderr, one object per event.
//!
//! Each line is a complete JSON document with `details` nested as an object,
//! so log queries can filter on its keys directly.

use std::backtrace::Backtrace;

use event_db_core::log_level::LogLevel;
use serde_json::{json, Value};
use tracing::level_filters::LevelFilter;

use crate::error::HookError;

pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warning => LevelFilter::WARN,
        LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
    }
}

/// Installs the global subscriber. Later calls are no-ops.
///
/// The formatter prints the bare message; the message is already the full
/// JSON record built by [`log_record`].
pub fn init_logging(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(level_filter(level))
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn init_logging_from_env() {
    let raw = std::env::var("LOG_LEVEL").ok();
    init_logging(LogLevel::from_env_value(raw.as_deref()));
}

pub fn log_record(level: LogLevel, component: &str, event: &str, details: Value) -> Value {
    json!({
        "level": level.as_str(),
        "component": component,
        "event": event,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "details": details,
    })
}

pub fn log_debug(component: &str, event: &str, details: Value) {
    tracing::debug!("{}", log_record(LogLevel::Debug, component, event, details));
}

pub fn log_info(component: &str, event: &str, details: Value) {
    tracing::info!("{}", log_record(LogLevel::Info, component, event, details));
}

pub fn log_warn(component: &str, event: &str, details: Value) {
    tracing::warn!("{}", log_record(LogLevel::Warning, component, event, details));
}

pub fn log_error(component: &str, event: &str, details: Value) {
    tracing::error!("{}", log_record(LogLevel::Error, component, event, details));
}

/// Error details including the stack of the handler boundary that caught it.
pub fn error_details(error: &HookError) -> Value {
    json!({
        "error_kind": error.kind(),
        "error": error.to_string(),
        "debug": format!("{error:?}"),
        "backtrace": Backtrace::force_capture().to_string(),
    })
}

pub fn log_hook_error(component: &str, event: &str, error: &HookError) {
    log_error(component, event, error_details(error));
}
