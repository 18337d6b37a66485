use event_db_core::contract::ValidationError;
use thiserror::Error;

/// Internal failure classification. Callers outside the handler only ever see
/// the generic public message; the kind is kept for logs.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("invalid trigger input: {0}")]
    Validation(String),
    #[error("{operation} failed: {message}")]
    RemoteCall {
        operation: &'static str,
        message: String,
    },
    #[error("query {job_id} still {state} after {attempts} polls ({elapsed_ms} ms)")]
    Timeout {
        job_id: String,
        state: String,
        attempts: u32,
        elapsed_ms: u128,
    },
    #[error("setup query '{name}' finished in state {state}")]
    QueryFailed { name: String, state: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("unsupported custom resource action: {0}")]
    MissingAction(String),
    #[error("wait for query {job_id} was cancelled")]
    Cancelled { job_id: String },
}

impl HookError {
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        Self::RemoteCall {
            operation,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::RemoteCall { .. } | Self::Timeout { .. } | Self::QueryFailed { .. } => {
                "remote_call"
            }
            Self::Configuration(_) => "configuration",
            Self::MissingAction(_) => "missing_action",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

impl From<ValidationError> for HookError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.message().to_string())
    }
}
