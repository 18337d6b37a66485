/// Event types routed from a configuration set to the event database.
pub const DESTINATION_EVENT_TYPES: [&str; 8] = [
    "SEND",
    "REJECT",
    "BOUNCE",
    "COMPLAINT",
    "DELIVERY",
    "OPEN",
    "CLICK",
    "RENDERING_FAILURE",
];

pub const EVENT_DESTINATION_NAME: &str = "event-database";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    pub id: Option<String>,
    pub name: String,
    pub query_string: String,
    pub database: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedQueryBatch {
    pub queries: Vec<NamedQuery>,
    pub unprocessed_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query_string: String,
    pub database: String,
    pub output_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    Unknown(String),
}

impl QueryState {
    pub fn parse(value: &str) -> Self {
        match value {
            "QUEUED" => Self::Queued,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown(value) => value,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl std::fmt::Display for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDestinationSpec {
    pub name: String,
    pub enabled: bool,
    pub event_types: Vec<String>,
    pub application_arn: String,
}

impl EventDestinationSpec {
    pub fn event_database(application_arn: impl Into<String>) -> Self {
        Self {
            name: EVENT_DESTINATION_NAME.to_string(),
            enabled: true,
            event_types: DESTINATION_EVENT_TYPES
                .iter()
                .map(|value| value.to_string())
                .collect(),
            application_arn: application_arn.into(),
        }
    }
}

/// Splits a comma separated list of configuration set names, skipping blanks.
pub fn configuration_set_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
