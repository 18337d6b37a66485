use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const MISSING_ACTION_MESSAGE: &str = "Missing CustomResourceAction";
pub const SEE_LOGS_MESSAGE: &str = "See Lambda Logs";
pub const ERROR_PHYSICAL_RESOURCE_ID: &str = "error";
pub const ACTION_PROPERTY: &str = "CustomResourceAction";

// ── storage notifications ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageNotification {
    #[serde(rename = "Records")]
    pub records: Vec<StorageRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageRecord {
    pub s3: StorageEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageEntity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectRef {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

/// Value returned by the partition hook. `statusCode` is a string on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartitionHandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    pub body: MessageBody,
}

impl PartitionHandlerResponse {
    pub fn success() -> Self {
        Self {
            status_code: "200".to_string(),
            body: MessageBody {
                message: "success".to_string(),
            },
        }
    }

    pub fn error() -> Self {
        Self {
            status_code: "500".to_string(),
            body: MessageBody {
                message: "error".to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == "200"
    }

    pub fn to_json_string(&self) -> String {
        stable_contract_json(self)
    }
}

// ── provisioning lifecycle events ──────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_properties: Map<String, Value>,
}

impl CustomResourceEvent {
    pub fn action_tag(&self) -> Option<&str> {
        self.resource_properties
            .get(ACTION_PROPERTY)
            .and_then(Value::as_str)
    }

    pub fn action(&self) -> Option<CustomResourceAction> {
        self.action_tag().and_then(CustomResourceAction::parse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomResourceAction {
    GenerateUuid,
    CreateBucket,
    SetupSampleFiles,
}

impl CustomResourceAction {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "GenerateUUID" => Some(Self::GenerateUuid),
            "CreateBucket" => Some(Self::CreateBucket),
            "SetupSampleFiles" => Some(Self::SetupSampleFiles),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateUuid => "GenerateUUID",
            Self::CreateBucket => "CreateBucket",
            Self::SetupSampleFiles => "SetupSampleFiles",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallbackStatus {
    Success,
    Failed,
}

/// Body of the custom resource response document sent to `ResponseURL`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackResponse {
    #[serde(skip)]
    pub response_url: String,
    pub status: CallbackStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: Value,
}

impl CallbackResponse {
    pub fn for_event(
        event: &CustomResourceEvent,
        status: CallbackStatus,
        data: Value,
        physical_resource_id: Option<&str>,
        log_stream_name: &str,
    ) -> Self {
        Self {
            response_url: event.response_url.clone(),
            status,
            reason: callback_reason(log_stream_name),
            physical_resource_id: physical_resource_id
                .filter(|value| !value.is_empty())
                .unwrap_or(log_stream_name)
                .to_string(),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            no_echo: false,
            data,
        }
    }

    /// FAILED response for a payload that did not decode as a
    /// [`CustomResourceEvent`]. `None` without a usable `ResponseURL`.
    pub fn failed_for_payload(
        payload: &Value,
        data: Value,
        physical_resource_id: &str,
        log_stream_name: &str,
    ) -> Option<Self> {
        let field = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let response_url = field("ResponseURL");
        if response_url.is_empty() {
            return None;
        }

        Some(Self {
            response_url,
            status: CallbackStatus::Failed,
            reason: callback_reason(log_stream_name),
            physical_resource_id: physical_resource_id.to_string(),
            stack_id: field("StackId"),
            request_id: field("RequestId"),
            logical_resource_id: field("LogicalResourceId"),
            no_echo: false,
            data,
        })
    }
}

fn callback_reason(log_stream_name: &str) -> String {
    format!("See the details in CloudWatch Log Stream: {log_stream_name}")
}

pub fn failure_data(message: &str) -> Value {
    json!({ "success": false, "error": message })
}

// ── anonymous usage metrics ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageMetrics {
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
    #[serde(rename = "Data")]
    pub data: Value,
    #[serde(rename = "Solution")]
    pub solution: Option<String>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,
}

impl UsageMetrics {
    pub fn partition_triggers(
        timestamp: impl Into<String>,
        record_count: usize,
        solution: Option<String>,
        uuid: Option<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            data: json!({ "S3PartitionTriggers": record_count }),
            solution,
            uuid,
        }
    }
}

// ── errors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}
