#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use event_db_core::contract::{CallbackResponse, CustomResourceEvent};
use event_db_core::query::{
    EventDestinationSpec, NamedQuery, NamedQueryBatch, QueryRequest, QueryState,
};
use event_db_lambda::adapters::callback::ProvisioningCallback;
use event_db_lambda::adapters::clock::Clock;
use event_db_lambda::adapters::destinations::EventDestinationConfigurator;
use event_db_lambda::adapters::query_service::QueryService;
use event_db_lambda::config::VIEW_QUERY_VARS;
use event_db_lambda::handlers::custom_resource::InvocationContext;
use serde_json::{json, Value};

/// Named queries keyed by id; every job reports `final_state` after
/// `running_polls` non-terminal polls.
pub struct FakeQueryService {
    pub catalog: BTreeMap<String, NamedQuery>,
    pub final_states: HashMap<String, QueryState>,
    pub running_polls: usize,
    pub lookups: Mutex<Vec<Vec<String>>>,
    pub started: Mutex<Vec<QueryRequest>>,
    polls: Mutex<HashMap<String, usize>>,
    job_queries: Mutex<HashMap<String, String>>,
}

impl FakeQueryService {
    pub fn with_queries(ids: &[&str]) -> Self {
        let catalog = ids
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    NamedQuery {
                        id: Some(id.to_string()),
                        name: format!("name-{id}"),
                        query_string: format!("CREATE OR REPLACE VIEW {id} AS SELECT 1"),
                        database: "due_eventdb".to_string(),
                    },
                )
            })
            .collect();
        Self {
            catalog,
            final_states: HashMap::new(),
            running_polls: 1,
            lookups: Mutex::new(Vec::new()),
            started: Mutex::new(Vec::new()),
            polls: Mutex::new(HashMap::new()),
            job_queries: Mutex::new(HashMap::new()),
        }
    }

    pub fn started_queries(&self) -> Vec<String> {
        self.started
            .lock()
            .expect("poisoned mutex")
            .iter()
            .map(|request| request.query_string.clone())
            .collect()
    }
}

impl QueryService for FakeQueryService {
    fn batch_get_named_queries(&self, ids: &[String]) -> Result<NamedQueryBatch, String> {
        self.lookups
            .lock()
            .expect("poisoned mutex")
            .push(ids.to_vec());
        let mut batch = NamedQueryBatch::default();
        for id in ids {
            match self.catalog.get(id) {
                Some(query) => batch.queries.push(query.clone()),
                None => batch.unprocessed_ids.push(id.clone()),
            }
        }
        Ok(batch)
    }

    fn start_query_execution(&self, request: &QueryRequest) -> Result<String, String> {
        let mut started = self.started.lock().expect("poisoned mutex");
        started.push(request.clone());
        let job_id = format!("job-{}", started.len());
        let query_id = self
            .catalog
            .values()
            .find(|query| query.query_string == request.query_string)
            .and_then(|query| query.id.clone())
            .unwrap_or_default();
        self.job_queries
            .lock()
            .expect("poisoned mutex")
            .insert(job_id.clone(), query_id);
        Ok(job_id)
    }

    fn query_state(&self, job_id: &str) -> Result<QueryState, String> {
        let mut polls = self.polls.lock().expect("poisoned mutex");
        let count = polls.entry(job_id.to_string()).or_insert(0);
        *count += 1;
        if *count <= self.running_polls {
            return Ok(QueryState::Running);
        }
        let query_id = self
            .job_queries
            .lock()
            .expect("poisoned mutex")
            .get(job_id)
            .cloned()
            .ok_or_else(|| format!("unknown job {job_id}"))?;
        Ok(self
            .final_states
            .get(&query_id)
            .cloned()
            .unwrap_or(QueryState::Succeeded))
    }
}

#[derive(Default)]
pub struct RecordingDestinations {
    pub calls: Mutex<Vec<(String, EventDestinationSpec)>>,
}

impl RecordingDestinations {
    pub fn configuration_sets(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("poisoned mutex")
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl EventDestinationConfigurator for RecordingDestinations {
    fn create_event_destination(
        &self,
        configuration_set: &str,
        destination: &EventDestinationSpec,
    ) -> Result<(), String> {
        self.calls
            .lock()
            .expect("poisoned mutex")
            .push((configuration_set.to_string(), destination.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingCallback {
    pub responses: Mutex<Vec<CallbackResponse>>,
}

impl RecordingCallback {
    pub fn only_response(&self) -> CallbackResponse {
        let responses = self.responses.lock().expect("poisoned mutex");
        assert_eq!(responses.len(), 1, "exactly one callback per invocation");
        responses[0].clone()
    }
}

impl ProvisioningCallback for RecordingCallback {
    fn send(&self, response: &CallbackResponse) -> Result<(), String> {
        self.responses
            .lock()
            .expect("poisoned mutex")
            .push(response.clone());
        Ok(())
    }
}

pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }
}

impl ManualClock {
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().expect("poisoned mutex")
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration, _cancel: &AtomicBool) {
        *self.offset.lock().expect("poisoned mutex") += duration;
    }
}

pub fn lifecycle_event(action: Option<&str>) -> CustomResourceEvent {
    let mut properties = json!({
        "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:helper"
    });
    if let Some(action) = action {
        properties["CustomResourceAction"] = Value::from(action);
    }
    serde_json::from_value(json!({
        "RequestType": "Create",
        "ResponseURL": "https://cloudformation-custom-resource-response-useast1.s3.amazonaws.com/presigned",
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/due/guid",
        "RequestId": "cfn-request-1",
        "LogicalResourceId": "SetupSampleFiles",
        "ResourceType": "Custom::LoadLambda",
        "ResourceProperties": properties
    }))
    .expect("lifecycle event should parse")
}

pub fn invocation_context() -> InvocationContext {
    InvocationContext {
        request_id: "lambda-request-1".to_string(),
        log_stream_name: "2026/10/16/[$LATEST]0123456789abcdef".to_string(),
    }
}

pub fn view_query_ids() -> Vec<String> {
    VIEW_QUERY_VARS
        .iter()
        .map(|key| key.to_ascii_lowercase())
        .collect()
}

/// Environment for the setup hook: table query `all_event_table`, one view
/// query per `*_NQ` variable named after the variable.
pub fn setup_env(extra: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let mut env: HashMap<String, String> = HashMap::from([
        ("S3_DATA_BUCKET".to_string(), "due-data-bucket".to_string()),
        ("ALL_EVENT_TABLE".to_string(), "all_event_table".to_string()),
        ("EXISTING_CS".to_string(), "marketing,,transactional".to_string()),
        (
            "PINPOINT_PROJECT_ARN".to_string(),
            "arn:aws:mobiletargeting:us-east-1:123456789012:apps/project".to_string(),
        ),
    ]);
    for key in VIEW_QUERY_VARS {
        env.insert(key.to_string(), key.to_ascii_lowercase());
    }
    for (key, value) in extra {
        env.insert(key.to_string(), value.to_string());
    }
    move |key: &str| env.get(key).cloned()
}
