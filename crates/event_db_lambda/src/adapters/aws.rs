use aws_sdk_athena::types::{QueryExecutionContext, ResultConfiguration};
use aws_sdk_sesv2::types::{EventDestinationDefinition, EventType, PinpointDestination};
use event_db_core::query::{
    EventDestinationSpec, NamedQuery, NamedQueryBatch, QueryRequest, QueryState,
};

use super::destinations::EventDestinationConfigurator;
use super::query_service::QueryService;
use super::run_blocking;

#[derive(Clone)]
pub struct AthenaQueryService {
    client: aws_sdk_athena::Client,
}

impl AthenaQueryService {
    pub fn new(client: aws_sdk_athena::Client) -> Self {
        Self { client }
    }
}

impl QueryService for AthenaQueryService {
    fn batch_get_named_queries(&self, ids: &[String]) -> Result<NamedQueryBatch, String> {
        let client = self.client.clone();
        let named_query_ids = ids.to_vec();

        let output = run_blocking(async move {
            client
                .batch_get_named_query()
                .set_named_query_ids(Some(named_query_ids))
                .send()
                .await
        })
        .map_err(|error| {
            format!(
                "failed to resolve named queries: {}",
                aws_sdk_athena::error::DisplayErrorContext(&error)
            )
        })?;

        Ok(NamedQueryBatch {
            queries: output
                .named_queries()
                .iter()
                .map(|query| NamedQuery {
                    id: query.named_query_id().map(str::to_string),
                    name: query.name().to_string(),
                    query_string: query.query_string().to_string(),
                    database: query.database().to_string(),
                })
                .collect(),
            unprocessed_ids: output
                .unprocessed_named_query_ids()
                .iter()
                .filter_map(|unprocessed| unprocessed.named_query_id().map(str::to_string))
                .collect(),
        })
    }

    fn start_query_execution(&self, request: &QueryRequest) -> Result<String, String> {
        let client = self.client.clone();
        let request = request.clone();

        let output = run_blocking(async move {
            client
                .start_query_execution()
                .query_string(request.query_string)
                .query_execution_context(
                    QueryExecutionContext::builder()
                        .database(request.database)
                        .build(),
                )
                .result_configuration(
                    ResultConfiguration::builder()
                        .output_location(request.output_location)
                        .build(),
                )
                .send()
                .await
        })
        .map_err(|error| {
            format!(
                "failed to start query execution: {}",
                aws_sdk_athena::error::DisplayErrorContext(&error)
            )
        })?;

        output
            .query_execution_id()
            .map(str::to_string)
            .ok_or_else(|| "start_query_execution returned no execution id".to_string())
    }

    fn query_state(&self, job_id: &str) -> Result<QueryState, String> {
        let client = self.client.clone();
        let execution_id = job_id.to_string();

        let output = run_blocking(async move {
            client
                .get_query_execution()
                .query_execution_id(execution_id)
                .send()
                .await
        })
        .map_err(|error| {
            format!(
                "failed to read query execution {job_id}: {}",
                aws_sdk_athena::error::DisplayErrorContext(&error)
            )
        })?;

        output
            .query_execution()
            .and_then(|execution| execution.status())
            .and_then(|status| status.state())
            .map(|state| QueryState::parse(state.as_str()))
            .ok_or_else(|| format!("query execution {job_id} has no status"))
    }
}

#[derive(Clone)]
pub struct SesEventDestinations {
    client: aws_sdk_sesv2::Client,
}

impl SesEventDestinations {
    pub fn new(client: aws_sdk_sesv2::Client) -> Self {
        Self { client }
    }
}

impl EventDestinationConfigurator for SesEventDestinations {
    fn create_event_destination(
        &self,
        configuration_set: &str,
        destination: &EventDestinationSpec,
    ) -> Result<(), String> {
        let client = self.client.clone();
        let configuration_set_name = configuration_set.to_string();
        let destination_name = destination.name.clone();
        let definition = EventDestinationDefinition::builder()
            .enabled(destination.enabled)
            .set_matching_event_types(Some(
                destination
                    .event_types
                    .iter()
                    .map(|event_type| EventType::from(event_type.as_str()))
                    .collect(),
            ))
            .pinpoint_destination(
                PinpointDestination::builder()
                    .application_arn(destination.application_arn.clone())
                    .build(),
            )
            .build();

        run_blocking(async move {
            client
                .create_configuration_set_event_destination()
                .configuration_set_name(configuration_set_name)
                .event_destination_name(destination_name)
                .event_destination(definition)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| {
            format!(
                "failed to create event destination on {configuration_set}: {}",
                aws_sdk_sesv2::error::DisplayErrorContext(&error)
            )
        })
    }
}
