use event_db_lambda::adapters::aws::AthenaQueryService;
use event_db_lambda::adapters::http::HttpUsageReporter;
use event_db_lambda::config::{process_env, PartitionConfig};
use event_db_lambda::handlers::partition::handle_storage_event;
use event_db_lambda::telemetry::init_logging_from_env;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

/// The hook returns the JSON document as a string, matching what the
/// notification trigger has always received.
async fn handle_request(
    event: LambdaEvent<Value>,
    queries: &AthenaQueryService,
    reporter: &HttpUsageReporter,
) -> Result<String, Error> {
    let config = PartitionConfig::from_lookup(&process_env);
    let response = handle_storage_event(&event.payload, config, queries, reporter);
    Ok(response.to_json_string())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging_from_env();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let queries = AthenaQueryService::new(aws_sdk_athena::Client::new(&aws_config));
    let reporter = HttpUsageReporter::new(reqwest::Client::new());

    lambda_runtime::run(service_fn(|event| {
        handle_request(event, &queries, &reporter)
    }))
    .await
}
