use event_db_lambda::adapters::http::HttpProvisioningCallback;
use event_db_lambda::config::{log_stream_name, process_env, ProvisionerConfig};
use event_db_lambda::handlers::custom_resource::InvocationContext;
use event_db_lambda::handlers::provisioner::handle_identifier_payload;
use event_db_lambda::telemetry::init_logging_from_env;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};

async fn handle_request(
    event: LambdaEvent<Value>,
    callback: &HttpProvisioningCallback,
) -> Result<Value, Error> {
    let context = InvocationContext {
        request_id: event.context.request_id.clone(),
        log_stream_name: log_stream_name(&process_env),
    };
    let config = ProvisionerConfig::from_lookup(&process_env);

    let response = handle_identifier_payload(event.payload, &context, &config, callback)?;
    Ok(json!({ "status": response.status }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging_from_env();

    let callback = HttpProvisioningCallback::new(reqwest::Client::new());

    lambda_runtime::run(service_fn(|event| handle_request(event, &callback))).await
}
