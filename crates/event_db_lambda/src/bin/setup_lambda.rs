use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use event_db_lambda::adapters::aws::{AthenaQueryService, SesEventDestinations};
use event_db_lambda::adapters::clock::{spawn_deadline_watchdog, SystemClock};
use event_db_lambda::adapters::http::HttpProvisioningCallback;
use event_db_lambda::config::{log_stream_name, process_env, SetupConfig};
use event_db_lambda::handlers::custom_resource::InvocationContext;
use event_db_lambda::handlers::setup::{handle_setup_payload, SetupDependencies};
use event_db_lambda::telemetry::init_logging_from_env;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};

/// Leaves room to send the failure response before the runtime kills the
/// invocation.
const DEADLINE_MARGIN: Duration = Duration::from_secs(10);

struct RuntimeDependencies {
    queries: AthenaQueryService,
    destinations: SesEventDestinations,
    callback: HttpProvisioningCallback,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    runtime: &RuntimeDependencies,
) -> Result<Value, Error> {
    let context = InvocationContext {
        request_id: event.context.request_id.clone(),
        log_stream_name: log_stream_name(&process_env),
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let watchdog =
        spawn_deadline_watchdog(event.context.deadline, DEADLINE_MARGIN, Arc::clone(&cancel));

    let deps = SetupDependencies {
        queries: &runtime.queries,
        destinations: &runtime.destinations,
        clock: &SystemClock,
        cancel: &cancel,
    };
    let response = handle_setup_payload(
        event.payload,
        &context,
        SetupConfig::from_lookup(&process_env),
        &deps,
        &runtime.callback,
    );
    watchdog.abort();
    let response = response?;

    Ok(json!({ "status": response.status }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging_from_env();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let runtime = RuntimeDependencies {
        queries: AthenaQueryService::new(aws_sdk_athena::Client::new(&aws_config)),
        destinations: SesEventDestinations::new(aws_sdk_sesv2::Client::new(&aws_config)),
        callback: HttpProvisioningCallback::new(reqwest::Client::new()),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &runtime))).await
}
