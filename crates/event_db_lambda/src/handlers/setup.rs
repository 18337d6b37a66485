use std::sync::atomic::AtomicBool;

use event_db_core::contract::{CallbackResponse, CustomResourceAction, CustomResourceEvent};
use event_db_core::query::EventDestinationSpec;
use serde_json::{json, Value};

use crate::adapters::callback::ProvisioningCallback;
use crate::adapters::clock::Clock;
use crate::adapters::destinations::EventDestinationConfigurator;
use crate::adapters::query_service::QueryService;
use crate::config::SetupConfig;
use crate::error::HookError;
use crate::handlers::custom_resource::{
    decode_event, log_event_received, missing_action, respond, InvocationContext,
    ResourceOutcome,
};
use crate::handlers::query_runner::{execute_named_queries, QueryRunOptions};
use crate::telemetry::{log_debug, log_info};

const COMPONENT: &str = "setup_runner";

pub struct SetupDependencies<'a> {
    pub queries: &'a dyn QueryService,
    pub destinations: &'a dyn EventDestinationConfigurator,
    pub clock: &'a dyn Clock,
    pub cancel: &'a AtomicBool,
}

/// Table query first, then the views that read from it, then event routing.
pub fn run_setup(
    config: &SetupConfig,
    deps: &SetupDependencies<'_>,
) -> Result<ResourceOutcome, HookError> {
    let options = QueryRunOptions {
        output_location: config.output_location(),
        policy: config.poll_policy.clone(),
        strict: config.strict_query_status,
        started_at: deps.clock.now(),
    };

    let batches = [
        std::slice::from_ref(&config.table_query_id),
        config.view_query_ids.as_slice(),
    ];
    for (index, ids) in batches.into_iter().enumerate() {
        let outcomes =
            execute_named_queries(ids, deps.queries, deps.clock, deps.cancel, &options)?;
        log_info(
            COMPONENT,
            "query_batch_finished",
            json!({
                "batch": index,
                "requested": ids.len(),
                "executed": outcomes.len(),
                "succeeded": outcomes.iter().filter(|outcome| outcome.state.is_success()).count(),
                "job_ids": outcomes.iter().map(|outcome| outcome.job_id.as_str()).collect::<Vec<_>>(),
            }),
        );
    }

    let configured = configure_event_destinations(
        &config.configuration_sets,
        config.pinpoint_project_arn.as_deref(),
        deps.destinations,
    )?;
    log_info(
        COMPONENT,
        "event_destinations_configured",
        json!({ "configuration_sets": configured }),
    );

    Ok(ResourceOutcome {
        data: json!({ "success": true }),
        physical_resource_id: CustomResourceAction::SetupSampleFiles.as_str().to_string(),
    })
}

/// Creates the event database destination on each configuration set, in
/// order. Names come from `configuration_set_names`, which drops blanks. The
/// first failure stops the rest.
pub fn configure_event_destinations(
    names: &[String],
    application_arn: Option<&str>,
    destinations: &dyn EventDestinationConfigurator,
) -> Result<usize, HookError> {
    if names.is_empty() {
        return Ok(0);
    }

    let application_arn = application_arn.ok_or_else(|| {
        HookError::Configuration("PINPOINT_PROJECT_ARN must be configured".to_string())
    })?;
    let destination = EventDestinationSpec::event_database(application_arn);

    for name in names {
        destinations
            .create_event_destination(name, &destination)
            .map_err(|error| HookError::remote("create_configuration_set_event_destination", error))?;
        log_debug(
            COMPONENT,
            "event_destination_created",
            json!({ "configuration_set": name, "destination": destination.name.clone() }),
        );
    }

    Ok(names.len())
}

pub fn handle_setup_event(
    event: &CustomResourceEvent,
    context: &InvocationContext,
    config: Result<SetupConfig, HookError>,
    deps: &SetupDependencies<'_>,
    callback: &dyn ProvisioningCallback,
) -> CallbackResponse {
    log_event_received(COMPONENT, event, context);

    let outcome = match event.action() {
        Some(CustomResourceAction::SetupSampleFiles) => {
            config.and_then(|config| run_setup(&config, deps))
        }
        _ => Err(missing_action(event)),
    };

    respond(COMPONENT, event, context, outcome, callback)
}

/// Entry point for the raw invocation payload.
pub fn handle_setup_payload(
    payload: Value,
    context: &InvocationContext,
    config: Result<SetupConfig, HookError>,
    deps: &SetupDependencies<'_>,
    callback: &dyn ProvisioningCallback,
) -> Result<CallbackResponse, HookError> {
    let event = decode_event(COMPONENT, payload, context, callback)?;
    Ok(handle_setup_event(&event, context, config, deps, callback))
}
