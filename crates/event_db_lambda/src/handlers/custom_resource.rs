use event_db_core::contract::{
    failure_data, CallbackResponse, CallbackStatus, CustomResourceEvent,
    ERROR_PHYSICAL_RESOURCE_ID, MISSING_ACTION_MESSAGE, SEE_LOGS_MESSAGE,
};
use serde_json::{json, Value};

use crate::adapters::callback::ProvisioningCallback;
use crate::error::HookError;
use crate::telemetry::{log_debug, log_error, log_hook_error, log_info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
    pub log_stream_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceOutcome {
    pub data: Value,
    pub physical_resource_id: String,
}

/// Decodes the invocation payload. A payload that does not decode but still
/// names a `ResponseURL` is answered with FAILED before the error is returned.
pub fn decode_event(
    component: &str,
    payload: Value,
    context: &InvocationContext,
    callback: &dyn ProvisioningCallback,
) -> Result<CustomResourceEvent, HookError> {
    let error = match serde_json::from_value::<CustomResourceEvent>(payload.clone()) {
        Ok(event) => return Ok(event),
        Err(error) => HookError::Validation(format!("invalid custom resource event: {error}")),
    };
    log_hook_error(component, "event_rejected", &error);

    if let Some(response) = CallbackResponse::failed_for_payload(
        &payload,
        failure_data(SEE_LOGS_MESSAGE),
        ERROR_PHYSICAL_RESOURCE_ID,
        &context.log_stream_name,
    ) {
        send_response(component, context, &response, callback);
    }
    Err(error)
}

pub fn missing_action(event: &CustomResourceEvent) -> HookError {
    HookError::MissingAction(event.action_tag().unwrap_or("<none>").to_string())
}

pub fn log_event_received(component: &str, event: &CustomResourceEvent, context: &InvocationContext) {
    log_debug(
        component,
        "event_received",
        json!({
            "request_id": context.request_id.clone(),
            "request_type": event.request_type,
            "stack_id": event.stack_id.clone(),
            "logical_resource_id": event.logical_resource_id.clone(),
            "resource_properties": event.resource_properties.clone(),
        }),
    );
}

/// Turns the handler outcome into the one-shot response for the provisioning
/// system and sends it. Error detail stays in the logs.
pub fn respond(
    component: &str,
    event: &CustomResourceEvent,
    context: &InvocationContext,
    outcome: Result<ResourceOutcome, HookError>,
    callback: &dyn ProvisioningCallback,
) -> CallbackResponse {
    let response = match outcome {
        Ok(outcome) => {
            log_info(
                component,
                "resource_succeeded",
                json!({
                    "request_id": context.request_id.clone(),
                    "physical_resource_id": outcome.physical_resource_id.clone(),
                }),
            );
            CallbackResponse::for_event(
                event,
                CallbackStatus::Success,
                outcome.data,
                Some(&outcome.physical_resource_id),
                &context.log_stream_name,
            )
        }
        Err(HookError::MissingAction(tag)) => {
            log_error(
                component,
                "missing_action",
                json!({
                    "request_id": context.request_id.clone(),
                    "action": tag,
                    "message": "Missing CustomResourceAction - no action to perform",
                }),
            );
            failed_response(event, context, MISSING_ACTION_MESSAGE)
        }
        Err(error) => {
            log_hook_error(component, "handler_failed", &error);
            failed_response(event, context, SEE_LOGS_MESSAGE)
        }
    };

    send_response(component, context, &response, callback);
    response
}

/// Failures are logged only; the response is not retried.
fn send_response(
    component: &str,
    context: &InvocationContext,
    response: &CallbackResponse,
    callback: &dyn ProvisioningCallback,
) {
    if let Err(error) = callback.send(response) {
        log_error(
            component,
            "callback_failed",
            json!({
                "request_id": context.request_id.clone(),
                "status": response.status,
                "error": error,
            }),
        );
    }
}

fn failed_response(
    event: &CustomResourceEvent,
    context: &InvocationContext,
    message: &str,
) -> CallbackResponse {
    CallbackResponse::for_event(
        event,
        CallbackStatus::Failed,
        failure_data(message),
        Some(ERROR_PHYSICAL_RESOURCE_ID),
        &context.log_stream_name,
    )
}
