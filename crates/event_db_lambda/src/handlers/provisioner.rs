use event_db_core::contract::{CallbackResponse, CustomResourceAction, CustomResourceEvent};
use event_db_core::naming::{bucket_name, generate_uuid};
use serde_json::{json, Value};

use crate::adapters::callback::ProvisioningCallback;
use crate::config::ProvisionerConfig;
use crate::error::HookError;
use crate::handlers::custom_resource::{
    decode_event, log_event_received, missing_action, respond, InvocationContext,
    ResourceOutcome,
};
use crate::telemetry::log_debug;

const COMPONENT: &str = "identifier_provisioner";

pub fn provision_identifier(
    event: &CustomResourceEvent,
    config: &ProvisionerConfig,
) -> Result<ResourceOutcome, HookError> {
    match event.action() {
        Some(CustomResourceAction::GenerateUuid) => {
            let id = generate_uuid();
            log_debug(COMPONENT, "uuid_generated", json!({ "uuid": id.clone() }));
            Ok(ResourceOutcome {
                data: json!({ "UUID": id }),
                physical_resource_id: CustomResourceAction::GenerateUuid.as_str().to_string(),
            })
        }
        Some(CustomResourceAction::CreateBucket) => {
            let name = bucket_name(config.require_region()?);
            log_debug(COMPONENT, "bucket_name_generated", json!({ "bucket_name": name.clone() }));
            Ok(ResourceOutcome {
                data: json!({ "BucketName": name.clone() }),
                physical_resource_id: name,
            })
        }
        _ => Err(missing_action(event)),
    }
}

pub fn handle_identifier_event(
    event: &CustomResourceEvent,
    context: &InvocationContext,
    config: &ProvisionerConfig,
    callback: &dyn ProvisioningCallback,
) -> CallbackResponse {
    log_event_received(COMPONENT, event, context);
    let outcome = provision_identifier(event, config);
    respond(COMPONENT, event, context, outcome, callback)
}

/// Entry point for the raw invocation payload.
pub fn handle_identifier_payload(
    payload: Value,
    context: &InvocationContext,
    config: &ProvisionerConfig,
    callback: &dyn ProvisioningCallback,
) -> Result<CallbackResponse, HookError> {
    let event = decode_event(COMPONENT, payload, context, callback)?;
    Ok(handle_identifier_event(&event, context, config, callback))
}
