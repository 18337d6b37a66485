use chrono::Utc;
use event_db_core::contract::{PartitionHandlerResponse, StorageNotification, UsageMetrics};
use event_db_core::partition::PartitionDescriptor;
use event_db_core::query::QueryRequest;
use serde_json::{json, Value};

use crate::adapters::metrics::UsageReporter;
use crate::adapters::query_service::QueryService;
use crate::config::{MetricsConfig, PartitionConfig};
use crate::error::HookError;
use crate::telemetry::{log_debug, log_error, log_hook_error, log_info};

const COMPONENT: &str = "partition_registrator";

/// Submits one `ADD IF NOT EXISTS PARTITION` query per record without waiting
/// for it. Every key is parsed before the first submission.
pub fn register_partitions(
    event: &Value,
    config: &PartitionConfig,
    queries: &dyn QueryService,
) -> Result<usize, HookError> {
    let notification: StorageNotification = serde_json::from_value(event.clone())
        .map_err(|error| HookError::Validation(format!("malformed storage notification: {error}")))?;

    let descriptors = notification
        .records
        .iter()
        .map(|record| PartitionDescriptor::from_object(&record.s3.bucket.name, &record.s3.object.key))
        .collect::<Result<Vec<_>, _>>()?;

    for descriptor in &descriptors {
        let request = QueryRequest {
            query_string: descriptor.add_partition_statement(),
            database: config.database.clone(),
            output_location: descriptor.output_location(),
        };
        log_debug(
            COMPONENT,
            "partition_query",
            json!({ "query": request.query_string.clone() }),
        );

        let job_id = queries
            .start_query_execution(&request)
            .map_err(|error| HookError::remote("start_query_execution", error))?;
        log_debug(
            COMPONENT,
            "partition_query_submitted",
            json!({
                "job_id": job_id,
                "ingest_timestamp": descriptor.ingest_timestamp(),
                "location": descriptor.location(),
            }),
        );
    }

    Ok(descriptors.len())
}

pub fn handle_storage_event(
    event: &Value,
    config: Result<PartitionConfig, HookError>,
    queries: &dyn QueryService,
    reporter: &dyn UsageReporter,
) -> PartitionHandlerResponse {
    log_debug(COMPONENT, "event_received", event.clone());

    let outcome = config.and_then(|config| {
        let records = register_partitions(event, &config, queries)?;
        report_usage(&config.metrics, records, reporter);
        Ok(records)
    });

    match outcome {
        Ok(records) => {
            log_info(COMPONENT, "partitions_registered", json!({ "records": records }));
            PartitionHandlerResponse::success()
        }
        Err(error) => {
            log_hook_error(COMPONENT, "handler_failed", &error);
            PartitionHandlerResponse::error()
        }
    }
}

fn report_usage(metrics: &MetricsConfig, records: usize, reporter: &dyn UsageReporter) {
    if !metrics.enabled {
        log_info(
            COMPONENT,
            "metrics_disabled",
            json!({ "message": "Anonymous usage metrics collection disabled." }),
        );
        return;
    }

    let payload = UsageMetrics::partition_triggers(
        Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        records,
        metrics.solution_id.clone(),
        metrics.solution_uuid.clone(),
    );
    log_debug(COMPONENT, "metrics_sending", json!({ "payload": payload.clone() }));

    if let Err(error) = reporter.report(&metrics.endpoint, &payload) {
        log_error(COMPONENT, "metrics_failed", json!({ "error": error }));
    }
}
