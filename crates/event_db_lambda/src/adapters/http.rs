use event_db_core::contract::{stable_contract_json, CallbackResponse, UsageMetrics};
use reqwest::header::CONTENT_TYPE;
use serde_json::json;

use super::callback::ProvisioningCallback;
use super::metrics::UsageReporter;
use super::run_blocking;
use crate::telemetry::log_debug;

/// Custom resource responses go to a presigned URL, which rejects any
/// content type it was not signed with, so the header is sent empty.
#[derive(Clone, Default)]
pub struct HttpProvisioningCallback {
    client: reqwest::Client,
}

impl HttpProvisioningCallback {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ProvisioningCallback for HttpProvisioningCallback {
    fn send(&self, response: &CallbackResponse) -> Result<(), String> {
        let client = self.client.clone();
        let url = response.response_url.clone();
        let body = stable_contract_json(response);

        run_blocking(async move {
            client
                .put(url)
                .header(CONTENT_TYPE, "")
                .body(body)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map(|_| ())
                .map_err(|error| format!("failed to send custom resource response: {error}"))
        })
    }
}

#[derive(Clone, Default)]
pub struct HttpUsageReporter {
    client: reqwest::Client,
}

impl HttpUsageReporter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl UsageReporter for HttpUsageReporter {
    fn report(&self, endpoint: &str, metrics: &UsageMetrics) -> Result<(), String> {
        let client = self.client.clone();
        let url = endpoint.to_string();
        let payload = metrics.clone();

        run_blocking(async move {
            let response = client
                .post(url)
                .header(CONTENT_TYPE, "application/json; charset=utf-8")
                .json(&payload)
                .send()
                .await
                .map_err(|error| format!("failed to post usage metrics: {error}"))?;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log_debug(
                "usage_reporter",
                "metrics_response",
                json!({ "status": status.as_u16(), "body": body }),
            );
            Ok(())
        })
    }
}
