//! Environment configuration for the three hooks.
//!
//! Every loader takes a lookup function so tests can supply a map instead of
//! the process environment. Blank values count as unset.

use std::str::FromStr;
use std::time::Duration;

use event_db_core::polling::PollPolicy;
use event_db_core::query::configuration_set_names;

use crate::error::HookError;

pub const METRICS_ENDPOINT: &str = "https://metrics.awssolutionsbuilder.com/generic";
pub const TABLE_QUERY_VAR: &str = "ALL_EVENT_TABLE";
pub const VIEW_QUERY_VARS: [&str; 15] = [
    "SEND_NQ",
    "HARD_BOUNCE_NQ",
    "SOFT_BOUNCE_NQ",
    "COMPLAINT_NQ",
    "DELIVERY_NQ",
    "OPEN_NQ",
    "CLICK_NQ",
    "UNSUB_NQ",
    "REJECT_NQ",
    "SMS_BUFF_NQ",
    "SMS_SUCCESS_NQ",
    "SMS_FAILURE_NQ",
    "SMS_OPTOUT_NQ",
    "CAMPAIGN_SEND_NQ",
    "JOURNEY_SEND_NQ",
];

pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn optional(lookup: EnvLookup<'_>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(lookup: EnvLookup<'_>, key: &str) -> Result<String, HookError> {
    optional(lookup, key).ok_or_else(|| HookError::Configuration(format!("{key} must be configured")))
}

fn parsed<T: FromStr>(lookup: EnvLookup<'_>, key: &str) -> Result<Option<T>, HookError> {
    optional(lookup, key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| HookError::Configuration(format!("{key} has invalid value '{raw}'")))
        })
        .transpose()
}

fn flag(lookup: EnvLookup<'_>, key: &str) -> bool {
    optional(lookup, key)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "1"))
        .unwrap_or(false)
}

pub fn log_stream_name(lookup: EnvLookup<'_>) -> String {
    optional(lookup, "AWS_LAMBDA_LOG_STREAM_NAME").unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub solution_id: Option<String>,
    pub solution_uuid: Option<String>,
    pub endpoint: String,
}

impl MetricsConfig {
    /// Only the literal `YES` (any case) opts in.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            enabled: optional(lookup, "SEND_ANONYMOUS_DATA")
                .is_some_and(|value| value.eq_ignore_ascii_case("yes")),
            solution_id: optional(lookup, "SOLUTION_ID"),
            solution_uuid: optional(lookup, "SOLUTION_UUID"),
            endpoint: METRICS_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionConfig {
    pub database: String,
    pub metrics: MetricsConfig,
}

impl PartitionConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, HookError> {
        Ok(Self {
            database: required(lookup, "DATABASE_NAME")?,
            metrics: MetricsConfig::from_lookup(lookup),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
    pub region: Option<String>,
}

impl ProvisionerConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            region: optional(lookup, "AWS_REGION"),
        }
    }

    pub fn require_region(&self) -> Result<&str, HookError> {
        self.region
            .as_deref()
            .ok_or_else(|| HookError::Configuration("AWS_REGION must be configured".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetupConfig {
    pub data_bucket: String,
    pub table_query_id: String,
    pub view_query_ids: Vec<String>,
    pub configuration_sets: Vec<String>,
    pub pinpoint_project_arn: Option<String>,
    pub poll_policy: PollPolicy,
    pub strict_query_status: bool,
}

impl SetupConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, HookError> {
        let view_query_ids = VIEW_QUERY_VARS
            .iter()
            .map(|key| required(lookup, key))
            .collect::<Result<Vec<_>, _>>()?;

        let configuration_sets =
            configuration_set_names(&optional(lookup, "EXISTING_CS").unwrap_or_default());
        let pinpoint_project_arn = optional(lookup, "PINPOINT_PROJECT_ARN");
        if !configuration_sets.is_empty() && pinpoint_project_arn.is_none() {
            return Err(HookError::Configuration(
                "PINPOINT_PROJECT_ARN must be configured when EXISTING_CS is set".to_string(),
            ));
        }

        Ok(Self {
            data_bucket: required(lookup, "S3_DATA_BUCKET")?,
            table_query_id: required(lookup, TABLE_QUERY_VAR)?,
            view_query_ids,
            configuration_sets,
            pinpoint_project_arn,
            poll_policy: poll_policy_from_lookup(lookup)?,
            strict_query_status: flag(lookup, "STRICT_QUERY_STATUS"),
        })
    }

    pub fn output_location(&self) -> String {
        format!("s3://{}/temp/", self.data_bucket)
    }
}

pub fn poll_policy_from_lookup(lookup: EnvLookup<'_>) -> Result<PollPolicy, HookError> {
    let defaults = PollPolicy::default();
    let initial_interval = parsed::<u64>(lookup, "QUERY_POLL_INTERVAL_SECS")?
        .map(Duration::from_secs)
        .unwrap_or(defaults.initial_interval);
    let max_interval = parsed::<u64>(lookup, "QUERY_POLL_MAX_INTERVAL_SECS")?
        .map(Duration::from_secs)
        .unwrap_or(defaults.max_interval)
        .max(initial_interval);
    let max_wait = match parsed::<u64>(lookup, "QUERY_POLL_MAX_WAIT_SECS")? {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => defaults.max_wait,
    };

    let policy = PollPolicy {
        initial_interval,
        backoff_multiplier: parsed::<f64>(lookup, "QUERY_POLL_BACKOFF")?
            .unwrap_or(defaults.backoff_multiplier),
        max_interval,
        max_attempts: parsed::<u32>(lookup, "QUERY_POLL_MAX_ATTEMPTS")?,
        max_wait,
    };
    policy
        .validate()
        .map_err(|error| HookError::Configuration(error.message().to_string()))?;
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn setup_pairs() -> Vec<(&'static str, &'static str)> {
        let mut pairs = vec![
            ("S3_DATA_BUCKET", "data-bucket"),
            ("ALL_EVENT_TABLE", "nq-table"),
            ("EXISTING_CS", "cs-a,,cs-b"),
            ("PINPOINT_PROJECT_ARN", "arn:aws:mobiletargeting:us-east-1:1:apps/p"),
        ];
        pairs.extend(VIEW_QUERY_VARS.iter().map(|key| (*key, "nq-view")));
        pairs
    }

    #[test]
    fn partition_config_requires_database() {
        let lookup = lookup_from(&[("DATABASE_NAME", "  ")]);
        let error = PartitionConfig::from_lookup(&lookup).expect_err("blank database should fail");
        assert_eq!(error.kind(), "configuration");
    }

    #[test]
    fn metrics_opt_in_is_case_insensitive_yes() {
        let enabled = lookup_from(&[("SEND_ANONYMOUS_DATA", "yes"), ("SOLUTION_ID", "SO1")]);
        let config = MetricsConfig::from_lookup(&enabled);
        assert!(config.enabled);
        assert_eq!(config.solution_id.as_deref(), Some("SO1"));

        let disabled = lookup_from(&[("SEND_ANONYMOUS_DATA", "true")]);
        assert!(!MetricsConfig::from_lookup(&disabled).enabled);
    }

    #[test]
    fn setup_config_reads_all_named_queries() {
        let lookup = lookup_from(&setup_pairs());
        let config = SetupConfig::from_lookup(&lookup).expect("config should load");

        assert_eq!(config.table_query_id, "nq-table");
        assert_eq!(config.view_query_ids.len(), 15);
        assert_eq!(config.configuration_sets, vec!["cs-a", "cs-b"]);
        assert_eq!(config.output_location(), "s3://data-bucket/temp/");
        assert_eq!(config.poll_policy, PollPolicy::default());
        assert!(!config.strict_query_status);
    }

    #[test]
    fn setup_config_reports_missing_named_query() {
        let pairs: Vec<_> = setup_pairs()
            .into_iter()
            .filter(|(key, _)| *key != "OPEN_NQ")
            .collect();
        let lookup = lookup_from(&pairs);
        let error = SetupConfig::from_lookup(&lookup).expect_err("missing query should fail");
        assert!(error.to_string().contains("OPEN_NQ"));
    }

    #[test]
    fn pinpoint_arn_is_only_needed_with_configuration_sets() {
        let mut pairs: Vec<_> = setup_pairs()
            .into_iter()
            .filter(|(key, _)| *key != "PINPOINT_PROJECT_ARN")
            .collect();
        assert!(SetupConfig::from_lookup(&lookup_from(&pairs)).is_err());

        pairs.retain(|(key, _)| *key != "EXISTING_CS");
        let config = SetupConfig::from_lookup(&lookup_from(&pairs)).expect("config should load");
        assert!(config.configuration_sets.is_empty());
    }

    #[test]
    fn poll_policy_overrides() {
        let lookup = lookup_from(&[
            ("QUERY_POLL_INTERVAL_SECS", "1"),
            ("QUERY_POLL_BACKOFF", "2"),
            ("QUERY_POLL_MAX_INTERVAL_SECS", "8"),
            ("QUERY_POLL_MAX_ATTEMPTS", "20"),
            ("QUERY_POLL_MAX_WAIT_SECS", "0"),
        ]);
        let policy = poll_policy_from_lookup(&lookup).expect("policy should load");

        assert_eq!(policy.initial_interval, Duration::from_secs(1));
        assert_eq!(policy.backoff_multiplier, 2.0);
        assert_eq!(policy.max_interval, Duration::from_secs(8));
        assert_eq!(policy.max_attempts, Some(20));
        assert_eq!(policy.max_wait, None);
    }

    #[test]
    fn poll_policy_rejects_garbage() {
        let lookup = lookup_from(&[("QUERY_POLL_INTERVAL_SECS", "soon")]);
        let error = poll_policy_from_lookup(&lookup).expect_err("garbage should fail");
        assert!(error.to_string().contains("QUERY_POLL_INTERVAL_SECS"));

        let lookup = lookup_from(&[("QUERY_POLL_BACKOFF", "0.5")]);
        assert!(poll_policy_from_lookup(&lookup).is_err());
    }

    #[test]
    fn strict_flag_accepts_common_truthy_values() {
        let mut pairs = setup_pairs();
        pairs.push(("STRICT_QUERY_STATUS", "Yes"));
        let config = SetupConfig::from_lookup(&lookup_from(&pairs)).expect("config should load");
        assert!(config.strict_query_status);
    }
}
