use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use event_db_core::polling::PollPolicy;
use event_db_core::query::{QueryRequest, QueryState};
use serde_json::json;

use crate::adapters::clock::Clock;
use crate::adapters::query_service::QueryService;
use crate::error::HookError;
use crate::telemetry::{log_debug, log_warn};

const COMPONENT: &str = "query_runner";

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRunOptions {
    pub output_location: String,
    pub policy: PollPolicy,
    /// Abort on the first query that ends in any state other than `SUCCEEDED`.
    pub strict: bool,
    /// Start of the whole run. `policy.max_wait` is measured from here, so
    /// it bounds every query of the run together.
    pub started_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalState {
    pub state: QueryState,
    pub polls: u32,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub name: String,
    pub job_id: String,
    pub state: QueryState,
    pub polls: u32,
}

/// Resolves `ids` in one lookup, then runs each query to a terminal state,
/// one at a time, in the order the service returned them.
pub fn execute_named_queries(
    ids: &[String],
    queries: &dyn QueryService,
    clock: &dyn Clock,
    cancel: &AtomicBool,
    options: &QueryRunOptions,
) -> Result<Vec<QueryOutcome>, HookError> {
    let batch = queries
        .batch_get_named_queries(ids)
        .map_err(|error| HookError::remote("batch_get_named_query", error))?;

    if !batch.unprocessed_ids.is_empty() {
        log_warn(
            COMPONENT,
            "named_queries_unresolved",
            json!({ "ids": batch.unprocessed_ids }),
        );
    }

    let mut outcomes = Vec::with_capacity(batch.queries.len());
    for query in batch.queries {
        let job_id = queries
            .start_query_execution(&QueryRequest {
                query_string: query.query_string.clone(),
                database: query.database.clone(),
                output_location: options.output_location.clone(),
            })
            .map_err(|error| HookError::remote("start_query_execution", error))?;
        log_debug(
            COMPONENT,
            "query_started",
            json!({ "name": query.name.clone(), "job_id": job_id.clone() }),
        );

        let terminal = wait_for_terminal_state(
            queries,
            clock,
            cancel,
            &job_id,
            &options.policy,
            options.started_at,
        )?;
        log_debug(
            COMPONENT,
            "query_finished",
            json!({
                "name": query.name.clone(),
                "job_id": job_id.clone(),
                "state": terminal.state.as_str(),
                "polls": terminal.polls,
                "elapsed_ms": terminal.elapsed.as_millis(),
            }),
        );

        if !terminal.state.is_success() {
            if options.strict {
                return Err(HookError::QueryFailed {
                    name: query.name,
                    state: terminal.state.to_string(),
                });
            }
            log_warn(
                COMPONENT,
                "query_not_succeeded",
                json!({
                    "name": query.name.clone(),
                    "job_id": job_id.clone(),
                    "state": terminal.state.as_str(),
                }),
            );
        }

        outcomes.push(QueryOutcome {
            name: query.name,
            job_id,
            state: terminal.state,
            polls: terminal.polls,
        });
    }

    Ok(outcomes)
}

/// Sleeps, then polls, until the job leaves `QUEUED`/`RUNNING`.
///
/// Attempts count per job; `max_wait` counts from `budget_started_at`. The
/// sleep wakes on `cancel`, and a raised flag ends the wait without another
/// poll. With an unbounded policy the only exit for a stuck job is `cancel`.
pub fn wait_for_terminal_state(
    queries: &dyn QueryService,
    clock: &dyn Clock,
    cancel: &AtomicBool,
    job_id: &str,
    policy: &PollPolicy,
    budget_started_at: Instant,
) -> Result<TerminalState, HookError> {
    let started_at = clock.now();
    let mut polls = 0u32;

    loop {
        if cancel.load(Ordering::SeqCst) {
            return Err(cancelled(job_id));
        }
        clock.sleep(policy.delay_for_attempt(polls), cancel);
        if cancel.load(Ordering::SeqCst) {
            return Err(cancelled(job_id));
        }

        let state = queries
            .query_state(job_id)
            .map_err(|error| HookError::remote("get_query_execution", error))?;
        polls = polls.saturating_add(1);
        let now = clock.now();

        if state.is_terminal() {
            return Ok(TerminalState {
                state,
                polls,
                elapsed: now.saturating_duration_since(started_at),
            });
        }

        let budget_elapsed = now.saturating_duration_since(budget_started_at);
        if policy.limit_reached(polls, budget_elapsed).is_some() {
            return Err(HookError::Timeout {
                job_id: job_id.to_string(),
                state: state.to_string(),
                attempts: polls,
                elapsed_ms: budget_elapsed.as_millis(),
            });
        }
    }
}

fn cancelled(job_id: &str) -> HookError {
    HookError::Cancelled {
        job_id: job_id.to_string(),
    }
}
