//! Shared event database domain primitives.
//!
//! This crate owns the deterministic pieces of the deployment hooks: trigger
//! and callback contracts, partition key parsing, generated names, the query
//! state model and the poll schedule. It intentionally excludes AWS SDK and
//! Lambda runtime concerns.

pub mod contract;
pub mod log_level;
pub mod naming;
pub mod partition;
pub mod polling;
pub mod query;
