//! AWS-oriented adapters and handlers for the event database deployment hooks.
//!
//! Handlers are synchronous functions over the service traits in `adapters`;
//! the binaries build AWS and HTTP clients once per container and inject them.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;
