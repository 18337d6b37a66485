pub mod aws;
pub mod callback;
pub mod clock;
pub mod destinations;
pub mod http;
pub mod metrics;
pub mod query_service;

use std::future::Future;

/// Drives an SDK future to completion from synchronous handler code.
///
/// Requires the multi-threaded tokio runtime the binaries start.
pub(crate) fn run_blocking<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
