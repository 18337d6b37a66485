pub mod custom_resource;
pub mod partition;
pub mod provisioner;
pub mod query_runner;
pub mod setup;
