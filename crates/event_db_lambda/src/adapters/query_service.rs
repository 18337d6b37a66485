use event_db_core::query::{NamedQueryBatch, QueryRequest, QueryState};

pub trait QueryService {
    fn batch_get_named_queries(&self, ids: &[String]) -> Result<NamedQueryBatch, String>;

    /// Returns the job id.
    fn start_query_execution(&self, request: &QueryRequest) -> Result<String, String>;

    fn query_state(&self, job_id: &str) -> Result<QueryState, String>;
}
