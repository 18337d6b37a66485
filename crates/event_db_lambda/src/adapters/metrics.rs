use event_db_core::contract::UsageMetrics;

pub trait UsageReporter {
    fn report(&self, endpoint: &str, metrics: &UsageMetrics) -> Result<(), String>;
}
