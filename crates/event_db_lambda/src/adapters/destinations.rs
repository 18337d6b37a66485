use event_db_core::query::EventDestinationSpec;

pub trait EventDestinationConfigurator {
    fn create_event_destination(
        &self,
        configuration_set: &str,
        destination: &EventDestinationSpec,
    ) -> Result<(), String>;
}
