use event_db_core::contract::CallbackResponse;

pub trait ProvisioningCallback {
    fn send(&self, response: &CallbackResponse) -> Result<(), String>;
}
