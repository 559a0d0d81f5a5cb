mod hooks;
mod push;

pub use hooks::{create_billing_event_handlers, BILLING_EVENT_BUFFER_SIZE};
pub use push::PushGateway;
