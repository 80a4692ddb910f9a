pub mod dispatcher;

// Re-export commonly used types
pub use dispatcher::{DispatchHandle, WebhookDispatcher, WebhookPayload};
