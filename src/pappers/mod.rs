pub mod client;
pub mod models;

// Re-export commonly used types
pub use client::{PappersClient, RegistryClient, RegistryError};
pub use models::Representative;
