//! store-core — StoreGrid core types and configuration.

pub mod config;
pub mod types;

pub use config::ProvisionConfig;
pub use types::{StoreId, StoreRecord, StoreStatus};
