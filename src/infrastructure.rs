//! Infrastructure layer - configuration, logging, and durable storage.

pub mod config;
pub mod logging;
pub mod storage;

pub use config::{ConfigError, SessionConfig};
pub use storage::StorageError;
