//! Resumatch Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod config;
pub mod storage;
pub mod upload;

pub use adapters::{BroadcastSignals, ReqwestTransport, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use upload::{UploadError, file_part_from_path};
