//! Asset Service
//!
//! Microservice for profile image ingestion and delivery.
//! Uploads are normalized to a fixed-width PNG and stored under a
//! deterministic per-identifier key in object storage; retrieval streams
//! the stored bytes back with suffix-derived content typing.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod storage;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
