//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling and the HTTP error envelope
//! - The success response envelope
//! - Configuration sections
//! - Tracing initialisation

pub mod config;
pub mod error;
pub mod response;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use response::ApiResponse;
pub use telemetry::init_tracing;
