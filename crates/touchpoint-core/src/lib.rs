//! Core utilities and types shared across all Touchpoint crates

pub mod error;
pub mod error_builder;
pub mod plugin;
pub mod problemdetails;
pub use problemdetails::ProblemDetails;
pub mod types;

// Re-export commonly used types
pub use error::*;
pub use error_builder::*;

// Re-export external dependencies
pub use anyhow;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tracing;
pub use uuid;
pub use types::*;

// Re-export standard datetime type for use across all crates
pub use types::UtcDateTime;
