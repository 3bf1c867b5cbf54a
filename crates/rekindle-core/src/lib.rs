//! # Rekindle Core
//!
//! Shared foundation for the Rekindle recurring-message scheduler:
//! the validated [`ScheduleSpec`] data model, the fire-time [`JobPayload`]
//! codec, the capability traits the scheduling core consumes
//! ([`JobRunner`], [`FireHandler`], [`DispatchSink`]), the error taxonomy,
//! and TOML configuration.

pub mod config;
pub mod error;
pub mod payload;
pub mod traits;
pub mod types;

pub use config::RekindleConfig;
pub use error::{RekindleError, Result};
pub use payload::JobPayload;
pub use traits::{DispatchSink, FireHandler, JobRunner, ReplacePolicy};
pub use types::{Language, MessageIntent, ScheduleSpec};
