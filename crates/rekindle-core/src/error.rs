//! Error taxonomy shared across Rekindle crates.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RekindleError>;

#[derive(Debug, Error)]
pub enum RekindleError {
    /// Validation failure on an input schedule record. Surfaced synchronously
    /// to the caller; nothing gets registered.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// A fire-time handler could not find or decode a required payload field.
    /// Fails that single invocation; the registration is untouched.
    #[error("missing payload field: {0}")]
    MissingPayload(String),

    /// The dispatch sink could not complete a delivery. Never treated as a
    /// scheduling defect and never retried by the core.
    #[error("dispatch unavailable: {0}")]
    DispatchUnavailable(String),

    /// Job table persistence failure.
    #[error("store error: {0}")]
    Store(String),

    /// Configuration load or parse failure.
    #[error("config error: {0}")]
    Config(String),
}
