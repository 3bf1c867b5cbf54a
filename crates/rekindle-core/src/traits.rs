//! Capability seams — the external collaborators the scheduling core
//! depends on. Each is an injected trait object so hosts and tests can
//! substitute their own job substrate and delivery channel.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::Result;

/// What to do when a job with the same key is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacePolicy {
    /// Supersede the existing registration. Only future firings change; an
    /// in-flight invocation runs to completion.
    Replace,
    /// Leave the existing registration untouched.
    Keep,
}

/// The job execution substrate: a named periodic timer table that persists
/// across restarts. At most one live job per key at any time.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Register a periodic job under `key`, firing after `initial_delay` and
    /// then every `interval`, carrying `payload` to each firing.
    async fn enqueue_unique_periodic(
        &self,
        key: &str,
        initial_delay: Duration,
        interval: Duration,
        payload: Value,
        policy: ReplacePolicy,
    ) -> Result<()>;

    /// Cancel the job registered under `key`. Unknown keys are a no-op.
    async fn cancel_by_key(&self, key: &str) -> Result<()>;
}

/// Firing callback contract: the job runner invokes this with the stored
/// payload each time a job comes due. An `Err` fails that invocation only;
/// the recurring registration is never cancelled or duplicated by a failed
/// firing.
#[async_trait]
pub trait FireHandler: Send + Sync {
    async fn on_fire(&self, payload: &Value) -> Result<()>;
}

/// Outbound delivery. Fire-and-forget from the core's perspective — the
/// remote messaging app may still require manual confirmation, so the sink's
/// own outcome is never a scheduling failure.
#[async_trait]
pub trait DispatchSink: Send + Sync {
    async fn send(&self, phone: &str, text: &str) -> Result<()>;
}
