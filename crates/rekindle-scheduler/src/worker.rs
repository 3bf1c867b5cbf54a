//! Fire-time handler — decodes the stored payload, picks a template, and
//! hands the result to the dispatch sink.

use async_trait::async_trait;
use serde_json::Value;

use rekindle_core::{DispatchSink, FireHandler, JobPayload, Result};

use crate::templates;

/// Turns each firing into one outbound message.
pub struct MessageWorker<S> {
    sink: S,
}

impl<S: DispatchSink> MessageWorker<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl<S: DispatchSink> FireHandler for MessageWorker<S> {
    async fn on_fire(&self, payload: &Value) -> Result<()> {
        // A bad payload fails this invocation only; the registration stays.
        let payload = JobPayload::decode(payload)?;
        let text = {
            let mut rng = rand::thread_rng();
            templates::select(payload.language, payload.intent, &mut rng)
        };
        tracing::info!(to = %payload.phone, "dispatching scheduled message");
        // Delivery is fire-and-forget: the target app may need manual
        // confirmation, so a sink failure is not a scheduling failure.
        if let Err(e) = self.sink.send(&payload.phone, text).await {
            tracing::warn!(to = %payload.phone, "dispatch failed: {e}");
        }
        Ok(())
    }
}
