//! Console sink — logs deliveries instead of sending them. Used by dry runs
//! and as a harmless default when no channel is configured.

use async_trait::async_trait;

use rekindle_core::{DispatchSink, Result};

pub struct ConsoleSink;

#[async_trait]
impl DispatchSink for ConsoleSink {
    async fn send(&self, phone: &str, text: &str) -> Result<()> {
        tracing::info!(to = %phone, "[dry-run] {text}");
        Ok(())
    }
}
