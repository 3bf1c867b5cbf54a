//! Tokio-backed job runner — one timer task per key, firing invocations
//! spawned detached so replacing or cancelling a key stops future firings
//! without interrupting one already in flight. Zero work when idle: no
//! polling loop, just sleeping timers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use rekindle_core::{FireHandler, JobRunner, RekindleError, ReplacePolicy, Result};

use crate::store::JobTable;

pub struct TokioJobRunner {
    handler: Arc<dyn FireHandler>,
    /// One live timer task per key. The map lock is held across the whole
    /// enqueue/cancel, which is what makes replacement linearizable per key.
    jobs: Mutex<HashMap<String, JoinHandle<()>>>,
    table: Option<Arc<StdMutex<JobTable>>>,
}

impl TokioJobRunner {
    /// In-process runner with no persistence.
    pub fn new(handler: Arc<dyn FireHandler>) -> Self {
        Self {
            handler,
            jobs: Mutex::new(HashMap::new()),
            table: None,
        }
    }

    /// Persistence-backed runner: registrations survive restarts via
    /// [`rearm`](Self::rearm).
    pub fn with_table(handler: Arc<dyn FireHandler>, table: JobTable) -> Self {
        Self {
            handler,
            jobs: Mutex::new(HashMap::new()),
            table: Some(Arc::new(StdMutex::new(table))),
        }
    }

    /// Reload persisted registrations and schedule each with its remaining
    /// delay. Elapsed deadlines fire immediately (zero delay). Returns the
    /// number of live jobs afterwards.
    pub async fn rearm(&self) -> Result<usize> {
        let Some(table) = &self.table else {
            return Ok(0);
        };
        let rows = lock_table(table)?.load()?;
        let now = Utc::now();
        let mut jobs = self.jobs.lock().await;
        for row in rows {
            let remaining = (row.next_fire_at - now).to_std().unwrap_or_default();
            tracing::debug!(key = %row.key, delay_secs = remaining.as_secs(), "rearming job");
            let handle = spawn_timer(
                Arc::clone(&self.handler),
                self.table.clone(),
                row.key.clone(),
                row.payload,
                remaining,
                row.interval,
            );
            if let Some(old) = jobs.insert(row.key, handle) {
                old.abort();
            }
        }
        Ok(jobs.len())
    }

    /// Keys with a live timer.
    pub async fn active_keys(&self) -> Vec<String> {
        self.jobs.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl JobRunner for TokioJobRunner {
    async fn enqueue_unique_periodic(
        &self,
        key: &str,
        initial_delay: Duration,
        interval: Duration,
        payload: Value,
        policy: ReplacePolicy,
    ) -> Result<()> {
        let mut jobs = self.jobs.lock().await;
        if policy == ReplacePolicy::Keep && jobs.contains_key(key) {
            tracing::debug!(key = %key, "existing registration kept");
            return Ok(());
        }
        if let Some(table) = &self.table {
            let next = Utc::now() + to_delta(initial_delay);
            lock_table(table)?.upsert(key, &payload, interval, next)?;
        }
        let handle = spawn_timer(
            Arc::clone(&self.handler),
            self.table.clone(),
            key.to_string(),
            payload,
            initial_delay,
            interval,
        );
        if let Some(old) = jobs.insert(key.to_string(), handle) {
            // Supersede: the old timer stops, any in-flight firing it
            // already spawned runs to completion.
            old.abort();
            tracing::info!(key = %key, "replaced existing registration");
        } else {
            tracing::info!(key = %key, "registered new job");
        }
        Ok(())
    }

    async fn cancel_by_key(&self, key: &str) -> Result<()> {
        if let Some(handle) = self.jobs.lock().await.remove(key) {
            handle.abort();
            tracing::info!(key = %key, "cancelled job");
        }
        if let Some(table) = &self.table {
            lock_table(table)?.remove(key)?;
        }
        Ok(())
    }
}

fn lock_table(table: &Arc<StdMutex<JobTable>>) -> Result<std::sync::MutexGuard<'_, JobTable>> {
    table
        .lock()
        .map_err(|_| RekindleError::Store("job table lock poisoned".into()))
}

fn to_delta(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::zero())
}

fn spawn_timer(
    handler: Arc<dyn FireHandler>,
    table: Option<Arc<StdMutex<JobTable>>>,
    key: String,
    payload: Value,
    initial_delay: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(initial_delay).await;
        loop {
            let h = Arc::clone(&handler);
            let p = payload.clone();
            let k = key.clone();
            // Detached: aborting this timer never interrupts a firing.
            tokio::spawn(async move {
                if let Err(e) = h.on_fire(&p).await {
                    tracing::warn!(key = %k, "firing failed: {e}");
                }
            });
            if let Some(table) = &table {
                let next = Utc::now() + to_delta(interval);
                match table.lock() {
                    Ok(t) => {
                        if let Err(e) = t.advance(&key, next) {
                            tracing::warn!(key = %key, "job table advance failed: {e}");
                        }
                    }
                    Err(_) => tracing::warn!(key = %key, "job table lock poisoned"),
                }
            }
            tokio::time::sleep(interval).await;
        }
    })
}
