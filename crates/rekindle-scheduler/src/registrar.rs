//! Idempotent schedule registration — at most one live job per contact.
//!
//! The registrar holds no state of its own; the per-key uniqueness guarantee
//! belongs to the [`JobRunner`], which is expected to replace atomically.

use chrono::{DateTime, Local, TimeZone};
use rand::Rng;

use rekindle_core::{JobPayload, JobRunner, ReplacePolicy, Result, ScheduleSpec};

use crate::delay;

const JOB_KEY_PREFIX: &str = "schedule_";

/// Stable job key for a contact. Re-saving a contact reuses the key, so the
/// runner replaces the prior registration instead of accumulating a second.
pub fn job_key(contact_id: &str) -> String {
    format!("{JOB_KEY_PREFIX}{contact_id}")
}

pub struct ScheduleRegistrar;

impl ScheduleRegistrar {
    /// Register (or replace) the recurring delivery described by `spec`.
    pub async fn register(spec: &ScheduleSpec, runner: &dyn JobRunner) -> Result<()> {
        let initial_delay = delay::initial_delay(spec, &Local::now(), &mut rand::thread_rng());
        Self::enqueue(spec, runner, initial_delay).await
    }

    /// Clock- and jitter-injected variant for deterministic callers.
    pub async fn register_at<Tz: TimeZone>(
        spec: &ScheduleSpec,
        runner: &dyn JobRunner,
        now: &DateTime<Tz>,
        rng: &mut impl Rng,
    ) -> Result<()> {
        let initial_delay = delay::initial_delay(spec, now, rng);
        Self::enqueue(spec, runner, initial_delay).await
    }

    async fn enqueue(
        spec: &ScheduleSpec,
        runner: &dyn JobRunner,
        initial_delay: std::time::Duration,
    ) -> Result<()> {
        let payload = JobPayload {
            phone: spec.contact_id.clone(),
            language: spec.language,
            intent: spec.intent,
        };
        tracing::info!(
            contact = %spec.contact_id,
            cadence_days = spec.cadence_days,
            delay_secs = initial_delay.as_secs(),
            "registering recurring delivery"
        );
        runner
            .enqueue_unique_periodic(
                &job_key(&spec.contact_id),
                initial_delay,
                spec.interval(),
                payload.encode(),
                ReplacePolicy::Replace,
            )
            .await
    }

    /// Stop future deliveries for a contact. Unknown contacts are a no-op.
    pub async fn cancel(contact_id: &str, runner: &dyn JobRunner) -> Result<()> {
        tracing::info!(contact = %contact_id, "cancelling recurring delivery");
        runner.cancel_by_key(&job_key(contact_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rekindle_core::{Language, MessageIntent};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeRunner {
        jobs: Mutex<HashMap<String, (Duration, Duration, Value)>>,
    }

    #[async_trait]
    impl JobRunner for FakeRunner {
        async fn enqueue_unique_periodic(
            &self,
            key: &str,
            initial_delay: Duration,
            interval: Duration,
            payload: Value,
            _policy: ReplacePolicy,
        ) -> Result<()> {
            self.jobs
                .lock()
                .unwrap()
                .insert(key.to_string(), (initial_delay, interval, payload));
            Ok(())
        }

        async fn cancel_by_key(&self, key: &str) -> Result<()> {
            self.jobs.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn spec(cadence_days: u32, language: Language) -> ScheduleSpec {
        ScheduleSpec::new(
            "15551234567",
            None,
            language,
            cadence_days,
            8,
            9,
            MessageIntent::Morning,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn registers_under_prefixed_key() {
        let runner = FakeRunner::default();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0).unwrap();
        ScheduleRegistrar::register_at(
            &spec(1, Language::English),
            &runner,
            &now,
            &mut StdRng::seed_from_u64(1),
        )
        .await
        .unwrap();

        let jobs = runner.jobs.lock().unwrap();
        let (delay, interval, payload) = &jobs["schedule_15551234567"];
        assert_eq!(*interval, Duration::from_secs(86_400));
        assert!(*delay >= Duration::from_secs(3_600));
        assert_eq!(payload["phone"], "15551234567");
        assert_eq!(payload["language"], "english");
    }

    #[tokio::test]
    async fn resave_replaces_not_duplicates() {
        let runner = FakeRunner::default();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        ScheduleRegistrar::register_at(&spec(1, Language::English), &runner, &now, &mut rng)
            .await
            .unwrap();
        ScheduleRegistrar::register_at(&spec(7, Language::French), &runner, &now, &mut rng)
            .await
            .unwrap();

        let jobs = runner.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        let (_, interval, payload) = &jobs["schedule_15551234567"];
        // The second spec wins: weekly interval, French payload.
        assert_eq!(*interval, Duration::from_secs(7 * 86_400));
        assert_eq!(payload["language"], "french");
    }

    #[tokio::test]
    async fn cancel_unknown_contact_is_noop() {
        let runner = FakeRunner::default();
        ScheduleRegistrar::cancel("19990000000", &runner).await.unwrap();
        assert!(runner.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_removes_registration() {
        let runner = FakeRunner::default();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0).unwrap();
        ScheduleRegistrar::register_at(
            &spec(1, Language::English),
            &runner,
            &now,
            &mut StdRng::seed_from_u64(3),
        )
        .await
        .unwrap();
        ScheduleRegistrar::cancel("15551234567", &runner).await.unwrap();
        assert!(runner.jobs.lock().unwrap().is_empty());
    }
}
