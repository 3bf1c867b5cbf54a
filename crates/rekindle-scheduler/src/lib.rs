//! # Rekindle Scheduler
//!
//! The recurring-delivery scheduling core: computes the next eligible fire
//! time inside a contact's daily delivery window, registers uniquely-keyed
//! periodic jobs so a re-saved configuration replaces its prior schedule
//! instead of duplicating it, and selects message text per
//! (language, intent) at fire time.
//!
//! The core holds no polling loop and no background thread of its own —
//! timers belong to the [`rekindle_core::JobRunner`], and firing is
//! callback-driven through [`rekindle_core::FireHandler`]. A tokio-backed
//! runner with a SQLite job table ships here for hosts that want one.

pub mod delay;
pub mod registrar;
pub mod runner;
pub mod store;
pub mod templates;
pub mod worker;

pub use registrar::{ScheduleRegistrar, job_key};
pub use runner::TokioJobRunner;
pub use store::{JobRow, JobTable};
pub use worker::MessageWorker;
