//! Provisioning run orchestration.

pub mod orchestrator;

pub use orchestrator::{run_step, Orchestrator, RunOptions, RunOutcome};
