//! # One-shot protected execution.
//!
//! Fire-and-forget helpers for running a job exactly once behind the
//! isolation boundary: no restart, no handle, no return value.

use std::sync::Arc;

use crate::core::runner::protect;
use crate::jobs::{Job, JobRef};
use crate::sink::ErrorSink;

/// Runs `job` once on the caller's task; a panic is recovered and reported
/// to `sink` instead of unwinding into the caller.
pub async fn run_isolated(sink: &dyn ErrorSink, job: &dyn Job) {
    protect(sink, job).await;
}

/// Runs `job` once on a newly spawned task; a panic is recovered and
/// reported to `sink`. Returns immediately, before the job starts.
pub fn spawn_isolated(sink: Arc<dyn ErrorSink>, job: JobRef) {
    tokio::spawn(async move {
        protect(sink.as_ref(), job.as_ref()).await;
    });
}
