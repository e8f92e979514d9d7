//! # taskward
//!
//! **Taskward** provides supervised, persistent background tasks: async jobs
//! that, upon unexpected panics, are re-run until cancelled, plus the
//! coordination needed for a process to wait until all of its background
//! work has actually finished.
//!
//! Three layers, leaves first:
//!
//! 1. [`protect`] — the failure-isolation boundary. Invokes a job body once;
//!    a panic is recovered and delivered to an [`ErrorSink`] as a value,
//!    never propagating out of the call. [`run_isolated`]/[`spawn_isolated`]
//!    are the one-shot helpers on top of it.
//! 2. [`spawn_persistent`] — runs a job on its own task, re-invoking it
//!    through `protect` until a [`CancelContext`] fires. The returned
//!    [`PersistentHandle`] exposes a one-shot finished signal and a
//!    supervision acknowledgment.
//! 3. [`TreeSupervisor`] — aggregates [`ShutdownWaiter`]s (handles, nested
//!    trees) into one waitable unit for a parent component.
//!
//! ## Architecture
//! ```text
//!           caller
//!             │ spawn_persistent(ctx, name, sink, job)
//!             ▼
//!     ┌─────────────────────┐         ┌─────────────────────┐
//!     │  PersistentHandle   │  ...    │  PersistentHandle   │   (one per task)
//!     │  - finished signal  │         │  - finished signal  │
//!     │  - supervised gate  │         │  - supervised gate  │
//!     └──────────┬──────────┘         └──────────┬──────────┘
//!                │ supervise()                   │ supervise()
//!                ▼                               ▼
//!     ┌───────────────────────────────────────────────────────┐
//!     │  TreeSupervisor (itself a ShutdownWaiter; trees nest) │
//!     └──────────────────────────┬────────────────────────────┘
//!                                │ wait_until_shutdown(deadline)
//!                                ▼
//!                             parent
//!
//! per task:
//!   rendezvous(mark_supervised | ctx fired)
//!   loop { protect(sink, job) } while !ctx.is_cancelled()
//!   finish: fire finished, report Unsupervised if never acknowledged
//! ```
//!
//! ## Failure reports
//! Every recovered failure becomes a [`SupervisionError`] on the caller's
//! [`ErrorSink`]; there are exactly three kinds (panic, unsupervised
//! termination, shutdown timeout) and none of them is fatal to the runtime.
//! The only hard fault is registering into a finalized [`TreeSupervisor`],
//! which panics: that is an ordering bug in the supervising code.
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogSink`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use taskward::{
//!     spawn_persistent, CancelContext, ErrorSink, JobFn, ShutdownWaiter,
//!     SupervisionError, TreeSupervisor,
//! };
//!
//! struct StdoutSink;
//! impl ErrorSink for StdoutSink {
//!     fn report(&self, err: SupervisionError) {
//!         println!("{}", err.as_message());
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sink: Arc<dyn ErrorSink> = Arc::new(StdoutSink);
//!     let ctx = CancelContext::new();
//!
//!     let job_ctx = ctx.clone();
//!     let handle = spawn_persistent(
//!         ctx.clone(),
//!         "an example process",
//!         sink,
//!         JobFn::arc(move || {
//!             let ctx = job_ctx.clone();
//!             async move {
//!                 // do work until cancelled...
//!                 ctx.cancelled().await;
//!             }
//!         }),
//!     );
//!
//!     let supervisor = TreeSupervisor::new();
//!     supervisor.supervise(handle);
//!
//!     ctx.cancel();
//!     let deadline = CancelContext::with_timeout(Duration::from_secs(1));
//!     supervisor.wait_until_shutdown(&deadline).await;
//! }
//! ```

mod context;
mod core;
mod error;
mod jobs;
mod sink;

// ---- Public re-exports ----

pub use context::{CancelContext, CancelReason};
pub use core::{
    protect, run_isolated, spawn_isolated, spawn_persistent, PersistentHandle, ShutdownWaiter,
    TreeSupervisor,
};
pub use error::SupervisionError;
pub use jobs::{BoxJobFuture, Job, JobFn, JobRef};
pub use sink::ErrorSink;

// Optional: expose a simple built-in stdout sink (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use sink::LogSink;
