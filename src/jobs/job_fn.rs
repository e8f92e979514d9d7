//! # Closure-backed job (`JobFn`)
//!
//! [`JobFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! invocation. No hidden state is shared between restarts; when a job needs
//! shared state, move an `Arc<...>` into the closure explicitly.
//!
//! ## Example
//! ```rust
//! use taskward::{CancelContext, JobFn, JobRef};
//!
//! let ctx = CancelContext::new();
//! let job: JobRef = JobFn::arc(move || {
//!     let ctx = ctx.clone();
//!     async move {
//!         if ctx.is_cancelled() {
//!             return;
//!         }
//!         // do work...
//!     }
//! });
//! # drop(job);
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::jobs::job::{BoxJobFuture, Job};

/// Shared handle to a job (`Arc<dyn Job>`).
pub type JobRef = Arc<dyn Job>;

/// Closure-backed job implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct JobFn<F> {
    f: F,
}

impl<F> JobFn<F> {
    /// Creates a new closure-backed job.
    ///
    /// Prefer [`JobFn::arc`] when you immediately need a [`JobRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the job and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F, Fut> Job for JobFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = ()> + Send + 'static,
{
    fn run(&self) -> BoxJobFuture {
        Box::pin((self.f)())
    }
}
