//! # The unit of work the runtime supervises.
//!
//! A [`Job`] is an opaque, argument-less, side-effecting async operation with
//! no return value. The runtime only knows how to invoke it and recover a
//! panic from it; failure is signaled exclusively by panicking.
//!
//! Jobs that want to stop cooperatively capture a
//! [`CancelContext`](crate::CancelContext) clone when they are constructed and
//! check it between units of work — the runtime does not inject one.

use std::{future::Future, pin::Pin};

/// Boxed future produced by one job invocation.
pub type BoxJobFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// # Opaque, restartable unit of work.
///
/// Each call to [`Job::run`] must produce a **fresh** future owning its own
/// state; the persistent restart loop calls it once per iteration, and a
/// one-shot helper calls it exactly once.
pub trait Job: Send + Sync + 'static {
    /// Produces one invocation of the job body.
    fn run(&self) -> BoxJobFuture;
}
