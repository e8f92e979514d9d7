//! # Persistent task: restart loop and handle.
//!
//! [`spawn_persistent`] runs a [`Job`](crate::Job) on its own tokio task,
//! re-invoking it through [`protect`] until the caller's [`CancelContext`]
//! fires. A panicking body never stops the loop; only cancellation does.
//!
//! ## Lifecycle
//! ```text
//! spawn_persistent(ctx, name, sink, job)
//!   │
//!   ├─► rendezvous: wait for mark_supervised() OR ctx fired
//!   │     (cancellation first ⇒ auto-acknowledge; the job never runs)
//!   │
//!   ├─► loop: while !ctx.is_cancelled() {
//!   │       protect(sink, job)          // one invocation, panic recovered
//!   │   }
//!   │
//!   └─► finish: fire `finished`, then report Unsupervised if nobody
//!       ever acknowledged supervision
//! ```
//!
//! ## Rules
//! - Invocations run **sequentially**; there is no backoff between restarts,
//!   so a body that panics immediately restarts as fast as the task can be
//!   rescheduled
//! - Cancellation is polled at loop-top; mid-body cancellation is the body's
//!   own responsibility to observe
//! - `finished` fires exactly once, strictly after the final invocation and
//!   before the unsupervised-termination check completes

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::context::{CancelContext, CancelReason};
use crate::core::runner::protect;
use crate::core::supervisor::ShutdownWaiter;
use crate::error::SupervisionError;
use crate::jobs::JobRef;
use crate::sink::ErrorSink;

/// Handle to one persistent task.
///
/// Cloning is cheap; all clones alias the same task. The handle is a
/// [`ShutdownWaiter`], so it can be registered in a
/// [`TreeSupervisor`](crate::TreeSupervisor) directly.
#[derive(Clone)]
pub struct PersistentHandle {
    name: Cow<'static, str>,
    sink: Arc<dyn ErrorSink>,
    /// Fires exactly once, when the restart loop has permanently exited.
    finished: CancellationToken,
    /// Fires exactly once, when an owner acknowledges supervision.
    supervised: CancellationToken,
}

/// Spawns a persistent task running `job` until `ctx` fires.
///
/// Returns immediately; the spawned task first waits for either
/// [`PersistentHandle::mark_supervised`] or cancellation before entering the
/// restart loop, so a task never runs ahead of an owner that intends to wait
/// on it. If cancellation wins that race, supervision is auto-acknowledged:
/// a task that never had the chance to run is not an unsupervised one.
///
/// Panics inside `job` are recovered per-invocation and reported to `sink`;
/// see [`protect`]. When the loop exits without supervision having been
/// acknowledged, a [`SupervisionError::Unsupervised`] report names the task.
pub fn spawn_persistent(
    ctx: CancelContext,
    name: impl Into<Cow<'static, str>>,
    sink: Arc<dyn ErrorSink>,
    job: JobRef,
) -> PersistentHandle {
    let handle = PersistentHandle {
        name: name.into(),
        sink,
        finished: CancellationToken::new(),
        supervised: CancellationToken::new(),
    };

    let task = handle.clone();
    tokio::spawn(async move {
        select! {
            () = task.supervised.cancelled() => {}
            () = ctx.cancelled() => task.supervised.cancel(),
        }

        while !ctx.is_cancelled() {
            protect(task.sink.as_ref(), job.as_ref()).await;
        }

        task.finish();
    });

    handle
}

impl PersistentHandle {
    /// Diagnostic label given at spawn time.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acknowledges that an owner takes responsibility for waiting on this
    /// task's shutdown.
    ///
    /// Idempotent and safe to call concurrently with the startup rendezvous
    /// and the finish sequence. Registering the handle in a
    /// [`TreeSupervisor`](crate::TreeSupervisor) calls this automatically.
    pub fn mark_supervised(&self) {
        self.supervised.cancel();
    }

    /// Whether the restart loop has permanently exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished.is_cancelled()
    }

    /// Raw finished signal, for composing into other waiting constructs.
    /// Fires exactly once, when the restart loop has permanently exited.
    #[must_use]
    pub fn done(&self) -> CancellationToken {
        self.finished.clone()
    }

    /// Finish sequence: fires `finished`, then reports an unsupervised
    /// termination if nobody ever acknowledged supervision.
    ///
    /// `finished` fires first so waiters unblock regardless of what the
    /// sink does with the report.
    fn finish(&self) {
        self.finished.cancel();
        if !self.supervised.is_cancelled() {
            self.sink.report(SupervisionError::Unsupervised {
                task: self.name.to_string(),
            });
        }
    }
}

#[async_trait]
impl ShutdownWaiter for PersistentHandle {
    /// Blocks until the task has finished or `deadline` fires.
    ///
    /// An already-finished task returns promptly with no report even when
    /// the deadline has also expired (the `biased` arm order below). A
    /// deadline that fired with [`CancelReason::DeadlineExceeded`] produces
    /// exactly one [`SupervisionError::ShutdownTimeout`] report; an explicit
    /// outer cancellation produces none.
    async fn wait_until_shutdown(&self, deadline: &CancelContext) {
        select! {
            biased;
            () = self.finished.cancelled() => {}
            () = deadline.cancelled() => {
                if deadline.reason() == Some(CancelReason::DeadlineExceeded) {
                    self.sink.report(SupervisionError::ShutdownTimeout {
                        task: self.name.to_string(),
                    });
                }
            }
        }
    }

    fn mark_supervised(&self) {
        PersistentHandle::mark_supervised(self);
    }
}
