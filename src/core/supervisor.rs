//! # Supervision tree: many waiters, one waitable unit.
//!
//! [`TreeSupervisor`] aggregates [`ShutdownWaiter`]s so that nested object
//! graphs spawning persistent tasks can expose a single `wait_until_shutdown`
//! to their parent. A tree is itself a waiter, so trees nest.
//!
//! Registration acknowledges supervision on the waiter automatically — the
//! one integration point that removes the need to remember
//! [`mark_supervised`](ShutdownWaiter::mark_supervised) at every call site.
//!
//! ## Rules
//! - After `wait_until_shutdown` has been called once, `supervise` panics:
//!   registering into a finalized tree is a structural ordering bug in the
//!   supervising code, surfaced immediately rather than handled
//! - Waiters are awaited sequentially, in registration order, all with the
//!   same deadline context; an expired deadline makes every remaining wait
//!   return immediately, so total wait time is bounded by one deadline

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::context::CancelContext;

/// Waits for background work to actually finish.
///
/// Implementors block until every task they spawned has finished or the
/// given context fires. Any [`PersistentHandle`](crate::PersistentHandle) is
/// a `ShutdownWaiter`, and so is [`TreeSupervisor`] itself.
#[async_trait]
pub trait ShutdownWaiter: Send + Sync {
    /// Blocks until the waiter has shut down or `deadline` fires.
    async fn wait_until_shutdown(&self, deadline: &CancelContext);

    /// Acknowledges that a supervisor takes responsibility for waiting on
    /// this waiter. Waiter types that track supervision override this; the
    /// default is a no-op, making the capability optional.
    fn mark_supervised(&self) {}
}

#[derive(Default)]
struct TreeState {
    supervised: Vec<Arc<dyn ShutdownWaiter>>,
    finalized: bool,
}

/// Flat aggregator of [`ShutdownWaiter`]s.
///
/// Cloning is cheap; all clones share one registration list, so a child
/// component can keep its tree while a parent registers a clone of it.
///
/// ## Example
/// ```
/// use std::time::Duration;
/// use taskward::{CancelContext, ShutdownWaiter, TreeSupervisor};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let tree = TreeSupervisor::new();
/// // tree.supervise(handle) for every spawned task...
/// let deadline = CancelContext::with_timeout(Duration::from_secs(1));
/// tree.wait_until_shutdown(&deadline).await;
/// # }
/// ```
#[derive(Clone, Default)]
pub struct TreeSupervisor {
    state: Arc<Mutex<TreeState>>,
}

impl TreeSupervisor {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `waiter` and acknowledges its supervision.
    ///
    /// # Panics
    /// Panics when called after
    /// [`wait_until_shutdown`](ShutdownWaiter::wait_until_shutdown) has been
    /// invoked on this tree (or any clone of it).
    pub fn supervise(&self, waiter: impl ShutdownWaiter + 'static) {
        waiter.mark_supervised();

        let mut state = self.lock_state();
        assert!(
            !state.finalized,
            "can't call supervise() after wait_until_shutdown() has been called"
        );
        state.supervised.push(Arc::new(waiter));
    }

    /// The precondition panic in `supervise` poisons the mutex; keep later
    /// calls observing the flag (and panicking again) instead of aborting on
    /// a poisoned lock.
    fn lock_state(&self) -> MutexGuard<'_, TreeState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ShutdownWaiter for TreeSupervisor {
    /// Marks the tree finalized, then waits on every registered waiter in
    /// registration order, sharing `deadline` across all of them.
    ///
    /// Idempotent: later calls wait on the same snapshot and add no new
    /// behavior.
    async fn wait_until_shutdown(&self, deadline: &CancelContext) {
        let waiters = {
            let mut state = self.lock_state();
            state.finalized = true;
            state.supervised.clone()
        };

        for waiter in waiters {
            waiter.wait_until_shutdown(deadline).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CancelContext;
    use crate::core::actor::spawn_persistent;
    use crate::error::SupervisionError;
    use crate::jobs::JobFn;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[tokio::test]
    #[should_panic(expected = "can't call supervise() after wait_until_shutdown()")]
    async fn supervise_after_wait_panics() {
        struct Noop;
        #[async_trait]
        impl ShutdownWaiter for Noop {
            async fn wait_until_shutdown(&self, _deadline: &CancelContext) {}
        }

        let tree = TreeSupervisor::new();
        tree.wait_until_shutdown(&CancelContext::new()).await;
        tree.supervise(Noop);
    }

    #[tokio::test]
    async fn supervised_handle_shuts_down_without_reports() {
        let (tx, mut rx) = mpsc::unbounded_channel::<SupervisionError>();
        let ctx = CancelContext::new();

        let job_ctx = ctx.clone();
        let handle = spawn_persistent(
            ctx.clone(),
            "foo",
            Arc::new(tx),
            JobFn::arc(move || {
                let ctx = job_ctx.clone();
                async move { ctx.cancelled().await }
            }),
        );

        let tree = TreeSupervisor::new();
        tree.supervise(handle);

        ctx.cancel();
        timeout(
            Duration::from_secs(1),
            tree.wait_until_shutdown(&CancelContext::new()),
        )
        .await
        .expect("tree wait didn't finish");

        assert!(rx.try_recv().is_err(), "error was reported on shutdown");
    }

    #[tokio::test]
    async fn trees_nest() {
        let (tx, mut rx) = mpsc::unbounded_channel::<SupervisionError>();
        let ctx = CancelContext::new();

        let job_ctx = ctx.clone();
        let handle = spawn_persistent(
            ctx.clone(),
            "leaf",
            Arc::new(tx),
            JobFn::arc(move || {
                let ctx = job_ctx.clone();
                async move { ctx.cancelled().await }
            }),
        );

        let child = TreeSupervisor::new();
        child.supervise(handle);
        let parent = TreeSupervisor::new();
        parent.supervise(child.clone());

        ctx.cancel();
        timeout(
            Duration::from_secs(1),
            parent.wait_until_shutdown(&CancelContext::new()),
        )
        .await
        .expect("nested tree wait didn't finish");

        assert!(rx.try_recv().is_err(), "error was reported on shutdown");
    }

    #[tokio::test]
    async fn clones_share_the_finalized_flag() {
        let tree = TreeSupervisor::new();
        let clone = tree.clone();
        tree.wait_until_shutdown(&CancelContext::new()).await;
        assert!(clone.lock_state().finalized);
    }
}
