//! # Cancellation context: shared stop signal with a reason.
//!
//! [`CancelContext`] is the cooperative stop signal every component of the
//! runtime consults: persistent task loops poll it between invocations,
//! shutdown waits select on it as a deadline, and job bodies capture a clone
//! to observe mid-body cancellation themselves.
//!
//! The context fires **exactly once**; after that, clones everywhere observe
//! it as cancelled and [`CancelContext::reason`] tells apart an explicit
//! [`cancel`](CancelContext::cancel) from an elapsed deadline. Shutdown waits
//! rely on that distinction: only a [`CancelReason::DeadlineExceeded`] context
//! produces a timeout report.
//!
//! ## Rules
//! - Cancellation is cooperative and polled, never preemptive.
//! - Cloning is cheap; all clones alias the same signal and reason.
//! - The reason is assigned at most once (first firing wins).

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

/// Why a [`CancelContext`] fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// [`CancelContext::cancel`] was called.
    Cancelled,
    /// The deadline given to [`CancelContext::with_timeout`] elapsed.
    DeadlineExceeded,
}

/// Shared one-shot cancellation signal carrying a [`CancelReason`].
///
/// ## Example
/// ```
/// use taskward::{CancelContext, CancelReason};
///
/// let ctx = CancelContext::new();
/// assert!(!ctx.is_cancelled());
///
/// ctx.cancel();
/// assert!(ctx.is_cancelled());
/// assert_eq!(ctx.reason(), Some(CancelReason::Cancelled));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelContext {
    token: CancellationToken,
    reason: Arc<OnceLock<CancelReason>>,
}

impl CancelContext {
    /// Creates a context that fires only on an explicit [`cancel`](Self::cancel).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that fires with [`CancelReason::DeadlineExceeded`]
    /// once `deadline` elapses. An explicit `cancel` can still fire it first.
    ///
    /// The deadline timer runs on a spawned task, so this must be called from
    /// within a tokio runtime.
    #[must_use]
    pub fn with_timeout(deadline: Duration) -> Self {
        let ctx = Self::new();
        let timer = ctx.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = time::sleep(deadline) => timer.fire(CancelReason::DeadlineExceeded),
                () = timer.token.cancelled() => {}
            }
        });
        ctx
    }

    /// Creates a context that fires with [`CancelReason::Cancelled`] when the
    /// process receives a termination signal (SIGINT/SIGTERM/SIGQUIT on unix,
    /// Ctrl-C elsewhere). The usual root context of a server process.
    ///
    /// The signal listener runs on a spawned task, so this must be called
    /// from within a tokio runtime.
    #[must_use]
    pub fn from_os_signals() -> Self {
        let ctx = Self::new();
        let listener = ctx.clone();
        tokio::spawn(async move {
            if wait_for_shutdown_signal().await.is_ok() {
                listener.cancel();
            }
        });
        ctx
    }

    /// Fires the context with [`CancelReason::Cancelled`]. Idempotent; a
    /// later call never overwrites an already-assigned reason.
    pub fn cancel(&self) {
        self.fire(CancelReason::Cancelled);
    }

    /// Non-blocking query: has the context fired?
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the context fires. Completes immediately if it already has.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Why the context fired, `None` while it has not.
    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        self.reason.get().copied()
    }

    fn fire(&self, reason: CancelReason) {
        let _ = self.reason.set(reason);
        self.token.cancel();
    }
}

/// Completes when the process receives a termination signal.
///
/// Each call registers independent listeners.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_cancel_fires_once_with_reason() {
        let ctx = CancelContext::new();
        let observer = ctx.clone();
        assert_eq!(ctx.reason(), None);

        ctx.cancel();
        ctx.cancel();

        observer.cancelled().await;
        assert!(observer.is_cancelled());
        assert_eq!(observer.reason(), Some(CancelReason::Cancelled));
    }

    #[tokio::test]
    async fn deadline_fires_with_deadline_exceeded() {
        let ctx = CancelContext::with_timeout(Duration::from_millis(10));
        ctx.cancelled().await;
        assert_eq!(ctx.reason(), Some(CancelReason::DeadlineExceeded));
    }

    #[tokio::test]
    async fn explicit_cancel_wins_over_pending_deadline() {
        let ctx = CancelContext::with_timeout(Duration::from_secs(60));
        ctx.cancel();
        ctx.cancelled().await;
        assert_eq!(ctx.reason(), Some(CancelReason::Cancelled));
    }
}
