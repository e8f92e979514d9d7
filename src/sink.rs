//! # Error sink: where recovered failures go.
//!
//! The runtime never surfaces failures as return values or re-raised panics;
//! every recovered failure is delivered to a caller-owned [`ErrorSink`]. The
//! sink is shared across arbitrarily many reports and is not rate-limited or
//! deduplicated by the runtime.
//!
//! An [`UnboundedSender`] of reports is a valid sink out of the box, which is
//! the natural shape for tests and for feeding reports into an existing
//! logging pipeline.

use tokio::sync::mpsc::UnboundedSender;

use crate::error::SupervisionError;

/// Receives failure reports from the supervision runtime.
///
/// `report` is called from the reporting task's own context and must not
/// block it for long; a slow sink stalls the restart loop of the task that
/// reported.
pub trait ErrorSink: Send + Sync + 'static {
    /// Delivers one failure report. The return value is intentionally `()`:
    /// the runtime does not interpret sink outcomes.
    fn report(&self, err: SupervisionError);
}

/// Channel-backed sink; reports are queued without blocking.
///
/// A closed receiver drops reports silently.
impl ErrorSink for UnboundedSender<SupervisionError> {
    fn report(&self, err: SupervisionError) {
        let _ = self.send(err);
    }
}

/// Minimal sink that prints reports to stdout. Use it for tests or demos.
///
/// ## Example output
/// ```text
/// [job_panicked] panic: connection refused (at src/poller.rs:31)
/// [unsupervised_termination] task poller terminated without being supervised
/// [shutdown_timeout] timed out waiting for task poller to shut down
/// ```
#[cfg(feature = "logging")]
#[derive(Default)]
pub struct LogSink;

#[cfg(feature = "logging")]
impl LogSink {
    /// Constructs a new [`LogSink`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "logging")]
impl ErrorSink for LogSink {
    fn report(&self, err: SupervisionError) {
        println!("[{}] {}", err.as_label(), err.as_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn sender_sink_queues_reports() {
        let (tx, mut rx) = mpsc::unbounded_channel::<SupervisionError>();
        tx.report(SupervisionError::Unsupervised { task: "foo".into() });
        let err = rx.try_recv().expect("report not delivered");
        assert_eq!(err.as_label(), "unsupervised_termination");
    }

    #[test]
    fn sender_sink_tolerates_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel::<SupervisionError>();
        drop(rx);
        tx.report(SupervisionError::Unsupervised { task: "foo".into() });
    }
}
