//! Failure reports produced by the supervision runtime.
//!
//! Everything the runtime recovers is converted into a [`SupervisionError`]
//! and handed to an [`ErrorSink`](crate::ErrorSink); nothing from inside a
//! supervised job ever propagates to the spawning caller. There are exactly
//! three report kinds:
//!
//! - [`SupervisionError::JobPanicked`] — a job body panicked and was recovered.
//! - [`SupervisionError::Unsupervised`] — a persistent task finished without
//!   anyone acknowledging supervision.
//! - [`SupervisionError::ShutdownTimeout`] — a shutdown wait hit its deadline.
//!
//! The helper methods (`as_label`, `as_message`) exist for logging/metrics.

use thiserror::Error;

/// # Failure reports delivered to an [`ErrorSink`](crate::ErrorSink).
///
/// None of these is fatal to the runtime: a panicking job restarts, an
/// unsupervised termination and a shutdown timeout are owner-side signals.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SupervisionError {
    /// A job body panicked during an invocation; the panic was recovered by
    /// the isolation wrapper and never escaped.
    #[error("panic: {payload}\n\ntask panicked at:\n{location}")]
    JobPanicked {
        /// Printable panic payload (`&str`/`String` payloads, else a stub).
        payload: String,
        /// Panic site as `file:line`, `"<unknown>"` if it could not be captured.
        location: String,
    },

    /// A persistent task's restart loop exited while its supervision was
    /// never acknowledged. Signals an owner-side programming defect: nobody
    /// took responsibility for waiting on this task's shutdown.
    #[error("persistent task {task} terminated without being supervised")]
    Unsupervised {
        /// Name of the task that finished unsupervised.
        task: String,
    },

    /// A `wait_until_shutdown` deadline expired before the task finished.
    /// Only stops the waiting; the task itself keeps running.
    #[error("persistent task {task} timed out while waiting for shutdown")]
    ShutdownTimeout {
        /// Name of the task that was still running at the deadline.
        task: String,
    },
}

impl SupervisionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskward::SupervisionError;
    ///
    /// let err = SupervisionError::Unsupervised { task: "poller".into() };
    /// assert_eq!(err.as_label(), "unsupervised_termination");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisionError::JobPanicked { .. } => "job_panicked",
            SupervisionError::Unsupervised { .. } => "unsupervised_termination",
            SupervisionError::ShutdownTimeout { .. } => "shutdown_timeout",
        }
    }

    /// Returns a single-line human-readable message with details.
    pub fn as_message(&self) -> String {
        match self {
            SupervisionError::JobPanicked { payload, location } => {
                format!("panic: {payload} (at {location})")
            }
            SupervisionError::Unsupervised { task } => {
                format!("task {task} terminated without being supervised")
            }
            SupervisionError::ShutdownTimeout { task } => {
                format!("timed out waiting for task {task} to shut down")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_report_names_payload_and_site() {
        let err = SupervisionError::JobPanicked {
            payload: "foo".into(),
            location: "src/worker.rs:42".into(),
        };
        assert_eq!(err.as_label(), "job_panicked");
        let text = err.to_string();
        assert!(text.contains("panic: foo"));
        assert!(text.contains("src/worker.rs:42"));
    }

    #[test]
    fn unsupervised_report_names_task() {
        let err = SupervisionError::Unsupervised { task: "foo".into() };
        assert_eq!(
            err.to_string(),
            "persistent task foo terminated without being supervised"
        );
    }

    #[test]
    fn timeout_report_names_task() {
        let err = SupervisionError::ShutdownTimeout {
            task: "consumer".into(),
        };
        assert_eq!(err.as_label(), "shutdown_timeout");
        assert!(err.to_string().contains("consumer"));
    }
}
