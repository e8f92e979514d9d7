//! # Run one protected invocation of a job.
//!
//! [`protect`] is the failure-isolation boundary of the crate: it invokes a
//! job body once and recovers any panic raised during that invocation,
//! converting it into a [`SupervisionError::JobPanicked`] report on the error
//! sink. The call returns normally whether or not the body panicked.
//!
//! This is the **only** place panics are caught; every higher layer relies on
//! that guarantee to keep its task alive across repeated invocations.
//!
//! ## Rules
//! - At most **one** report per invocation
//! - Recovers only panics raised during this invocation; never re-raises
//! - Records the panic site (`file:line`) via a process-wide hook

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use futures::FutureExt;

use crate::error::SupervisionError;
use crate::jobs::Job;
use crate::sink::ErrorSink;

static HOOK: Once = Once::new();

thread_local! {
    static PANIC_SITE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Installs a panic hook that records the panic site for the current thread.
///
/// The previously installed hook keeps running afterwards, so default stderr
/// backtrace output is preserved.
fn install_site_hook() {
    HOOK.call_once(|| {
        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let site = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));
            PANIC_SITE.with(|slot| *slot.borrow_mut() = site);
            prev(info);
        }));
    });
}

/// Takes the site recorded for the most recent panic on this thread.
///
/// The unwound panic is observed on the same thread that ran the hook, before
/// any further suspension point, so the slot always belongs to that panic.
fn take_panic_site() -> String {
    PANIC_SITE
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| "<unknown>".to_string())
}

/// Extracts a printable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Invokes `job` once, recovering any panic into a report on `sink`.
///
/// The job future is built *inside* the protected scope: a closure that
/// panics while constructing its future is recovered the same way as one
/// that panics mid-run.
pub async fn protect(sink: &dyn ErrorSink, job: &dyn Job) {
    install_site_hook();

    let outcome = AssertUnwindSafe(async { job.run().await })
        .catch_unwind()
        .await;

    if let Err(payload) = outcome {
        sink.report(SupervisionError::JobPanicked {
            payload: panic_message(payload.as_ref()),
            location: take_panic_site(),
        });
    }
}
