//! End-to-end supervision scenarios driven through the public API only.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;

use taskward::{
    spawn_persistent, CancelContext, ErrorSink, JobFn, ShutdownWaiter, SupervisionError,
    TreeSupervisor,
};

fn collector() -> (
    Arc<dyn ErrorSink>,
    mpsc::UnboundedReceiver<SupervisionError>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(tx), rx)
}

/// A consumer task drains a channel until cancelled; the tree shuts the whole
/// arrangement down within its deadline and nothing gets reported.
#[tokio::test]
async fn consumer_drains_in_order_then_tree_shuts_down_cleanly() {
    let (sink, mut reports) = collector();
    let ctx = CancelContext::new();

    let (data_tx, data_rx) = mpsc::unbounded_channel::<i32>();
    let data_rx = Arc::new(Mutex::new(data_rx));
    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel::<i32>();

    let job_ctx = ctx.clone();
    let handle = spawn_persistent(
        ctx.clone(),
        "an example process",
        sink,
        JobFn::arc(move || {
            let data = Arc::clone(&data_rx);
            let seen = seen_tx.clone();
            let ctx = job_ctx.clone();
            async move {
                let mut data = data.lock().await;
                loop {
                    tokio::select! {
                        biased;
                        Some(i) = data.recv() => {
                            let _ = seen.send(i);
                        }
                        () = ctx.cancelled() => return,
                    }
                }
            }
        }),
    );

    let supervisor = TreeSupervisor::new();
    supervisor.supervise(handle);

    for i in [3, 2, 1] {
        data_tx.send(i).expect("consumer gone");
    }
    for expected in [3, 2, 1] {
        let got = timeout(Duration::from_secs(1), seen_rx.recv())
            .await
            .expect("consumer never saw the value")
            .expect("consumer dropped its channel");
        assert_eq!(got, expected);
    }

    ctx.cancel();
    let deadline = CancelContext::with_timeout(Duration::from_secs(1));
    supervisor.wait_until_shutdown(&deadline).await;

    assert!(reports.try_recv().is_err(), "shutdown produced reports");
}

/// A permanently panicking job restarts with one report per invocation and
/// still shuts down cleanly through the tree once cancelled.
#[tokio::test]
async fn panicking_job_restarts_and_tree_still_shuts_down() {
    let (sink, mut reports) = collector();
    let ctx = CancelContext::new();

    let job_ctx = ctx.clone();
    let cancel_after = 10;
    let invocations = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let job_invocations = Arc::clone(&invocations);
    let handle = spawn_persistent(
        ctx.clone(),
        "flaky service",
        sink,
        JobFn::arc(move || {
            let ctx = job_ctx.clone();
            let invocations = Arc::clone(&job_invocations);
            async move {
                let n = invocations.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
                if n > cancel_after {
                    ctx.cancel();
                }
                panic!("foo")
            }
        }),
    );

    let supervisor = TreeSupervisor::new();
    supervisor.supervise(handle.clone());

    for _ in 0..cancel_after {
        let err = timeout(Duration::from_secs(1), reports.recv())
            .await
            .expect("flaky service didn't restart")
            .expect("sink closed");
        assert_eq!(err.as_label(), "job_panicked");
        assert!(err.to_string().contains("foo"));
    }

    let deadline = CancelContext::with_timeout(Duration::from_secs(1));
    supervisor.wait_until_shutdown(&deadline).await;
    assert!(handle.is_finished());

    // Every remaining report is a recovered panic; never an unsupervised
    // termination or a timeout.
    while let Ok(err) = reports.try_recv() {
        assert_eq!(err.as_label(), "job_panicked");
    }
}

/// A handle that refuses to shut down trips the deadline; the report names it
/// and the wait returns instead of hanging.
#[tokio::test]
async fn stuck_task_times_out_the_shutdown_wait() {
    let (sink, mut reports) = collector();
    let ctx = CancelContext::new();

    let handle = spawn_persistent(
        ctx,
        "stubborn service",
        sink,
        JobFn::arc(|| async {
            // Ignores its context entirely.
            std::future::pending::<()>().await;
        }),
    );

    let supervisor = TreeSupervisor::new();
    supervisor.supervise(handle);

    let deadline = CancelContext::with_timeout(Duration::from_millis(50));
    timeout(
        Duration::from_secs(1),
        supervisor.wait_until_shutdown(&deadline),
    )
    .await
    .expect("wait didn't return after the deadline");

    let err = timeout(Duration::from_secs(1), reports.recv())
        .await
        .expect("timeout was not reported")
        .expect("sink closed");
    assert_eq!(err.as_label(), "shutdown_timeout");
    assert!(err.to_string().contains("stubborn service"));
}
