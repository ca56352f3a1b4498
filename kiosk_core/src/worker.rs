//! Request worker threads.
//!
//! Each worker owns one blocking service client and performs one call per
//! request, forwarding the result over a channel. The thread is shut down
//! and joined when the worker is dropped; a result that completes after
//! shutdown is discarded.

use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub(crate) struct RequestWorker {
    name: &'static str,
    requests: Option<xch::Sender<()>>,
    /// Shutdown flag checked around the blocking call
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl RequestWorker {
    pub(crate) fn spawn<T, F>(name: &'static str, mut call: F, out: xch::Sender<T>) -> Self
    where
        T: Send + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        // At most one request is ever queued; the engine never overlaps calls.
        let (tx, rx) = xch::bounded::<()>(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            while rx.recv().is_ok() {
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                let result = call();
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!(worker = name, "late response discarded after shutdown");
                    break;
                }
                // If send fails, consumer is gone; exit gracefully
                if out.send(result).is_err() {
                    tracing::debug!(worker = name, "consumer disconnected, exiting thread");
                    break;
                }
            }
            tracing::trace!(worker = name, "worker thread exiting cleanly");
        });

        Self {
            name,
            requests: Some(tx),
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Queue one call. `false` if the worker is busy or gone.
    pub(crate) fn request(&self) -> bool {
        self.requests
            .as_ref()
            .is_some_and(|tx| tx.try_send(()).is_ok())
    }
}

impl Drop for RequestWorker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Closing the request channel wakes an idle worker. A worker inside a
        // call exits once the call returns (bounded by the request timeout).
        drop(self.requests.take());
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!(worker = self.name, "worker thread joined"),
                Err(e) => tracing::warn!(worker = self.name, ?e, "worker thread panicked"),
            }
        }
    }
}
