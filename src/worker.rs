//! Background worker.
//!
//! The engine runs on its own thread, isolated from the caller. Requests go
//! in over one channel and notifications come out over another; neither side
//! waits for the other.
//!
//! The worker takes one operation at a time. A [`BusyGuard`] holds the single
//! slot: [`Worker::submit`] claims it and the worker thread releases it once
//! the operation has finished. A request submitted while the slot is taken is
//! rejected with [`ChatsieveError::Busy`] and a `Busy: ...` log line, never
//! queued. Callers that feed requests in bulk pace themselves with
//! [`Worker::wait_idle`].
//!
//! # Example
//!
//! ```rust,no_run
//! use chatsieve::engine::Engine;
//! use chatsieve::request::RequestPayload;
//! use chatsieve::worker::Worker;
//!
//! let (worker, notifications) = Worker::spawn(Engine::default())?;
//! worker.submit(RequestPayload::Legacy("export/message.html".into()))?;
//!
//! for msg in notifications.iter().take(3) {
//!     println!("{:?}", msg);
//! }
//! worker.shutdown()?;
//! # Ok::<(), chatsieve::ChatsieveError>(())
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::error::{ChatsieveError, Result};
use crate::progress::{ChannelReporter, Reporter, ThreadMessage};
use crate::request::RequestPayload;

/// Single-slot in-flight marker.
#[derive(Debug, Clone, Default)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl BusyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot. Returns `false` if it is already taken.
    pub fn try_acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the slot when dropped, including during a panic unwind.
struct SlotRelease<'a>(&'a BusyGuard);

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// Handle to the worker thread.
pub struct Worker {
    requests: Sender<RequestPayload>,
    reporter: ChannelReporter,
    guard: BusyGuard,
    idle: Receiver<()>,
    thread: JoinHandle<()>,
}

impl Worker {
    /// Starts the worker thread.
    ///
    /// Returns the handle and the receiving end of the notification stream.
    /// The stream ends once the worker has shut down.
    pub fn spawn(engine: Engine) -> Result<(Self, Receiver<ThreadMessage>)> {
        let (request_tx, request_rx) = unbounded::<RequestPayload>();
        let (notify_tx, notify_rx) = unbounded();
        let (idle_tx, idle_rx) = unbounded();
        let guard = BusyGuard::new();

        let thread_guard = guard.clone();
        let thread_reporter = ChannelReporter::new(notify_tx.clone());
        let thread = thread::Builder::new()
            .name("chatsieve-worker".into())
            .spawn(move || {
                for payload in request_rx {
                    {
                        let _slot = SlotRelease(&thread_guard);
                        engine.handle(payload, &thread_reporter);
                    }
                    let _ = idle_tx.send(());
                }
                debug!("worker request channel closed");
            })?;

        let worker = Self {
            requests: request_tx,
            reporter: ChannelReporter::new(notify_tx),
            guard,
            idle: idle_rx,
            thread,
        };
        Ok((worker, notify_rx))
    }

    /// Hands a request to the worker.
    ///
    /// # Errors
    ///
    /// Returns [`ChatsieveError::Busy`] if an operation is in flight, or
    /// [`ChatsieveError::WorkerDisconnected`] if the thread has exited.
    pub fn submit(&self, payload: RequestPayload) -> Result<()> {
        if self.thread.is_finished() {
            return Err(ChatsieveError::WorkerDisconnected);
        }
        if !self.guard.try_acquire() {
            let err = ChatsieveError::Busy;
            warn!("rejected request while busy");
            self.reporter.log(&err.to_string());
            return Err(err);
        }

        self.requests.send(payload).map_err(|_| {
            self.guard.release();
            ChatsieveError::WorkerDisconnected
        })
    }

    /// Returns `true` while an operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Blocks until no operation is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ChatsieveError::WorkerDisconnected`] if the thread exits
    /// while an operation is still marked as running.
    pub fn wait_idle(&self) -> Result<()> {
        while self.guard.is_busy() {
            // Completions of earlier requests may still be queued; recheck
            // the slot after each one.
            self.idle
                .recv()
                .map_err(|_| ChatsieveError::WorkerDisconnected)?;
        }
        Ok(())
    }

    /// Lets the running operation finish, then stops the thread.
    pub fn shutdown(self) -> Result<()> {
        let Worker {
            requests,
            reporter,
            thread,
            ..
        } = self;
        drop(requests);
        drop(reporter);
        thread
            .join()
            .map_err(|_| ChatsieveError::WorkerDisconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn test_busy_guard_single_slot() {
        let guard = BusyGuard::new();
        assert!(guard.try_acquire());
        assert!(guard.is_busy());
        assert!(!guard.clone().try_acquire());
        guard.release();
        assert!(guard.try_acquire());
    }

    fn write_call_archive(dir: &std::path::Path) -> std::path::PathBuf {
        let input = dir.join("message.html");
        fs::write(
            &input,
            r#"<div class="pam _3-95 _2pi0 _2lej uiBoxWhite noborder"><div class="_3-96 _2pio _2lek _2lel">Bob</div><div class="_3-96 _2let">Duration: 4 minutes</div><div class="_3-94 _2lem">Jan 05, 2019 08:30PM</div></div>"#,
        )
        .unwrap();
        input
    }

    #[test]
    fn test_slot_released_when_operation_panics() {
        let guard = BusyGuard::new();
        assert!(guard.try_acquire());

        let thread_guard = guard.clone();
        let result = thread::spawn(move || {
            let _slot = SlotRelease(&thread_guard);
            panic!("operation panicked");
        })
        .join();

        assert!(result.is_err());
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_submit_while_busy_is_rejected() {
        let (worker, notifications) = Worker::spawn(Engine::default()).unwrap();
        // Hold the slot as a running operation would
        assert!(worker.guard.try_acquire());

        let err = worker
            .submit(RequestPayload::Legacy("/tmp/message.html".into()))
            .unwrap_err();
        assert!(err.is_busy());

        let msg = notifications.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(msg.as_log(), Some("Busy: another operation is still running"));

        worker.guard.release();
        worker.shutdown().unwrap();
    }

    #[test]
    fn test_wait_idle_runs_requests_back_to_back() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let inputs = [
            write_call_archive(first.path()),
            write_call_archive(second.path()),
        ];

        let (worker, _notifications) = Worker::spawn(Engine::default()).unwrap();
        for input in &inputs {
            worker.wait_idle().unwrap();
            worker
                .submit(RequestPayload::Legacy(input.display().to_string()))
                .unwrap();
        }
        worker.wait_idle().unwrap();
        assert!(!worker.is_busy());
        worker.shutdown().unwrap();

        assert!(first.path().join("CallLog.html").exists());
        assert!(second.path().join("CallLog.html").exists());
    }

    #[test]
    fn test_worker_runs_request_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_call_archive(dir.path());

        let (worker, notifications) = Worker::spawn(Engine::default()).unwrap();
        worker
            .submit(RequestPayload::Legacy(input.display().to_string()))
            .unwrap();

        let mut finished = false;
        while let Ok(msg) = notifications.recv_timeout(Duration::from_secs(10)) {
            if msg.as_log().is_some_and(|l| l.contains("Found 1 call messages")) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        worker.shutdown().unwrap();

        assert!(dir.path().join("CallLog.html").exists());
        // Stream ends once every sender is gone
        while notifications.recv().is_ok() {}
    }

    #[test]
    fn test_worker_survives_failed_operation() {
        let (worker, notifications) = Worker::spawn(Engine::default()).unwrap();
        worker
            .submit(RequestPayload::Legacy("/no/such/message.html".into()))
            .unwrap();

        let mut error_line = None;
        while let Ok(msg) = notifications.recv_timeout(Duration::from_secs(10)) {
            if let Some(line) = msg.as_log().filter(|l| l.starts_with("Error")) {
                error_line = Some(line.to_owned());
                break;
            }
        }
        assert!(error_line.unwrap().contains("Failed to load archive"));

        worker.wait_idle().unwrap();
        worker
            .submit(RequestPayload::Legacy("/still/missing.html".into()))
            .unwrap();
        worker.shutdown().unwrap();
    }
}
