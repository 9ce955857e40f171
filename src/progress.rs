//! Progress and log notifications.
//!
//! Every stage reports through a [`Reporter`]: a stateless, one-way sink with
//! two notification shapes, free-text log lines and numeric progress. Sinks
//! never acknowledge, buffer or throttle. Cadence is the sender's business;
//! stages use [`should_report`] to emit every N items plus the last one.
//!
//! # Example
//!
//! ```rust
//! use chatsieve::progress::{Reporter, ThreadMessage};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = {
//!     let seen = Arc::clone(&seen);
//!     move |msg: ThreadMessage| seen.lock().unwrap().push(msg)
//! };
//!
//! sink.log("Found 3 call messages");
//! sink.progress(2, 2);
//! assert_eq!(seen.lock().unwrap().len(), 2);
//! ```

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

/// Progress of the current stage as `current` of `total`.
///
/// Stages report zero-based indices, so the final update of a stage with
/// `n` items is `Progress { current: n - 1, total: n - 1 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    /// Creates a new progress value.
    pub fn new(current: usize, total: usize) -> Self {
        Self { current, total }
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatsieve::progress::Progress;
    ///
    /// assert_eq!(Progress::new(50, 100).percentage(), 50.0);
    /// assert_eq!(Progress::new(0, 0).percentage(), 100.0);
    /// ```
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }

    /// Returns whether the stage has reached its last item.
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }
}

/// A notification sent from the engine to its caller.
///
/// The serialized form is the wire format of the JSON-lines transport:
///
/// ```json
/// {"type":"message","message":"Found 90 call messages"}
/// {"type":"progress","val":100,"max":249}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ThreadMessage {
    /// A human-readable log line.
    Message { message: String },
    /// Current/total of the running stage; either may be absent.
    Progress {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        val: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
}

impl ThreadMessage {
    /// Creates a log line.
    pub fn log(text: impl Into<String>) -> Self {
        ThreadMessage::Message {
            message: text.into(),
        }
    }

    /// Creates a progress update with both fields known.
    pub fn progress(progress: Progress) -> Self {
        ThreadMessage::Progress {
            val: Some(progress.current),
            max: Some(progress.total),
        }
    }

    /// Returns the log text if this is a log line.
    pub fn as_log(&self) -> Option<&str> {
        match self {
            ThreadMessage::Message { message } => Some(message),
            ThreadMessage::Progress { .. } => None,
        }
    }

    /// Returns the progress value if both fields are present.
    pub fn as_progress(&self) -> Option<Progress> {
        match self {
            ThreadMessage::Progress {
                val: Some(val),
                max: Some(max),
            } => Some(Progress::new(*val, *max)),
            _ => None,
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Reporter: Send + Sync {
    /// Delivers one notification. Must not block on the receiver.
    fn send(&self, message: ThreadMessage);

    /// Sends a log line.
    fn log(&self, text: &str) {
        self.send(ThreadMessage::log(text));
    }

    /// Sends a progress update.
    fn progress(&self, current: usize, total: usize) {
        self.send(ThreadMessage::progress(Progress::new(current, total)));
    }
}

impl<F> Reporter for F
where
    F: Fn(ThreadMessage) + Send + Sync,
{
    fn send(&self, message: ThreadMessage) {
        self(message);
    }
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn send(&self, _message: ThreadMessage) {}
}

/// Reporter that forwards notifications over a channel.
///
/// A dropped receiver is ignored: the caller has gone away and the
/// operation simply runs to completion unobserved.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: Sender<ThreadMessage>,
}

impl ChannelReporter {
    pub fn new(sender: Sender<ThreadMessage>) -> Self {
        Self { sender }
    }
}

impl Reporter for ChannelReporter {
    fn send(&self, message: ThreadMessage) {
        let _ = self.sender.send(message);
    }
}

/// Returns `true` if item `index` of `len` should be reported.
///
/// Reports every `interval` items starting at zero, and always the last item.
///
/// ```rust
/// use chatsieve::progress::should_report;
///
/// let reported: Vec<usize> = (0..250).filter(|&i| should_report(i, 250, 100)).collect();
/// assert_eq!(reported, vec![0, 100, 200, 249]);
/// ```
pub fn should_report(index: usize, len: usize, interval: usize) -> bool {
    index % interval.max(1) == 0 || index + 1 == len
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_progress_percentage() {
        assert_eq!(Progress::new(25, 100).percentage(), 25.0);
        assert_eq!(Progress::new(0, 0).percentage(), 100.0);
    }

    #[test]
    fn test_progress_is_complete() {
        assert!(Progress::new(249, 249).is_complete());
        assert!(!Progress::new(200, 249).is_complete());
    }

    #[test]
    fn test_thread_message_wire_format() {
        let log = serde_json::to_string(&ThreadMessage::log("hello")).unwrap();
        assert_eq!(log, r#"{"type":"message","message":"hello"}"#);

        let progress =
            serde_json::to_string(&ThreadMessage::progress(Progress::new(100, 249))).unwrap();
        assert_eq!(progress, r#"{"type":"progress","val":100,"max":249}"#);
    }

    #[test]
    fn test_thread_message_partial_progress() {
        let msg: ThreadMessage = serde_json::from_str(r#"{"type":"progress","max":10}"#).unwrap();
        assert_eq!(
            msg,
            ThreadMessage::Progress {
                val: None,
                max: Some(10)
            }
        );
        assert_eq!(msg.as_progress(), None);
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"type":"progress","max":10}"#
        );
    }

    #[test]
    fn test_should_report_cadence() {
        let reported: Vec<usize> = (0..250).filter(|&i| should_report(i, 250, 100)).collect();
        assert_eq!(reported, vec![0, 100, 200, 249]);

        let exact: Vec<usize> = (0..201).filter(|&i| should_report(i, 201, 100)).collect();
        assert_eq!(exact, vec![0, 100, 200]);

        assert!(should_report(0, 1, 100));
    }

    #[test]
    fn test_closure_reporter() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |msg: ThreadMessage| seen.lock().unwrap().push(msg)
        };
        sink.log("one");
        sink.progress(1, 2);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].as_log(), Some("one"));
        assert_eq!(seen[1].as_progress(), Some(Progress::new(1, 2)));
    }

    #[test]
    fn test_channel_reporter_ignores_closed_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let reporter = ChannelReporter::new(tx);
        reporter.log("delivered");
        assert_eq!(rx.recv().unwrap().as_log(), Some("delivered"));
        drop(rx);
        reporter.log("dropped");
    }

    #[test]
    fn test_noop_reporter() {
        NoopReporter.progress(1, 1);
    }
}
