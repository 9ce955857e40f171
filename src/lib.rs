//! # Chatsieve
//!
//! A Rust library for slimming down exported chat-log HTML archives.
//!
//! ## Overview
//!
//! Chatsieve loads an archive export, finds its message containers by their
//! structural class signature, and runs one or both of two batch operations:
//!
//! - **Call filter**: keep only call entries and write `CallLog.html`
//! - **Summary**: collapse messages into monthly or weekly blocks and write
//!   `MessageStatistic.html`
//!
//! Output files are written next to the input and always overwritten.
//! Progress and log lines stream out to the caller while an operation runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatsieve::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let engine = Engine::default();
//!     let request = OperationRequest::new("inbox/message.html", true, Some(SummaryType::Weekly))?;
//!
//!     let outcome = engine.run(&request, &|msg: ThreadMessage| {
//!         if let Some(line) = msg.as_log() {
//!             println!("{line}");
//!         }
//!     })?;
//!
//!     println!("{} messages", outcome.messages_found);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`document`]: loading, mutating and serializing the archive tree
//! - [`core`]: extraction, call filter, summary aggregation
//! - [`timestamp`]: the fixed archive timestamp format
//! - [`engine`]: one operation end to end, error-to-log-line policy
//! - [`worker`]: background thread with a single-operation busy guard
//! - [`request`]: request wire forms and validation
//! - [`progress`]: [`Reporter`](progress::Reporter) sinks and
//!   [`ThreadMessage`](progress::ThreadMessage)
//! - [`config`]: [`EngineConfig`](config::EngineConfig) and selector profiles
//! - [`error`]: [`ChatsieveError`], [`Result`]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod document;
pub mod engine;
pub mod error;
pub mod message;
pub mod progress;
pub mod request;
pub mod timestamp;
pub mod worker;

// Re-export the main types at the crate root for convenience
pub use error::{ChatsieveError, Result};
pub use message::ParsedMessage;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatsieve::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ParsedMessage;

    pub use crate::error::{ChatsieveError, Result};

    pub use crate::config::{ArchiveFormat, EngineConfig};

    pub use crate::core::{OperationOutcome, StageOutcome, SummaryType, TimeBucket};

    pub use crate::document::Document;

    pub use crate::engine::Engine;

    pub use crate::progress::{NoopReporter, Progress, Reporter, ThreadMessage};

    pub use crate::request::{OperationRequest, RequestPayload};

    pub use crate::worker::Worker;
}
