//! Configuration types for the engine.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! # Selector Profiles
//!
//! An archive export is recognised purely by the class names its markup
//! carries. Each supported export version is an [`ArchiveFormat`] variant
//! whose [`SelectorProfile`] holds the four compound selectors the extractor
//! needs. Profiles are compile-time values: a new export version means a new
//! variant, not a runtime setting.
//!
//! # Example
//!
//! ```rust
//! use chatsieve::config::{ArchiveFormat, EngineConfig};
//!
//! let config = EngineConfig::new()
//!     .with_format(ArchiveFormat::MessengerV1)
//!     .with_progress_interval(500);
//!
//! assert_eq!(config.progress_interval, 500);
//! ```

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{ChatsieveError, Result};

/// Structural signature of one archive export version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorProfile {
    /// Human-readable profile name
    pub name: &'static str,
    /// Element holding one message record
    pub container: &'static str,
    /// Sender line inside a container
    pub title: &'static str,
    /// Message body inside a container
    pub content: &'static str,
    /// Free-text timestamp inside a container
    pub timestamp: &'static str,
}

/// Messenger HTML export, first versioned layout.
pub const MESSENGER_V1: SelectorProfile = SelectorProfile {
    name: "Messenger HTML v1",
    container: "div.pam._3-95._2pi0._2lej.uiBoxWhite.noborder",
    title: "div._3-96._2pio._2lek._2lel",
    content: "div._3-96._2let",
    timestamp: "div._3-94._2lem",
};

/// Supported archive export versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveFormat {
    /// Messenger HTML export (default)
    #[default]
    MessengerV1,
}

impl ArchiveFormat {
    /// Returns the selector profile for this export version.
    pub fn profile(self) -> &'static SelectorProfile {
        match self {
            ArchiveFormat::MessengerV1 => &MESSENGER_V1,
        }
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.profile().name)
    }
}

/// Selectors of a [`SelectorProfile`], compiled once per operation.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub container: Selector,
    pub title: Selector,
    pub content: Selector,
    pub timestamp: Selector,
}

impl CompiledSelectors {
    /// Compiles every selector in the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ChatsieveError::InvalidSelector`] naming the first selector
    /// that does not parse.
    pub fn compile(profile: &SelectorProfile) -> Result<Self> {
        Ok(Self {
            container: compile_one(profile.container)?,
            title: compile_one(profile.title)?,
            content: compile_one(profile.content)?,
            timestamp: compile_one(profile.timestamp)?,
        })
    }
}

fn compile_one(selector: &'static str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ChatsieveError::InvalidSelector {
        selector,
        message: e.to_string(),
    })
}

/// Engine settings shared by every operation.
///
/// # Example
///
/// ```rust
/// use chatsieve::config::EngineConfig;
///
/// let config = EngineConfig::new().with_call_marker("Duration");
/// assert_eq!(config.call_log_file_name, "CallLog.html");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Archive export version (default: Messenger v1)
    pub format: ArchiveFormat,

    /// Emit a progress update every N items (default: 100)
    pub progress_interval: usize,

    /// Body substring marking a call entry (default: "Duration")
    pub call_marker: String,

    /// Output file name for the call filter (default: CallLog.html)
    pub call_log_file_name: String,

    /// Output file name for the summary (default: MessageStatistic.html)
    pub statistic_file_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            format: ArchiveFormat::default(),
            progress_interval: 100,
            call_marker: "Duration".to_string(),
            call_log_file_name: "CallLog.html".to_string(),
            statistic_file_name: "MessageStatistic.html".to_string(),
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive export version.
    #[must_use]
    pub fn with_format(mut self, format: ArchiveFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the progress cadence. Zero is treated as one.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Sets the call marker substring.
    #[must_use]
    pub fn with_call_marker(mut self, marker: impl Into<String>) -> Self {
        self.call_marker = marker.into();
        self
    }

    /// Returns the selector profile of the configured format.
    pub fn profile(&self) -> &'static SelectorProfile {
        self.format.profile()
    }
}
