//! Operation requests.
//!
//! Requests reach the engine in one of two wire forms:
//!
//! ```json
//! "/home/me/messages/inbox/bob/message.html"
//! {"fullPath": "/home/me/message.html", "callFilter": true, "messagesSummary": true, "summaryType": "weekly"}
//! ```
//!
//! The bare string is the legacy form and means "call filter only". Both are
//! decoded into [`RequestPayload`] and validated into an [`OperationRequest`]
//! before any file is touched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::models::SummaryType;
use crate::error::{ChatsieveError, Result};

/// A request as it arrives from the caller, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestPayload {
    /// Bare file path: run the call filter only.
    Legacy(String),
    /// Structured request.
    Structured(StructuredRequest),
}

/// Structured wire form, camelCase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredRequest {
    #[serde(default)]
    pub full_path: Option<String>,
    #[serde(default)]
    pub call_filter: bool,
    #[serde(default)]
    pub messages_summary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_type: Option<SummaryType>,
}

impl RequestPayload {
    /// Decodes one JSON request.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatsieve::request::RequestPayload;
    ///
    /// let req = RequestPayload::from_json(r#""/tmp/message.html""#)?.validate()?;
    /// assert!(req.call_filter);
    /// assert!(!req.messages_summary);
    /// # Ok::<(), chatsieve::ChatsieveError>(())
    /// ```
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Validates into an [`OperationRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`ChatsieveError::InvalidRequest`] if the path is missing or
    /// empty, or if neither operation is selected.
    pub fn validate(self) -> Result<OperationRequest> {
        match self {
            RequestPayload::Legacy(path) => OperationRequest::new(path, true, None),
            RequestPayload::Structured(req) => {
                let path = req.full_path.unwrap_or_default();
                let summary = req
                    .messages_summary
                    .then(|| req.summary_type.unwrap_or_default());
                OperationRequest::new(path, req.call_filter, summary)
            }
        }
    }
}

impl From<OperationRequest> for RequestPayload {
    fn from(req: OperationRequest) -> Self {
        RequestPayload::Structured(StructuredRequest {
            full_path: Some(req.full_path.to_string_lossy().into_owned()),
            call_filter: req.call_filter,
            messages_summary: req.messages_summary,
            summary_type: Some(req.summary_type),
        })
    }
}

/// A validated request: non-empty path and at least one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub full_path: PathBuf,
    pub call_filter: bool,
    pub messages_summary: bool,
    /// Meaningful only if `messages_summary` is set
    pub summary_type: SummaryType,
}

impl OperationRequest {
    /// Builds a request; `summary` selects the summary operation.
    pub fn new(
        full_path: impl Into<PathBuf>,
        call_filter: bool,
        summary: Option<SummaryType>,
    ) -> Result<Self> {
        let full_path = full_path.into();
        if full_path.as_os_str().is_empty() {
            return Err(ChatsieveError::invalid_request("fullPath is missing or empty"));
        }
        if !call_filter && summary.is_none() {
            return Err(ChatsieveError::invalid_request(
                "select at least one of callFilter or messagesSummary",
            ));
        }
        Ok(Self {
            full_path,
            call_filter,
            messages_summary: summary.is_some(),
            summary_type: summary.unwrap_or_default(),
        })
    }

    /// Path of an output file named `file_name` next to the input.
    pub fn sibling(&self, file_name: &str) -> PathBuf {
        self.full_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(file_name)
    }

    /// Input file name for log lines.
    pub fn file_name(&self) -> String {
        self.full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.full_path.display().to_string())
    }
}
