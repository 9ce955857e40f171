//! Call filter.
//!
//! Keeps only call entries: every message whose body lacks the call marker
//! has its container detached from the document. The caller serializes the
//! pruned document afterwards.
//!
//! # Example
//!
//! ```rust
//! use chatsieve::config::{CompiledSelectors, MESSENGER_V1};
//! use chatsieve::core::extractor::extract_messages;
//! use chatsieve::core::filter::filter_calls;
//! use chatsieve::document::Document;
//! use chatsieve::progress::NoopReporter;
//!
//! let row = |body: &str| format!(
//!     r#"<div class="pam _3-95 _2pi0 _2lej uiBoxWhite noborder">
//!          <div class="_3-96 _2pio _2lek _2lel">Alice</div>
//!          <div class="_3-96 _2let">{body}</div>
//!          <div class="_3-94 _2lem">Jan 05, 2019 08:30PM</div>
//!        </div>"#);
//!
//! let mut doc = Document::parse_str(&(row("Duration: 2 minutes") + &row("hi")));
//! let selectors = CompiledSelectors::compile(&MESSENGER_V1)?;
//! let messages = extract_messages(&doc, &selectors, &NoopReporter, 100);
//!
//! let kept = filter_calls(&messages, &mut doc, "Duration", &NoopReporter, 100);
//! assert_eq!(kept, 1);
//! assert_eq!(doc.count(&selectors.container), 1);
//! # Ok::<(), chatsieve::ChatsieveError>(())
//! ```

use tracing::debug;

use crate::document::Document;
use crate::message::ParsedMessage;
use crate::progress::{Reporter, should_report};

/// Removes every non-call message from `document` and returns how many
/// calls were kept.
pub fn filter_calls(
    messages: &[ParsedMessage],
    document: &mut Document,
    marker: &str,
    reporter: &dyn Reporter,
    interval: usize,
) -> usize {
    let len = messages.len();
    let mut kept = 0;

    for (index, message) in messages.iter().enumerate() {
        if message.is_call(marker) {
            kept += 1;
        } else {
            document.remove(message.nodes.container);
        }

        if should_report(index, len, interval) {
            reporter.progress(index, len - 1);
        }
    }

    debug!(kept, removed = len - kept, "call filter pass finished");
    kept
}
