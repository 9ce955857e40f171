//! Message extraction.
//!
//! [`MessageExtractor`] walks the containers matched by the profile's
//! container selector in document order and yields one [`ParsedMessage`] per
//! container that has all three child fields. Document order is the
//! canonical order for every later stage; nothing downstream re-sorts.
//!
//! Progress is reported over the raw container count, including containers
//! that are skipped, so the caller sees a stable total.

use ego_tree::NodeId;
use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::config::CompiledSelectors;
use crate::document::Document;
use crate::message::{NodeRefs, ParsedMessage};
use crate::progress::{Reporter, should_report};

/// Lazy, single-pass iterator over the messages of a document.
///
/// # Example
///
/// ```rust
/// use chatsieve::config::{CompiledSelectors, MESSENGER_V1};
/// use chatsieve::core::extractor::MessageExtractor;
/// use chatsieve::document::Document;
/// use chatsieve::progress::NoopReporter;
///
/// let html = r#"<div class="pam _3-95 _2pi0 _2lej uiBoxWhite noborder">
///   <div class="_3-96 _2pio _2lek _2lel">Alice</div>
///   <div class="_3-96 _2let">Hi</div>
///   <div class="_3-94 _2lem">Jan 05, 2019 08:30PM</div>
/// </div>"#;
///
/// let doc = Document::parse_str(html);
/// let selectors = CompiledSelectors::compile(&MESSENGER_V1)?;
/// let messages: Vec<_> = MessageExtractor::new(&doc, &selectors, &NoopReporter, 100).collect();
///
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].title, "Alice");
/// # Ok::<(), chatsieve::ChatsieveError>(())
/// ```
pub struct MessageExtractor<'a> {
    containers: std::vec::IntoIter<ElementRef<'a>>,
    selectors: &'a CompiledSelectors,
    reporter: &'a dyn Reporter,
    interval: usize,
    total: usize,
    index: usize,
    skipped: usize,
}

impl<'a> MessageExtractor<'a> {
    pub fn new(
        document: &'a Document,
        selectors: &'a CompiledSelectors,
        reporter: &'a dyn Reporter,
        interval: usize,
    ) -> Self {
        let containers: Vec<ElementRef<'a>> = document.select(&selectors.container).collect();
        let total = containers.len();
        debug!(containers = total, "selected message containers");
        Self {
            containers: containers.into_iter(),
            selectors,
            reporter,
            interval,
            total,
            index: 0,
            skipped: 0,
        }
    }

    /// Number of containers matched, valid or not.
    pub fn container_count(&self) -> usize {
        self.total
    }

    /// Containers skipped so far for missing a field.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn parse_container(&self, container: ElementRef<'_>) -> Option<ParsedMessage> {
        let (title_id, title) = first_match(container, &self.selectors.title)?;
        let (content_id, content) = first_match(container, &self.selectors.content)?;
        let (timestamp_id, timestamp_text) = first_match(container, &self.selectors.timestamp)?;

        Some(ParsedMessage {
            nodes: NodeRefs {
                container: container.id(),
                title: title_id,
                content: content_id,
                timestamp: timestamp_id,
            },
            title,
            content,
            timestamp_text,
        })
    }
}

impl Iterator for MessageExtractor<'_> {
    type Item = ParsedMessage;

    fn next(&mut self) -> Option<ParsedMessage> {
        while let Some(container) = self.containers.next() {
            let index = self.index;
            self.index += 1;

            let parsed = self.parse_container(container);

            if should_report(index, self.total, self.interval) {
                self.reporter.progress(index, self.total - 1);
            }

            match parsed {
                Some(message) => return Some(message),
                None => self.skipped += 1,
            }
        }

        if self.skipped > 0 && self.index == self.total {
            debug!(skipped = self.skipped, "skipped malformed containers");
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.containers.len()))
    }
}

fn first_match(container: ElementRef<'_>, selector: &Selector) -> Option<(NodeId, String)> {
    container
        .select(selector)
        .next()
        .map(|el| (el.id(), el.text().collect()))
}

/// Extracts every message of `document` eagerly.
pub fn extract_messages(
    document: &Document,
    selectors: &CompiledSelectors,
    reporter: &dyn Reporter,
    interval: usize,
) -> Vec<ParsedMessage> {
    MessageExtractor::new(document, selectors, reporter, interval).collect()
}
