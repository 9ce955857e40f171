//! Summary aggregation.
//!
//! Collapses an archive into one entry per month or week. The first message
//! of each window stays in the document as the bucket's representative; every
//! later message of the same window is detached as soon as it is seen. Once
//! all messages are assigned, [`rewrite_buckets`] overwrites each
//! representative with the window's range and message count.
//!
//! Buckets are kept in the order their window was first seen in the archive,
//! not sorted by window start. For an archive that is not chronological the
//! rewritten entries therefore follow source order.

use std::collections::HashMap;

use tracing::debug;

use crate::core::models::{SummaryType, TimeBucket};
use crate::document::Document;
use crate::error::Result;
use crate::message::ParsedMessage;
use crate::progress::{Reporter, should_report};
use crate::timestamp::{format_timestamp, parse_timestamp};

/// Buckets in first-seen order, with a key index.
#[derive(Debug, Default)]
pub struct BucketSet {
    buckets: Vec<TimeBucket>,
    index: HashMap<String, usize>,
}

impl BucketSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a bucket by its canonical key.
    pub fn get(&self, key: &str) -> Option<&TimeBucket> {
        self.index.get(key).map(|&i| &self.buckets[i])
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeBucket> {
        self.buckets.iter()
    }
}

/// Assigns every message to its window, pruning non-representative
/// containers from `document`.
///
/// # Errors
///
/// Returns [`ChatsieveError::TimestampParse`](crate::ChatsieveError::TimestampParse)
/// on the first timestamp that does not match. The document is left
/// partially pruned and must not be written.
pub fn aggregate(
    messages: &[ParsedMessage],
    document: &mut Document,
    summary_type: SummaryType,
    reporter: &dyn Reporter,
    interval: usize,
) -> Result<BucketSet> {
    let len = messages.len();
    let mut set = BucketSet::new();

    for (index, message) in messages.iter().enumerate() {
        let instant = parse_timestamp(&message.timestamp_text)?;
        let window = summary_type.window(instant);
        let key = window.key();

        match set.index.get(&key) {
            Some(&slot) => {
                document.remove(message.nodes.container);
                set.buckets[slot].observe(instant);
            }
            None => {
                set.index.insert(key, set.buckets.len());
                set.buckets
                    .push(TimeBucket::new(window, instant, message.nodes));
            }
        }

        if should_report(index, len, interval) {
            reporter.progress(index, len - 1);
        }
    }

    debug!(buckets = set.len(), %summary_type, "summary pass finished");
    Ok(set)
}

/// Rewrites each representative to show its bucket's aggregate.
pub fn rewrite_buckets(buckets: &BucketSet, document: &mut Document) {
    for bucket in buckets.iter() {
        let nodes = &bucket.representative;
        document.set_text(nodes.title, &range_label(bucket));
        document.set_text(nodes.content, &count_label(bucket));
        document.set_text(nodes.timestamp, "");
    }
}

/// `From <first> to <last>` in archive timestamp format.
pub fn range_label(bucket: &TimeBucket) -> String {
    format!(
        "From {} to {}",
        format_timestamp(&bucket.first_seen),
        format_timestamp(&bucket.last_seen)
    )
}

pub fn count_label(bucket: &TimeBucket) -> String {
    format!("Total messages count: {}", bucket.count)
}
