//! Message records extracted from an archive.
//!
//! A [`ParsedMessage`] is a view onto one container in a [`Document`]: it
//! carries the container's text fields plus [`NodeRefs`] back into the tree.
//! The handles do not own anything; the document does. They stay valid while
//! other containers are removed, which is what lets the filter and the
//! summary prune the tree while walking the extracted list.
//!
//! [`Document`]: crate::document::Document

use ego_tree::NodeId;

/// Handles of one container and its three child fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRefs {
    pub container: NodeId,
    pub title: NodeId,
    pub content: NodeId,
    pub timestamp: NodeId,
}

/// One structurally valid message container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Handles into the owning document
    pub nodes: NodeRefs,
    /// Sender line, rendered text
    pub title: String,
    /// Body, rendered text
    pub content: String,
    /// Raw timestamp text, unparsed
    pub timestamp_text: String,
}

impl ParsedMessage {
    /// Returns `true` if the body contains `marker`.
    ///
    /// Call entries in the archive carry their length (`Duration: ...`) in the
    /// body, so a plain substring test is enough.
    pub fn is_call(&self, marker: &str) -> bool {
        self.content.contains(marker)
    }
}
