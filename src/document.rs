//! Mutable archive document.
//!
//! [`Document`] wraps the parsed HTML tree. The tree is an arena: every node
//! is addressed by a stable [`NodeId`], so detaching one node never
//! invalidates the handle of another. Removal and text rewrites are explicit
//! operations by id.
//!
//! # Example
//!
//! ```rust
//! use chatsieve::document::Document;
//! use scraper::Selector;
//!
//! let mut doc = Document::parse_str("<p class=\"a\">one</p><p class=\"a\">two</p>");
//! let sel = Selector::parse("p.a").unwrap();
//!
//! let first = doc.select_ids(&sel)[0];
//! doc.remove(first);
//!
//! assert_eq!(doc.count(&sel), 1);
//! assert!(doc.to_html().contains("two"));
//! ```

use std::fs;
use std::path::Path;

use ego_tree::NodeId;
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{ChatsieveError, Result};

/// A loaded archive, exclusively owned by one operation.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Reads and parses the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatsieveError::Load`] if the file cannot be read or is not
    /// UTF-8 text.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| ChatsieveError::load(path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| ChatsieveError::load(path, e))?;
        Ok(Self::parse_str(&content))
    }

    /// Parses markup already in memory.
    pub fn parse_str(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
        }
    }

    /// Returns all elements matching `selector` in document order.
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> scraper::html::Select<'a, 'b> {
        self.html.select(selector)
    }

    /// Returns the ids of all elements matching `selector` in document order.
    pub fn select_ids(&self, selector: &Selector) -> Vec<NodeId> {
        self.html.select(selector).map(|el| el.id()).collect()
    }

    /// Counts attached elements matching `selector`.
    pub fn count(&self, selector: &Selector) -> usize {
        self.html.select(selector).count()
    }

    /// Returns the rendered text content of an element.
    pub fn text(&self, id: NodeId) -> Option<String> {
        let node = self.html.tree.get(id)?;
        ElementRef::wrap(node).map(|el| el.text().collect())
    }

    /// Replaces every child of the element with a single text node.
    ///
    /// An empty `text` leaves the element with no children. Returns `false`
    /// if `id` is not in the tree.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        while let Some(mut child) = node.first_child() {
            child.detach();
        }
        if !text.is_empty() {
            node.append(Node::Text(Text { text: text.into() }));
        }
        true
    }

    /// Detaches a node from its parent; it drops out of serialization.
    ///
    /// Returns `false` if `id` is not in the tree.
    pub fn remove(&mut self, id: NodeId) -> bool {
        match self.html.tree.get_mut(id) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the node is still reachable from the document root.
    #[cfg(test)]
    fn is_attached(&self, id: NodeId) -> bool {
        let root = self.html.tree.root().id();
        let Some(node) = self.html.tree.get(id) else {
            return false;
        };
        node.id() == root || node.ancestors().any(|a| a.id() == root)
    }

    /// Serializes the whole tree back to markup.
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    /// Serializes the tree to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_html())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<html><body>
        <div class="msg"><span class="t">Alice</span><span class="b">Hi <b>there</b></span></div>
        <div class="msg"><span class="t">Bob</span><span class="b">Hello</span></div>
    </body></html>"#;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_select_ids_in_document_order() {
        let doc = Document::parse_str(SAMPLE);
        let ids = doc.select_ids(&sel("span.t"));
        assert_eq!(ids.len(), 2);
        assert_eq!(doc.text(ids[0]).unwrap(), "Alice");
        assert_eq!(doc.text(ids[1]).unwrap(), "Bob");
    }

    #[test]
    fn test_text_is_rendered_not_markup() {
        let doc = Document::parse_str(SAMPLE);
        let id = doc.select_ids(&sel("span.b"))[0];
        assert_eq!(doc.text(id).unwrap(), "Hi there");
    }

    #[test]
    fn test_remove_keeps_other_handles_valid() {
        let mut doc = Document::parse_str(SAMPLE);
        let msgs = doc.select_ids(&sel("div.msg"));
        let bob_title = doc.select_ids(&sel("span.t"))[1];

        assert!(doc.remove(msgs[0]));
        assert!(!doc.is_attached(msgs[0]));
        assert!(doc.is_attached(msgs[1]));
        assert_eq!(doc.text(bob_title).unwrap(), "Bob");
        assert_eq!(doc.count(&sel("div.msg")), 1);
        assert!(!doc.to_html().contains("Alice"));
    }

    #[test]
    fn test_set_text_replaces_children() {
        let mut doc = Document::parse_str(SAMPLE);
        let id = doc.select_ids(&sel("span.b"))[0];
        assert!(doc.set_text(id, "Total messages count: 3"));
        assert_eq!(doc.text(id).unwrap(), "Total messages count: 3");
        assert!(!doc.to_html().contains("<b>there</b>"));
    }

    #[test]
    fn test_set_text_escapes_markup() {
        let mut doc = Document::parse_str(SAMPLE);
        let id = doc.select_ids(&sel("span.t"))[0];
        doc.set_text(id, "<script>");
        assert!(doc.to_html().contains("&lt;script&gt;"));
    }

    #[test]
    fn test_set_text_empty_blanks_element() {
        let mut doc = Document::parse_str(SAMPLE);
        let id = doc.select_ids(&sel("span.t"))[1];
        doc.set_text(id, "");
        assert_eq!(doc.text(id).unwrap(), "");
    }

    #[test]
    fn test_clone_shares_node_ids() {
        let doc = Document::parse_str(SAMPLE);
        let id = doc.select_ids(&sel("div.msg"))[0];
        let mut copy = doc.clone();
        copy.remove(id);
        assert!(doc.is_attached(id));
        assert!(!copy.is_attached(id));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Document::load(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(err.is_load());
    }

    #[test]
    fn test_load_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.html");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(Document::load(&path).unwrap_err().is_load());
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        fs::write(&path, "stale").unwrap();
        Document::parse_str(SAMPLE).write_to(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Alice"));
        assert!(!written.contains("stale"));
    }
}
