//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chatsieve::progress::{Progress, ThreadMessage};

/// Builder for synthetic archive documents.
#[derive(Default)]
pub struct ArchiveBuilder {
    rows: Vec<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a well-formed message container.
    pub fn message(mut self, sender: &str, body: &str, timestamp: &str) -> Self {
        self.rows.push(format!(
            r#"<div class="pam _3-95 _2pi0 _2lej uiBoxWhite noborder"><div class="_3-96 _2pio _2lek _2lel">{sender}</div><div class="_3-96 _2let"><div><div></div><div>{body}</div><div></div><div></div></div></div><div class="_3-94 _2lem">{timestamp}</div></div>"#
        ));
        self
    }

    /// Adds a call entry.
    pub fn call(self, sender: &str, minutes: u32, timestamp: &str) -> Self {
        let body = format!("{sender} called you. Duration: {minutes} minutes");
        self.message(sender, &body, timestamp)
    }

    /// Adds a container with no timestamp element.
    pub fn malformed(mut self, sender: &str, body: &str) -> Self {
        self.rows.push(format!(
            r#"<div class="pam _3-95 _2pi0 _2lej uiBoxWhite noborder"><div class="_3-96 _2pio _2lek _2lel">{sender}</div><div class="_3-96 _2let">{body}</div></div>"#
        ));
        self
    }

    pub fn build(&self) -> String {
        format!(
            "<html><head><meta charset=\"utf-8\"><title>Bob</title></head><body>\
             <div class=\"_4t5n\" role=\"main\">{}</div></body></html>",
            self.rows.concat()
        )
    }

    /// Writes the archive as `message.html` into `dir`.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let path = dir.join("message.html");
        fs::write(&path, self.build()).unwrap();
        path
    }
}

/// Counts message containers in serialized markup.
pub fn count_containers(html: &str) -> usize {
    html.matches(r#"class="pam _3-95 _2pi0 _2lej uiBoxWhite noborder""#)
        .count()
}

/// Reporter that records everything it receives.
pub type Recorded = Arc<Mutex<Vec<ThreadMessage>>>;

pub fn recorder() -> (Recorded, impl Fn(ThreadMessage) + Send + Sync) {
    let seen: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = Arc::clone(&seen);
        move |msg: ThreadMessage| seen.lock().unwrap().push(msg)
    };
    (seen, sink)
}

pub fn logs(seen: &Recorded) -> Vec<String> {
    seen.lock()
        .unwrap()
        .iter()
        .filter_map(|m| m.as_log().map(str::to_owned))
        .collect()
}

pub fn progress(seen: &Recorded) -> Vec<Progress> {
    seen.lock()
        .unwrap()
        .iter()
        .filter_map(ThreadMessage::as_progress)
        .collect()
}
