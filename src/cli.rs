//! Command-line interface definition using clap.
//!
//! This module defines [`Args`]. Without `--serve` the binary runs one
//! operation on `INPUT`; with `--serve` it reads JSON requests from stdin and
//! writes JSON notifications to stdout, one per line.

use clap::Parser;

use crate::core::SummaryType;
use crate::error::Result;
use crate::request::OperationRequest;

/// Filter a chat-log HTML archive down to calls, or collapse it into
/// monthly/weekly summaries.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatsieve")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatsieve inbox/bob/message.html --calls
    chatsieve message.html --summary weekly
    chatsieve message.html --calls --summary monthly
    chatsieve --serve < requests.jsonl")]
pub struct Args {
    /// Path to the archive HTML file
    #[arg(required_unless_present = "serve")]
    pub input: Option<String>,

    /// Keep only call entries (writes CallLog.html)
    #[arg(short, long)]
    pub calls: bool,

    /// Collapse messages into summary blocks (writes MessageStatistic.html)
    #[arg(short, long, value_enum, value_name = "TYPE")]
    pub summary: Option<SummaryType>,

    /// Read JSON requests from stdin, one per line, and run them in order;
    /// write JSON notifications to stdout
    #[arg(long, conflicts_with_all = ["input", "calls", "summary"])]
    pub serve: bool,

    /// Do not print progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Print engine diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the one-shot request from the arguments.
    pub fn to_request(&self) -> Result<OperationRequest> {
        OperationRequest::new(
            self.input.clone().unwrap_or_default(),
            self.calls,
            self.summary,
        )
    }

    /// Default tracing filter directive.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "chatsieve=info"
        } else {
            "chatsieve=warn"
        }
    }
}
