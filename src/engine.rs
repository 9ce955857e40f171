//! The operation engine.
//!
//! One [`Engine::run`] call is one operation: load the archive, extract its
//! messages once, then run the call filter and/or the summary. Each stage
//! works on its own copy of the loaded document and writes its own output
//! file next to the input, only after that stage fully succeeded.
//!
//! [`Engine::handle`] is the caller-facing entry point. It validates the raw
//! request and turns any failure into a single `Error: ...` log line, so a
//! failed operation never takes the engine down with it.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatsieve::engine::Engine;
//! use chatsieve::request::OperationRequest;
//! use chatsieve::core::SummaryType;
//! use chatsieve::progress::NoopReporter;
//!
//! let engine = Engine::default();
//! let request = OperationRequest::new("export/message.html", true, Some(SummaryType::Monthly))?;
//! let outcome = engine.run(&request, &NoopReporter)?;
//!
//! println!("{} messages, calls in {:?}", outcome.messages_found, outcome.call_log);
//! # Ok::<(), chatsieve::ChatsieveError>(())
//! ```

use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::{CompiledSelectors, EngineConfig};
use crate::core::extractor::extract_messages;
use crate::core::filter::filter_calls;
use crate::core::models::{OperationOutcome, StageOutcome, SummaryType};
use crate::core::summary::{aggregate, rewrite_buckets};
use crate::document::Document;
use crate::error::Result;
use crate::message::ParsedMessage;
use crate::progress::Reporter;
use crate::request::{OperationRequest, RequestPayload};

/// Everything a stage needs from the running operation.
pub struct OperationContext<'a> {
    pub config: &'a EngineConfig,
    pub request: &'a OperationRequest,
    pub reporter: &'a dyn Reporter,
}

impl OperationContext<'_> {
    fn interval(&self) -> usize {
        self.config.progress_interval
    }
}

/// Runs operations; holds no per-operation state.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates and runs a raw request, reporting failures as a log line.
    ///
    /// Returns `None` if the request was rejected or the operation failed.
    pub fn handle(
        &self,
        payload: RequestPayload,
        reporter: &dyn Reporter,
    ) -> Option<OperationOutcome> {
        let result = payload
            .validate()
            .and_then(|request| self.run(&request, reporter));

        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "operation failed");
                reporter.log(&format!("Error: {}", e));
                None
            }
        }
    }

    /// Runs one validated operation.
    pub fn run(
        &self,
        request: &OperationRequest,
        reporter: &dyn Reporter,
    ) -> Result<OperationOutcome> {
        let started = Instant::now();
        let ctx = OperationContext {
            config: &self.config,
            request,
            reporter,
        };
        info!(path = %request.full_path.display(), "starting operation");

        let selectors = CompiledSelectors::compile(self.config.profile())?;

        reporter.log(&format!("Loading file {}", request.file_name()));
        let document = Document::load(&request.full_path)?;

        reporter.log("Extracting messages");
        let messages = extract_messages(&document, &selectors, reporter, ctx.interval());
        reporter.log(&format!("Found {} messages", messages.len()));

        let mut outcome = OperationOutcome {
            messages_found: messages.len(),
            ..OperationOutcome::default()
        };

        // Only a two-stage run needs a second tree
        let (call_doc, summary_doc) = match (request.call_filter, request.messages_summary) {
            (true, true) => (Some(document.clone()), Some(document)),
            (true, false) => (Some(document), None),
            (false, _) => (None, Some(document)),
        };

        if let Some(document) = call_doc {
            outcome.call_log = Some(run_call_filter(&ctx, &messages, document)?);
        }

        if let Some(document) = summary_doc {
            outcome.statistic = Some(run_summary(
                &ctx,
                &messages,
                document,
                request.summary_type,
            )?);
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            messages = outcome.messages_found,
            "operation finished"
        );
        Ok(outcome)
    }
}

fn run_call_filter(
    ctx: &OperationContext<'_>,
    messages: &[ParsedMessage],
    mut document: Document,
) -> Result<StageOutcome> {
    ctx.reporter.log("Filtering call messages");
    let kept = filter_calls(
        messages,
        &mut document,
        &ctx.config.call_marker,
        ctx.reporter,
        ctx.interval(),
    );

    let path = ctx.request.sibling(&ctx.config.call_log_file_name);
    write_output(&document, &path)?;

    ctx.reporter.log(&format!(
        "Found {} call messages. Saved to {}",
        kept,
        path.display()
    ));
    Ok(StageOutcome { path, count: kept })
}

fn run_summary(
    ctx: &OperationContext<'_>,
    messages: &[ParsedMessage],
    mut document: Document,
    summary_type: SummaryType,
) -> Result<StageOutcome> {
    ctx.reporter
        .log(&format!("Building {} message statistics", summary_type));
    let buckets = aggregate(
        messages,
        &mut document,
        summary_type,
        ctx.reporter,
        ctx.interval(),
    )?;
    rewrite_buckets(&buckets, &mut document);

    let path = ctx.request.sibling(&ctx.config.statistic_file_name);
    write_output(&document, &path)?;

    ctx.reporter.log(&format!(
        "Created {} {} statistics. Saved to {}",
        buckets.len(),
        summary_type,
        path.display()
    ));
    Ok(StageOutcome {
        path,
        count: buckets.len(),
    })
}

fn write_output(document: &Document, path: &Path) -> Result<()> {
    document.write_to(path)?;
    info!(path = %path.display(), "output written");
    Ok(())
}
