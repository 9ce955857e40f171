//! # chatsieve CLI
//!
//! Command-line interface for the chatsieve library.

use std::io::{self, BufRead, Write};
use std::process;
use std::thread;

use clap::Parser as ClapParser;
use tracing_subscriber::{EnvFilter, fmt};

use chatsieve::cli::Args;
use chatsieve::engine::Engine;
use chatsieve::progress::ThreadMessage;
use chatsieve::request::RequestPayload;
use chatsieve::worker::Worker;
use chatsieve::ChatsieveError;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(&args);

    let result = if args.serve { serve() } else { run(&args) };
    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// One operation in-process: log lines to stdout, progress to stderr.
fn run(args: &Args) -> Result<(), ChatsieveError> {
    let request = args.to_request()?;
    let quiet = args.quiet;

    println!("📦 chatsieve v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let printer = move |msg: ThreadMessage| {
        if let Some(line) = msg.as_log() {
            println!("{}", line);
        } else if let Some(progress) = msg.as_progress().filter(|_| !quiet) {
            eprint!("\r   {:>5.1}%", progress.percentage());
            if progress.is_complete() {
                eprintln!();
            }
        }
    };

    let outcome = Engine::default().run(&request, &printer)?;

    println!();
    println!("✅ Done! {} messages processed", outcome.messages_found);
    Ok(())
}

/// JSON-lines transport: requests on stdin, notifications on stdout.
///
/// Requests run in input order; each one starts after the previous finished.
fn serve() -> Result<(), ChatsieveError> {
    let (worker, notifications) = Worker::spawn(Engine::default())?;

    let printer = thread::spawn(move || {
        let stdout = io::stdout();
        for msg in notifications {
            let mut out = stdout.lock();
            if let Ok(line) = serde_json::to_string(&msg) {
                let _ = writeln!(out, "{}", line);
                let _ = out.flush();
            }
        }
    });

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match RequestPayload::from_json(&line) {
            // One operation at a time: the next line waits for the current one
            Ok(payload) => {
                worker.wait_idle()?;
                worker.submit(payload)?;
            }
            Err(e) => emit_direct(&ThreadMessage::log(format!("Error: {}", e))),
        }
    }

    worker.shutdown()?;
    let _ = printer.join();
    Ok(())
}

fn emit_direct(msg: &ThreadMessage) {
    if let Ok(line) = serde_json::to_string(msg) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}
