//! Hash command: compute a digest with live progress and optional comparison.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use filehash_core::config::FilehashConfig;
use filehash_core::{
    compare, Algorithm, ChannelSink, HashEvent, HashJob, HashOutcome, JobControl,
};

/// Compute and print the digest; with `--expect`, also compare.
pub async fn run_hash(
    path: &Path,
    algorithm: &str,
    expect: Option<&str>,
    cfg: &FilehashConfig,
) -> Result<()> {
    match compute_with_progress(path, algorithm, cfg).await? {
        HashOutcome::Completed(result) => {
            println!("{}  {}", result.hex, path.display());
            if let Some(expected) = expect {
                report_comparison(&result.hex, expected)?;
            }
            Ok(())
        }
        HashOutcome::Cancelled => {
            eprintln!("cancelled");
            Ok(())
        }
    }
}

/// Shared by `hash` and `verify`: run the job on a blocking thread, render
/// events to stderr, and wire Ctrl-C to cooperative cancellation.
pub(super) async fn compute_with_progress(
    path: &Path,
    algorithm: &str,
    cfg: &FilehashConfig,
) -> Result<HashOutcome> {
    let algorithm: Algorithm = algorithm.parse()?;
    let control = Arc::new(JobControl::new());

    let job = HashJob::new(path, algorithm)
        .with_chunk_bytes(cfg.chunk_bytes)
        .with_progress(cfg.progress())
        .with_cancel(control.begin());

    let ctrlc_control = Arc::clone(&control);
    let ctrlc = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, requesting cancellation");
            ctrlc_control.cancel_active();
        }
    });

    let (tx, mut rx) = tokio::sync::mpsc::channel(64);
    let worker = tokio::task::spawn_blocking(move || {
        let mut sink = ChannelSink::new(tx);
        job.run(&mut sink)
    });

    // Status arrives first, the matching percent right after; redraw one
    // stderr line per percent update.
    let mut last_status = String::new();
    while let Some(event) = rx.recv().await {
        match event {
            HashEvent::Status(status) => last_status = status,
            HashEvent::Progress(percent) => {
                eprint!("\r\x1b[2K{percent:>3}% {last_status}");
            }
        }
    }
    eprintln!();

    ctrlc.abort();
    let outcome = worker.await?;
    control.finish();
    Ok(outcome?)
}

/// Print the comparison verdict; a mismatch is a non-zero exit.
pub(super) fn report_comparison(computed: &str, expected: &str) -> Result<()> {
    let outcome = compare(computed, expected);
    if outcome.matches {
        println!("OK: digests match");
        Ok(())
    } else {
        println!(
            "MISMATCH:\n  computed: {}\n  expected: {}",
            outcome.computed, outcome.user_input
        );
        anyhow::bail!("digest mismatch")
    }
}
