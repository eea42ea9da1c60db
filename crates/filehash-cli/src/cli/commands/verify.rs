//! Verify command: compute a digest and compare it against the expected one.

use std::path::Path;

use anyhow::Result;
use filehash_core::config::FilehashConfig;
use filehash_core::HashOutcome;

use super::hash::{compute_with_progress, report_comparison};

pub async fn run_verify(
    path: &Path,
    digest: &str,
    algorithm: &str,
    cfg: &FilehashConfig,
) -> Result<()> {
    match compute_with_progress(path, algorithm, cfg).await? {
        HashOutcome::Completed(result) => {
            println!("{}  {}", result.hex, path.display());
            report_comparison(&result.hex, digest)
        }
        HashOutcome::Cancelled => {
            eprintln!("cancelled");
            Ok(())
        }
    }
}
