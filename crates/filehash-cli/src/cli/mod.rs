//! CLI for the filehash digest tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use filehash_core::config;
use std::path::Path;

use commands::{run_hash, run_verify};

/// Top-level CLI for the filehash digest tool.
#[derive(Debug, Parser)]
#[command(name = "filehash")]
#[command(about = "Streaming file digests with progress, ETA and cancellation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compute a digest of a file, with live progress on stderr.
    Hash {
        /// Path to the file.
        path: String,

        /// Digest algorithm: md5, sha1, sha256, sha384 or sha512.
        #[arg(long, short, default_value = "sha256")]
        algorithm: String,

        /// Expected digest; when given, the computed digest is compared
        /// against it and a mismatch exits non-zero.
        #[arg(long)]
        expect: Option<String>,
    },

    /// Compute a digest and compare it against an expected one.
    Verify {
        /// Path to the file.
        path: String,

        /// Expected digest (case and non-hex separators are tolerated).
        digest: String,

        /// Digest algorithm: md5, sha1, sha256, sha384 or sha512.
        #[arg(long, short, default_value = "sha256")]
        algorithm: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Hash {
                path,
                algorithm,
                expect,
            } => run_hash(Path::new(&path), &algorithm, expect.as_deref(), &cfg).await?,
            CliCommand::Verify {
                path,
                digest,
                algorithm,
            } => run_verify(Path::new(&path), &digest, &algorithm, &cfg).await?,
        }

        Ok(())
    }
}
