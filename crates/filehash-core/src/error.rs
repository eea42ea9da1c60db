//! Error types for hash jobs.
//!
//! Cancellation is deliberately absent: a cancelled run is a normal terminal
//! outcome (`HashOutcome::Cancelled`), not a failure.

use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of a hash job, from precondition checks through the read loop.
#[derive(Debug, Error)]
pub enum HashError {
    /// Algorithm name did not parse to a supported algorithm. Reported before
    /// any I/O happens.
    #[error("unsupported algorithm: {0:?}")]
    UnsupportedAlgorithm(String),

    /// Path exists but is not a regular file (directory, socket, ...).
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// Could not stat or open the file (missing, unreadable). Precondition
    /// failure; the read loop was never entered.
    #[error("open {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failed mid-stream (file vanished, device error). Any partial
    /// digest state is discarded.
    #[error("read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Finalize produced no bytes. Cannot happen with the built-in
    /// algorithms; indicates a bug if observed.
    #[error("digest finalization produced no bytes")]
    EmptyDigest,
}
