//! Streaming hasher: reads a file end-to-end in bounded chunks, drives the
//! digest engine, and emits throttled progress/status events.
//!
//! The read loop is blocking and runs to completion on the calling thread;
//! async embedders run it under `tokio::task::spawn_blocking` and listen on a
//! `ChannelSink`. Cancellation is cooperative, observed at chunk boundaries,
//! so its latency is bounded by one in-flight read.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ProgressConfig;
use crate::control::CancelToken;
use crate::digest::{Algorithm, DigestContext};
use crate::error::HashError;
use crate::progress::{percent_of, ProgressSample, ProgressThrottle, SpeedEstimator};

/// Status text reported when a run ends by cancellation.
pub const CANCELLED_STATUS: &str = "cancelled";

/// Where progress notifications go. Implementations must not block: the hash
/// loop calls straight into the sink between reads.
pub trait EventSink {
    fn progress(&mut self, percent: u8);
    fn status(&mut self, text: &str);
}

/// Tagged event for channel-based sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashEvent {
    /// Integer percent complete, 0-100.
    Progress(u8),
    /// Human-readable status line.
    Status(String),
}

/// Sink that forwards events over a tokio channel. Uses `try_send` so a
/// lagging receiver drops updates instead of stalling the read loop.
pub struct ChannelSink {
    tx: tokio::sync::mpsc::Sender<HashEvent>,
}

impl ChannelSink {
    pub fn new(tx: tokio::sync::mpsc::Sender<HashEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn progress(&mut self, percent: u8) {
        let _ = self.tx.try_send(HashEvent::Progress(percent));
    }

    fn status(&mut self, text: &str) {
        let _ = self.tx.try_send(HashEvent::Status(text.to_string()));
    }
}

/// Final digest of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestResult {
    pub algorithm: Algorithm,
    /// Lowercase hex, two digits per byte, no separators.
    pub hex: String,
}

/// Terminal state of a run that did not fail. Cancellation is a defined
/// outcome, never an error and never a partial digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashOutcome {
    Completed(DigestResult),
    Cancelled,
}

/// One hash computation: the file, the algorithm, the cancellation handle
/// and the run policy. Exclusively owned by the run and consumed by it.
pub struct HashJob {
    path: PathBuf,
    algorithm: Algorithm,
    cancel: CancelToken,
    chunk_bytes: usize,
    progress: ProgressConfig,
}

impl HashJob {
    pub const DEFAULT_CHUNK_BYTES: usize = 4 * 1024 * 1024;

    pub fn new(path: impl Into<PathBuf>, algorithm: Algorithm) -> Self {
        Self {
            path: path.into(),
            algorithm,
            cancel: CancelToken::new(),
            chunk_bytes: Self::DEFAULT_CHUNK_BYTES,
            progress: ProgressConfig::default(),
        }
    }

    pub fn with_chunk_bytes(mut self, chunk_bytes: usize) -> Self {
        self.chunk_bytes = chunk_bytes.max(1);
        self
    }

    pub fn with_progress(mut self, progress: ProgressConfig) -> Self {
        self.progress = progress;
        self
    }

    /// Use an externally-created token (e.g. one registered with
    /// `JobControl`) instead of the job's own.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Clone of the job's cancellation handle, for the controlling thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Run the job to its terminal state.
    ///
    /// The chunk buffer and the file handle are scoped to this call and
    /// released on every exit path; on cancellation the digest context is
    /// dropped unfinalized. The final notification of a completed run always
    /// reports exactly 100%, including for zero-byte files.
    pub fn run(self, sink: &mut dyn EventSink) -> Result<HashOutcome, HashError> {
        let meta = std::fs::metadata(&self.path).map_err(|source| HashError::Open {
            path: self.path.clone(),
            source,
        })?;
        if !meta.is_file() {
            return Err(HashError::NotAFile(self.path.clone()));
        }
        let total = meta.len();
        let mut file = File::open(&self.path).map_err(|source| HashError::Open {
            path: self.path.clone(),
            source,
        })?;

        let mut ctx = DigestContext::new(self.algorithm);
        // Reused across chunks within this job, never shared across jobs.
        let mut buf = vec![0u8; self.chunk_bytes];
        let mut bytes_done: u64 = 0;
        let mut speed = SpeedEstimator::default();
        let mut throttle =
            ProgressThrottle::new(self.progress.percent_step, self.progress.max_quiet());
        let started = Instant::now();

        tracing::debug!(
            path = %self.path.display(),
            algorithm = %self.algorithm,
            total,
            chunk_bytes = self.chunk_bytes,
            "hash job started"
        );

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!(path = %self.path.display(), bytes_done, "hash job cancelled");
                sink.status(CANCELLED_STATUS);
                sink.progress(0);
                return Ok(HashOutcome::Cancelled);
            }

            let n = file.read(&mut buf).map_err(|source| HashError::Read {
                path: self.path.clone(),
                source,
            })?;
            if n == 0 {
                break;
            }

            ctx.absorb(&buf[..n]);
            bytes_done += n as u64;

            let percent = percent_of(bytes_done, total);
            let rate = speed.update(bytes_done, started.elapsed().as_secs_f64());
            let sample = ProgressSample {
                bytes_done,
                total_bytes: total,
                percent,
                bytes_per_sec: rate,
            };
            let eta = sample.eta_clock();
            if throttle.offer(percent, &eta, Instant::now()) {
                sink.status(&sample.status_line());
                sink.progress(percent);
            }
        }

        let digest = ctx.finalize();
        if digest.is_empty() {
            return Err(HashError::EmptyDigest);
        }
        let hex = hex::encode(digest);

        if throttle.last_percent() != Some(100) {
            let sample = ProgressSample {
                bytes_done,
                total_bytes: total,
                percent: 100,
                bytes_per_sec: speed.bytes_per_sec(),
            };
            sink.status(&sample.status_line());
            sink.progress(100);
        }

        tracing::info!(
            path = %self.path.display(),
            algorithm = %self.algorithm,
            bytes_done,
            "hash job completed"
        );
        Ok(HashOutcome::Completed(DigestResult {
            algorithm: self.algorithm,
            hex,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestContext;
    use std::io::Write;

    /// Sink that records every event and can flip a cancel token once it has
    /// seen a given number of status lines.
    #[derive(Default)]
    struct RecordingSink {
        events: Vec<HashEvent>,
        cancel_after_statuses: Option<(CancelToken, usize)>,
        statuses_seen: usize,
    }

    impl RecordingSink {
        fn percents(&self) -> Vec<u8> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    HashEvent::Progress(p) => Some(*p),
                    HashEvent::Status(_) => None,
                })
                .collect()
        }
    }

    impl EventSink for RecordingSink {
        fn progress(&mut self, percent: u8) {
            self.events.push(HashEvent::Progress(percent));
        }

        fn status(&mut self, text: &str) {
            self.events.push(HashEvent::Status(text.to_string()));
            self.statuses_seen += 1;
            if let Some((token, after)) = &self.cancel_after_statuses {
                if self.statuses_seen >= *after {
                    token.cancel();
                }
            }
        }
    }

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f.flush().unwrap();
        f
    }

    fn patterned(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    /// Per-chunk emissions for tests: 1% step, no quiet window.
    fn eager_progress() -> ProgressConfig {
        ProgressConfig {
            percent_step: 1,
            max_quiet_secs: 0.0,
        }
    }

    #[test]
    fn empty_file_reports_100_and_known_digest() {
        let f = write_temp(b"");
        let mut sink = RecordingSink::default();
        let outcome = HashJob::new(f.path(), Algorithm::Sha256)
            .run(&mut sink)
            .unwrap();

        match outcome {
            HashOutcome::Completed(result) => assert_eq!(
                result.hex,
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            ),
            HashOutcome::Cancelled => panic!("unexpected cancellation"),
        }
        assert_eq!(sink.percents(), vec![100]);
        assert!(sink
            .events
            .iter()
            .any(|e| matches!(e, HashEvent::Status(s) if s == "0 bytes / 0 bytes | left: 00:00")));
    }

    #[test]
    fn chunking_invariance() {
        let data = patterned(100_000);
        let f = write_temp(&data);

        let mut whole = DigestContext::new(Algorithm::Sha256);
        whole.absorb(&data);
        let expected = hex::encode(whole.finalize());

        for chunk_bytes in [7usize, 1024, 64 * 1024, 1 << 20] {
            let mut sink = RecordingSink::default();
            let outcome = HashJob::new(f.path(), Algorithm::Sha256)
                .with_chunk_bytes(chunk_bytes)
                .run(&mut sink)
                .unwrap();
            match outcome {
                HashOutcome::Completed(result) => {
                    assert_eq!(result.hex, expected, "chunk_bytes={chunk_bytes}")
                }
                HashOutcome::Cancelled => panic!("unexpected cancellation"),
            }
        }
    }

    #[test]
    fn all_algorithms_match_single_shot() {
        let data = patterned(10_000);
        let f = write_temp(&data);

        for algorithm in Algorithm::all() {
            let mut whole = DigestContext::new(algorithm);
            whole.absorb(&data);
            let expected = hex::encode(whole.finalize());

            let mut sink = RecordingSink::default();
            let outcome = HashJob::new(f.path(), algorithm)
                .with_chunk_bytes(4096)
                .run(&mut sink)
                .unwrap();
            match outcome {
                HashOutcome::Completed(result) => {
                    assert_eq!(result.hex, expected, "{algorithm}");
                    assert_eq!(result.hex.len(), algorithm.hex_len());
                }
                HashOutcome::Cancelled => panic!("unexpected cancellation"),
            }
        }
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_100() {
        let f = write_temp(&patterned(200_000));
        let mut sink = RecordingSink::default();
        HashJob::new(f.path(), Algorithm::Md5)
            .with_chunk_bytes(4096)
            .with_progress(eager_progress())
            .run(&mut sink)
            .unwrap();

        let percents = sink.percents();
        assert!(!percents.is_empty());
        assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{percents:?}");
        assert_eq!(*percents.last().unwrap(), 100);
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let f = write_temp(&patterned(50_000));
        let run = || {
            let mut sink = RecordingSink::default();
            HashJob::new(f.path(), Algorithm::Sha512)
                .with_chunk_bytes(8192)
                .run(&mut sink)
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn cancellation_mid_run_yields_cancelled_outcome() {
        let f = write_temp(&patterned(64 * 1024));
        let job = HashJob::new(f.path(), Algorithm::Sha256)
            .with_chunk_bytes(1024)
            .with_progress(eager_progress());
        let mut sink = RecordingSink {
            cancel_after_statuses: Some((job.cancel_token(), 1)),
            ..Default::default()
        };

        let outcome = job.run(&mut sink).unwrap();
        assert_eq!(outcome, HashOutcome::Cancelled);

        // terminal events: cancelled status, then progress reset to 0
        let tail = &sink.events[sink.events.len() - 2..];
        assert_eq!(tail[0], HashEvent::Status(CANCELLED_STATUS.to_string()));
        assert_eq!(tail[1], HashEvent::Progress(0));

        // handle released: the temp file can be removed cleanly
        f.close().unwrap();
    }

    #[test]
    fn pre_cancelled_job_reads_nothing() {
        let f = write_temp(&patterned(4096));
        let job = HashJob::new(f.path(), Algorithm::Md5);
        job.cancel_token().cancel();
        let mut sink = RecordingSink::default();
        let outcome = job.run(&mut sink).unwrap();
        assert_eq!(outcome, HashOutcome::Cancelled);
        assert_eq!(sink.percents(), vec![0]);
    }

    #[test]
    fn missing_file_is_open_error() {
        let mut sink = RecordingSink::default();
        let err = HashJob::new("/nonexistent/definitely-not-here", Algorithm::Sha256)
            .run(&mut sink)
            .unwrap_err();
        assert!(matches!(err, HashError::Open { .. }), "{err}");
        assert!(sink.events.is_empty());
    }

    #[test]
    fn directory_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = RecordingSink::default();
        let err = HashJob::new(dir.path(), Algorithm::Sha256)
            .run(&mut sink)
            .unwrap_err();
        assert!(matches!(err, HashError::NotAFile(_)), "{err}");
        assert!(sink.events.is_empty());
    }

    #[test]
    fn status_lines_carry_sizes_and_eta() {
        let f = write_temp(&patterned(30_000));
        let mut sink = RecordingSink::default();
        HashJob::new(f.path(), Algorithm::Sha1)
            .with_chunk_bytes(10_000)
            .with_progress(eager_progress())
            .run(&mut sink)
            .unwrap();

        let statuses: Vec<&str> = sink
            .events
            .iter()
            .filter_map(|e| match e {
                HashEvent::Status(s) => Some(s.as_str()),
                HashEvent::Progress(_) => None,
            })
            .collect();
        assert!(!statuses.is_empty());
        for s in &statuses {
            assert!(s.contains(" / "), "{s}");
            assert!(s.contains("| left: "), "{s}");
        }
        // final status shows the full size on both sides and a zero ETA
        let last = statuses.last().unwrap();
        assert!(last.contains("29.3 KB / 29.3 KB"), "{last}");
        assert!(last.ends_with("00:00"), "{last}");
    }
}
