pub mod config;
pub mod logging;

pub mod compare;
pub mod control;
pub mod digest;
pub mod error;
pub mod hasher;
pub mod progress;
pub mod units;

pub use compare::{compare, ComparisonOutcome};
pub use control::{CancelToken, JobControl};
pub use digest::{Algorithm, DigestContext};
pub use error::HashError;
pub use hasher::{ChannelSink, DigestResult, EventSink, HashEvent, HashJob, HashOutcome};
pub use progress::ProgressSample;
