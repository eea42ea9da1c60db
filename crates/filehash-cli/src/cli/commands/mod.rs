//! CLI command handlers.

mod hash;
mod verify;

pub use hash::run_hash;
pub use verify::run_verify;
