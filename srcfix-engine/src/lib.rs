//! Repair engine for srcfix.
//!
//! Responsibilities:
//! - Resolve candidate files from explicit paths and recursive globs.
//! - Apply a rule set to one file at a time, pass by pass.
//! - Persist changed buffers atomically (temp file + rename).
//!
//! Failures are file-scoped: one bad file never sinks the run.

mod error;
mod executor;
mod resolver;

pub use error::RepairError;
pub use executor::{RepairOptions, repair_file};
pub use resolver::{Resolution, resolve_targets};
