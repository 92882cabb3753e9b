//! Run coordination for srcfix, extracted from the CLI.
//!
//! The pipeline here is I/O-light: file repair goes through
//! `srcfix-engine`, while verification and artifact writes go through the
//! port traits so callers can substitute in-memory implementations.

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use adapters::{FsWritePort, ShellVerifier};
pub use pipeline::{RunOutcome, run_repair, write_run_artifacts};
pub use ports::{VerifierPort, WritePort};
pub use settings::RunSettings;
