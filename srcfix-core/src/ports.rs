//! Port traits abstracting subprocess and write I/O away from the pipeline.

use std::time::Duration;

use camino::Utf8Path;
use srcfix_types::run::VerifierResult;

/// External verification command.
///
/// Infallible by contract: a verifier that cannot be started or does not
/// finish in time reports `verification: unknown` rather than an error, so
/// the repair outcome is never hostage to the verifier.
pub trait VerifierPort {
    fn verify(&self, root: &Utf8Path, command: &str, timeout: Duration) -> VerifierResult;
}

/// File-system write operations for run artifacts.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
