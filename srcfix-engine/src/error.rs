use camino::{Utf8Path, Utf8PathBuf};
use srcfix_types::run::FailureStage;

/// A file-scoped repair failure.
///
/// Rule application itself is infallible; only I/O can fail. Callers record
/// the failure for the offending file and continue with the rest of the
/// candidate set.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    #[error("read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepairError {
    pub fn path(&self) -> &Utf8Path {
        match self {
            RepairError::Read { path, .. } | RepairError::Write { path, .. } => path,
        }
    }

    pub fn stage(&self) -> FailureStage {
        match self {
            RepairError::Read { .. } => FailureStage::Read,
            RepairError::Write { .. } => FailureStage::Write,
        }
    }
}
