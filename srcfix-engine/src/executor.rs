use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use srcfix_rules::{FileKind, RuleSet};
use srcfix_types::run::FileOutcome;
use tracing::debug;

use crate::error::RepairError;

/// Suffix for the sibling temp file used during persistence.
const TMP_SUFFIX: &str = ".srcfix.tmp";

/// Execution knobs for a single repair pass over a file.
#[derive(Debug, Clone, Default)]
pub struct RepairOptions {
    /// Compute and report outcomes without touching the file on disk.
    pub dry_run: bool,
}

/// Read one file, run the rule set over it, and persist the result if it
/// changed.
///
/// Unchanged files are never rewritten, so their modification time survives
/// a run. Changed files are written to a sibling temp file first and renamed
/// into place, so a watching process never observes a partial buffer.
pub fn repair_file(
    path: &Utf8Path,
    rules: &RuleSet,
    options: &RepairOptions,
) -> Result<FileOutcome, RepairError> {
    let Some(kind) = FileKind::from_path(path) else {
        // The resolver only queues eligible files; an ineligible path
        // reaching this point is treated as a no-op rather than a failure.
        debug!(path = %path, "no rule scope for extension, leaving untouched");
        return Ok(FileOutcome {
            path: path.to_string(),
            changed: false,
            bytes_before: 0,
            bytes_after: 0,
        });
    };

    let original = fs::read_to_string(path).map_err(|source| RepairError::Read {
        path: path.to_owned(),
        source,
    })?;
    let bytes_before = original.len() as u64;

    let repaired = rules.apply(kind, &original);
    if repaired == original {
        return Ok(FileOutcome {
            path: path.to_string(),
            changed: false,
            bytes_before,
            bytes_after: bytes_before,
        });
    }

    let bytes_after = repaired.len() as u64;
    if options.dry_run {
        debug!(path = %path, bytes_before, bytes_after, "dry run, not persisting");
    } else {
        write_atomic(path, &repaired).map_err(|source| RepairError::Write {
            path: path.to_owned(),
            source,
        })?;
    }

    Ok(FileOutcome {
        path: path.to_string(),
        changed: true,
        bytes_before,
        bytes_after,
    })
}

fn write_atomic(path: &Utf8Path, contents: &str) -> std::io::Result<()> {
    let tmp = Utf8PathBuf::from(format!("{path}{TMP_SUFFIX}"));
    fs::write(&tmp, contents)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use srcfix_rules::load_profile;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn corrupted_file_is_rewritten_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "if (list.length, 0) {\n  flush();\n}\n";
        let path = write_fixture(&dir, "store.ts", contents);
        let rules = load_profile("default").unwrap();

        let outcome = repair_file(&path, &rules, &RepairOptions::default()).unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.bytes_before, contents.len() as u64);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "if (list.length > 0) {\n  flush();\n}\n"
        );
    }

    #[test]
    fn clean_file_is_left_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "const double = (x: number) => x * 2;\n";
        let path = write_fixture(&dir, "math.ts", contents);
        let rules = load_profile("default").unwrap();

        let outcome = repair_file(&path, &rules, &RepairOptions::default()).unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.bytes_before, outcome.bytes_after);
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn dry_run_reports_the_change_without_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "items.map(x =>> x.id);\n";
        let path = write_fixture(&dir, "list.ts", contents);
        let rules = load_profile("default").unwrap();

        let outcome = repair_file(&path, &rules, &RepairOptions { dry_run: true }).unwrap();

        assert!(outcome.changed);
        assert!(outcome.bytes_after < outcome.bytes_before);
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn vue_only_rules_do_not_fire_on_typescript() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "(e:, 'update:modelValue', value: string): void;\n";
        let ts = write_fixture(&dir, "emits.ts", contents);
        let rules = load_profile("default").unwrap();

        let outcome = repair_file(&ts, &rules, &RepairOptions::default()).unwrap();

        assert!(!outcome.changed);
        assert_eq!(fs::read_to_string(&ts).unwrap(), contents);
    }

    #[test]
    fn read_failure_reports_path_and_stage() {
        let dir = tempfile::tempdir().unwrap();
        // A directory with an eligible extension forces the read to fail.
        let path = Utf8PathBuf::from_path_buf(dir.path().join("trap.ts")).unwrap();
        fs::create_dir(&path).unwrap();
        let rules = load_profile("default").unwrap();

        let err = repair_file(&path, &rules, &RepairOptions::default()).unwrap_err();

        assert_eq!(err.path(), path.as_path());
        assert_eq!(err.stage(), srcfix_types::run::FailureStage::Read);
    }

    #[test]
    fn no_temp_file_survives_a_successful_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "app.vue", "(e:, 'update:modelValue', value: string): void;\n");
        let rules = load_profile("default").unwrap();

        let outcome = repair_file(&path, &rules, &RepairOptions::default()).unwrap();

        assert!(outcome.changed);
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(TMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }
}
