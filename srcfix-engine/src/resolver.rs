use std::collections::BTreeSet;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use srcfix_rules::FileKind;
use tracing::{debug, warn};

/// Outcome of target resolution.
///
/// `targets` is sorted and deduplicated so a path contributed by both an
/// explicit argument and a glob is repaired exactly once. `missing` records
/// explicit paths that do not exist; glob patterns matching nothing are not
/// an error and contribute nothing here.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub targets: Vec<Utf8PathBuf>,
    pub missing: Vec<Utf8PathBuf>,
}

/// Expand explicit paths and glob patterns into the candidate file set.
///
/// Relative inputs are anchored at `root`. Files whose extension no rule
/// scope recognizes are skipped with a debug note, as are non-UTF-8 paths.
pub fn resolve_targets(
    root: &Utf8Path,
    explicit: &[Utf8PathBuf],
    patterns: &[String],
) -> anyhow::Result<Resolution> {
    let mut targets = BTreeSet::new();
    let mut missing = Vec::new();

    for path in explicit {
        let anchored = anchor(root, path);
        if !anchored.exists() {
            warn!(path = %anchored, "requested file does not exist, skipping");
            missing.push(anchored);
            continue;
        }
        if FileKind::from_path(&anchored).is_none() {
            debug!(path = %anchored, "extension not covered by any rule scope, skipping");
            continue;
        }
        targets.insert(anchored);
    }

    for pattern in patterns {
        let full = if Utf8Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            root.join(pattern).into_string()
        };
        let entries =
            glob::glob(&full).with_context(|| format!("invalid glob pattern `{pattern}`"))?;
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!(%err, "skipping unreadable glob entry");
                    continue;
                }
            };
            let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                warn!("skipping non-UTF-8 path from glob expansion");
                continue;
            };
            if !path.is_file() || FileKind::from_path(&path).is_none() {
                continue;
            }
            targets.insert(path);
        }
    }

    Ok(Resolution {
        targets: targets.into_iter().collect(),
        missing,
    })
}

fn anchor(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    fn touch(root: &Utf8Path, rel: &str) {
        let path = root.join(rel);
        fs_err::create_dir_all(path.parent().unwrap()).unwrap();
        fs_err::write(&path, "export {};\n").unwrap();
    }

    #[test]
    fn globs_pick_up_eligible_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root, "src/main.ts");
        touch(&root, "src/App.vue");
        touch(&root, "src/types.d.mts");
        touch(&root, "src/readme.md");
        touch(&root, "src/util.js");

        let resolution =
            resolve_targets(&root, &[], &["src/**/*".to_string()]).unwrap();

        let names: Vec<_> = resolution
            .targets
            .iter()
            .map(|p| p.file_name().unwrap())
            .collect();
        assert_eq!(names, vec!["App.vue", "main.ts", "types.d.mts"]);
        assert!(resolution.missing.is_empty());
    }

    #[test]
    fn explicit_path_and_glob_overlap_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root, "src/main.ts");

        let resolution = resolve_targets(
            &root,
            &[Utf8PathBuf::from("src/main.ts")],
            &["src/*.ts".to_string()],
        )
        .unwrap();

        assert_eq!(resolution.targets.len(), 1);
    }

    #[test]
    fn missing_explicit_path_is_recorded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root, "src/main.ts");

        let resolution = resolve_targets(
            &root,
            &[
                Utf8PathBuf::from("src/main.ts"),
                Utf8PathBuf::from("src/gone.ts"),
            ],
            &[],
        )
        .unwrap();

        assert_eq!(resolution.targets.len(), 1);
        assert_eq!(resolution.missing.len(), 1);
        assert!(resolution.missing[0].as_str().ends_with("gone.ts"));
    }

    #[test]
    fn pattern_matching_nothing_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8_root(&dir);

        let resolution =
            resolve_targets(&root, &[], &["src/**/*.ts".to_string()]).unwrap();

        assert!(resolution.targets.is_empty());
        assert!(resolution.missing.is_empty());
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8_root(&dir);

        let err = resolve_targets(&root, &[], &["src/***.ts".to_string()]).unwrap_err();
        assert!(err.to_string().contains("invalid glob pattern"));
    }

    #[test]
    fn explicit_ineligible_extension_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root, "notes.md");

        let resolution =
            resolve_targets(&root, &[Utf8PathBuf::from("notes.md")], &[]).unwrap();

        assert!(resolution.targets.is_empty());
        assert!(resolution.missing.is_empty());
    }

    #[test]
    fn targets_come_back_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root, "b.ts");
        touch(&root, "a.ts");
        touch(&root, "c.vue");

        let resolution = resolve_targets(
            &root,
            &[
                Utf8PathBuf::from("c.vue"),
                Utf8PathBuf::from("b.ts"),
                Utf8PathBuf::from("a.ts"),
            ],
            &[],
        )
        .unwrap();

        let names: Vec<_> = resolution
            .targets
            .iter()
            .map(|p| p.file_name().unwrap())
            .collect();
        assert_eq!(names, vec!["a.ts", "b.ts", "c.vue"]);
    }
}
