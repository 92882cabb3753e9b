//! The repair pipeline: resolve targets, repair files, verify, summarize.
//!
//! Verification is decoupled from repair: the verifier's verdict is recorded
//! in the run artifacts but never changes file outcomes or aborts the run.

use anyhow::{Context, anyhow};
use camino::Utf8Path;
use chrono::Utc;
use srcfix_engine::{RepairOptions, repair_file, resolve_targets};
use srcfix_render::render_run_md;
use srcfix_rules::profile_names;
use srcfix_types::report::{ReportCounts, ReportStatus, ReportVerdict, SrcfixReport, ToolInfo};
use srcfix_types::run::{
    FileFailure, RunStatus, RunSummary, SrcfixRun, Verification, VerifierResult,
};
use tracing::{debug, info, warn};

use crate::ports::{VerifierPort, WritePort};
use crate::settings::RunSettings;

/// Outcome of `run_repair`.
#[derive(Debug)]
pub struct RunOutcome {
    pub run: SrcfixRun,
    pub report: SrcfixReport,
}

/// Run the repair pipeline end to end.
///
/// Configuration errors (unknown profile, invalid glob) fail before any file
/// is touched. Per-file I/O errors are recorded and skipped. The caller is
/// responsible for persisting artifacts via `write_run_artifacts`.
pub fn run_repair(
    settings: &RunSettings,
    verifier: &dyn VerifierPort,
    tool: ToolInfo,
) -> anyhow::Result<RunOutcome> {
    let rules = srcfix_rules::load_profile(&settings.profile).ok_or_else(|| {
        anyhow!(
            "unknown profile `{}` (available: {})",
            settings.profile,
            profile_names().join(", ")
        )
    })?;

    let mut run = SrcfixRun::new(tool, settings.profile.clone(), settings.root.to_string());
    run.run.started_at = Some(Utc::now());
    run.dry_run = settings.dry_run;

    let resolution = resolve_targets(&settings.root, &settings.paths, &settings.globs)
        .context("resolve targets")?;
    run.missing = resolution.missing.iter().map(|p| p.to_string()).collect();
    debug!(
        targets = resolution.targets.len(),
        missing = run.missing.len(),
        "targets resolved"
    );

    let options = RepairOptions {
        dry_run: settings.dry_run,
    };
    for target in &resolution.targets {
        match repair_file(target, &rules, &options) {
            Ok(outcome) => {
                if outcome.changed {
                    info!(
                        path = %target,
                        bytes_before = outcome.bytes_before,
                        bytes_after = outcome.bytes_after,
                        "repaired"
                    );
                } else {
                    debug!(path = %target, "no fix needed");
                }
                run.outcomes.push(outcome);
            }
            Err(err) => {
                warn!(path = %err.path(), %err, "file repair failed, continuing");
                run.failures.push(FileFailure {
                    path: err.path().to_string(),
                    stage: err.stage(),
                    message: err.to_string(),
                });
            }
        }
    }

    run.verifier = Some(match &settings.verify_command {
        Some(command) => verifier.verify(&settings.root, command, settings.verify_timeout),
        None => VerifierResult::skipped(),
    });

    run.summary = summarize(&run);
    run.run.ended_at = Some(Utc::now());

    let report = report_from_run(&run);
    Ok(RunOutcome { run, report })
}

/// Write all run artifacts to the output directory.
pub fn write_run_artifacts(
    outcome: &RunOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let run_json = serde_json::to_string_pretty(&outcome.run).context("serialize run")?;
    writer.write_file(&out_dir.join("run.json"), run_json.as_bytes())?;

    let run_md = render_run_md(&outcome.run);
    writer.write_file(&out_dir.join("run.md"), run_md.as_bytes())?;

    let report_json = serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    Ok(())
}

fn summarize(run: &SrcfixRun) -> RunSummary {
    let files_changed = run.outcomes.iter().filter(|o| o.changed).count() as u64;
    let files_errored = run.failures.len() as u64;
    let files_scanned = run.outcomes.len() as u64 + files_errored;
    let verification = run
        .verifier
        .as_ref()
        .map(|v| v.verification)
        .unwrap_or_default();

    let status = if files_errored > 0 {
        RunStatus::CompletedWithFileErrors
    } else if files_changed > 0 {
        RunStatus::CompletedModified
    } else {
        RunStatus::CompletedClean
    };

    RunSummary {
        files_scanned,
        files_changed,
        files_errored,
        verification,
        status,
    }
}

pub(crate) fn report_from_run(run: &SrcfixRun) -> SrcfixReport {
    let status = if run.summary.files_errored > 0 {
        ReportStatus::Fail
    } else if run.summary.verification == Verification::Failed {
        ReportStatus::Warn
    } else {
        ReportStatus::Pass
    };

    let mut reasons = Vec::new();
    if run.summary.files_errored > 0 {
        reasons.push("file_errors".to_string());
    }
    if run.summary.verification == Verification::Failed {
        reasons.push("verification_failed".to_string());
    }
    if !run.missing.is_empty() {
        reasons.push("missing_paths".to_string());
    }

    SrcfixReport {
        schema: srcfix_types::schema::SRCFIX_REPORT_V1.to_string(),
        tool: run.tool.clone(),
        run: run.run.clone(),
        verdict: ReportVerdict {
            status,
            counts: ReportCounts {
                info: run.summary.files_changed,
                warn: run.missing.len() as u64,
                error: run.summary.files_errored,
            },
            reasons,
        },
        data: Some(serde_json::json!({
            "srcfix": {
                "run": {
                    "profile": run.profile,
                    "files_scanned": run.summary.files_scanned,
                    "files_changed": run.summary.files_changed,
                    "files_errored": run.summary.files_errored,
                    "verification": run.summary.verification,
                    "dry_run": run.dry_run,
                }
            }
        })),
    }
}
