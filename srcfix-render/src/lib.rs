//! Rendering helpers (markdown) for human-readable artifacts.

use srcfix_types::run::{FailureStage, RunStatus, SrcfixRun, Verification};

pub fn render_run_md(run: &SrcfixRun) -> String {
    let mut out = String::new();
    out.push_str("# srcfix run\n\n");
    out.push_str(&format!("- Profile: `{}`\n", run.profile));
    out.push_str(&format!("- Root: `{}`\n", run.root));
    if run.dry_run {
        out.push_str("- Dry run: `true`\n");
    }
    out.push_str(&format!(
        "- Files: {} scanned, {} changed, {} errored\n",
        run.summary.files_scanned, run.summary.files_changed, run.summary.files_errored
    ));
    out.push_str(&format!(
        "- Verification: `{}`\n",
        verification_label(run.summary.verification)
    ));
    out.push_str(&format!(
        "- Status: `{}`\n\n",
        status_label(run.summary.status)
    ));

    let changed: Vec<_> = run.outcomes.iter().filter(|o| o.changed).collect();
    out.push_str("## Changed files\n\n");
    if changed.is_empty() {
        out.push_str("_No files changed._\n");
    } else {
        for outcome in changed {
            out.push_str(&format!(
                "- `{}` ({} → {} bytes)\n",
                outcome.path, outcome.bytes_before, outcome.bytes_after
            ));
        }
    }
    out.push('\n');

    if !run.failures.is_empty() {
        out.push_str("## Failures\n\n");
        for failure in &run.failures {
            out.push_str(&format!(
                "- `{}` ({}): {}\n",
                failure.path,
                stage_label(failure.stage),
                failure.message
            ));
        }
        out.push('\n');
    }

    if !run.missing.is_empty() {
        out.push_str("## Missing paths\n\n");
        for path in &run.missing {
            out.push_str(&format!("- `{}`\n", path));
        }
        out.push('\n');
    }

    if let Some(verifier) = &run.verifier {
        out.push_str("## Verifier\n\n");
        out.push_str(&format!(
            "- Verdict: `{}`\n",
            verification_label(verifier.verification)
        ));
        if let Some(code) = verifier.exit_code {
            out.push_str(&format!("- Exit code: `{}`\n", code));
        }
        if let Some(detail) = &verifier.detail {
            out.push_str(&format!("- Detail: {}\n", detail));
        }
        if !verifier.output.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(verifier.output.trim_end());
            out.push_str("\n```\n");
        }
        out.push('\n');
    }

    out
}

fn verification_label(v: Verification) -> &'static str {
    match v {
        Verification::Passed => "passed",
        Verification::Failed => "failed",
        Verification::Unknown => "unknown",
    }
}

fn status_label(s: RunStatus) -> &'static str {
    match s {
        RunStatus::CompletedClean => "completed_clean",
        RunStatus::CompletedModified => "completed_modified",
        RunStatus::CompletedWithFileErrors => "completed_with_file_errors",
    }
}

fn stage_label(s: FailureStage) -> &'static str {
    match s {
        FailureStage::Read => "read",
        FailureStage::Write => "write",
    }
}
