mod config;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use srcfix_core::{FsWritePort, RunSettings, ShellVerifier, run_repair, write_run_artifacts};
use srcfix_rules::{Rule, RuleSet, load_profile, profile_names};
use srcfix_types::report::ToolInfo;
use srcfix_types::run::Verification;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "srcfix",
    version,
    about = "Pattern-based repair tool for corrupted TypeScript and Vue sources."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Repair matching files, then run the verify command if one is set.
    Run(RunArgs),
    /// List built-in profiles with their passes and rule counts.
    ListProfiles(ListProfilesArgs),
    /// Explain a rule: what it matches and how it rewrites.
    Explain(ExplainArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Root directory to repair (default: current directory).
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Explicit files to repair, in addition to globs.
    #[arg(value_name = "FILE")]
    paths: Vec<Utf8PathBuf>,

    /// Glob pattern relative to the root (repeatable; replaces defaults).
    #[arg(long = "glob")]
    globs: Vec<String>,

    /// Rule-set profile to apply.
    #[arg(long)]
    profile: Option<String>,

    /// Verification command, run via the shell after repairs.
    #[arg(long)]
    verify: Option<String>,

    /// Skip verification even if srcfix.toml configures a command.
    #[arg(long, default_value_t = false)]
    no_verify: bool,

    /// Verification timeout in seconds.
    #[arg(long)]
    verify_timeout_secs: Option<u64>,

    /// Report would-be changes without writing any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Output directory for run artifacts (run.json, run.md, report.json).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ListProfilesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule id to explain (e.g., "length-comma-guard").
    rule_id: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("srcfix: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::ListProfiles(args) => cmd_list_profiles(args),
        Command::Explain(args) => cmd_explain(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(&args.root).context("load srcfix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_run_args(
        &args.globs,
        args.profile.as_deref(),
        args.verify.as_deref(),
        args.no_verify,
        args.verify_timeout_secs,
        args.dry_run,
    );

    debug!(
        "merged config: profile={}, globs={:?}, verify={:?}, dry_run={}",
        merged.profile, merged.globs, merged.verify_command, merged.dry_run
    );

    let defaults = RunSettings::default();
    let settings = RunSettings {
        root: args.root,
        paths: args.paths,
        globs: if merged.globs.is_empty() {
            defaults.globs
        } else {
            merged.globs
        },
        profile: merged.profile,
        verify_command: merged.verify_command,
        verify_timeout: Duration::from_secs(merged.verify_timeout_secs),
        dry_run: merged.dry_run,
    };

    let outcome = run_repair(&settings, &ShellVerifier, tool_info())?;

    if let Some(out_dir) = &args.out_dir {
        write_run_artifacts(&outcome, out_dir, &FsWritePort).context("write run artifacts")?;
        info!("wrote run artifacts to {}", out_dir);
    }

    let summary = &outcome.run.summary;
    println!(
        "{} files scanned, {} changed, {} errored (verification: {})",
        summary.files_scanned,
        summary.files_changed,
        summary.files_errored,
        verification_label(summary.verification)
    );
    for file in outcome.run.outcomes.iter().filter(|o| o.changed) {
        println!(
            "  fixed {} ({} -> {} bytes)",
            file.path, file.bytes_before, file.bytes_after
        );
    }
    for failure in &outcome.run.failures {
        eprintln!("  error {}: {}", failure.path, failure.message);
    }
    for missing in &outcome.run.missing {
        eprintln!("  missing {}", missing);
    }

    // Exit status reflects file I/O outcomes only; the verifier verdict is
    // informational and lives in the artifacts.
    if summary.files_errored > 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_list_profiles(args: ListProfilesArgs) -> anyhow::Result<ExitCode> {
    let sets: Vec<RuleSet> = profile_names()
        .iter()
        .filter_map(|name| load_profile(name))
        .collect();

    match args.format {
        OutputFormat::Text => {
            println!("Available profiles:\n");
            for set in &sets {
                println!("  {} ({} rules)", set.profile, set.rule_count());
                for pass in &set.passes {
                    let ids: Vec<&str> = pass.rules.iter().map(|r| r.id).collect();
                    println!("    {}: {}", pass.name, ids.join(", "));
                }
                println!();
            }
            println!("Use 'srcfix explain <rule-id>' for details.");
        }
        OutputFormat::Json => {
            let profiles: Vec<_> = sets
                .iter()
                .map(|set| {
                    serde_json::json!({
                        "profile": set.profile,
                        "rule_count": set.rule_count(),
                        "passes": set.passes.iter().map(|pass| {
                            serde_json::json!({
                                "name": pass.name,
                                "rules": pass.rules.iter().map(|r| r.id).collect::<Vec<_>>(),
                            })
                        }).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<ExitCode> {
    let mut found: Option<(Rule, Vec<&'static str>)> = None;
    for name in profile_names() {
        let Some(set) = load_profile(name) else {
            continue;
        };
        if let Some(rule) = set.rules().find(|r| r.id == args.rule_id) {
            match &mut found {
                Some((_, profiles)) => profiles.push(set.profile),
                None => found = Some((rule.clone(), vec![set.profile])),
            }
        }
    }

    let Some((rule, profiles)) = found else {
        let mut available: Vec<&str> = profile_names()
            .iter()
            .filter_map(|name| load_profile(name))
            .flat_map(|set| set.rules().map(|r| r.id).collect::<Vec<_>>())
            .collect();
        available.sort_unstable();
        available.dedup();
        anyhow::bail!(
            "unknown rule id: '{}'\n\nAvailable rules: {}",
            args.rule_id,
            available.join(", ")
        );
    };

    println!("RULE: {}", rule.id);
    println!("--------------------------------------------------------------------------------");
    println!("Summary:     {}", rule.summary);
    println!("Scope:       {}", rule.scope.label());
    println!("Profiles:    {}", profiles.join(", "));
    println!("Pattern:     {}", rule.pattern.as_str());
    println!("Replacement: {}", rule.replacement);
    println!();
    println!("Example:");
    println!("  before: {}", rule.example_before);
    println!("  after:  {}", rule.example_after);

    Ok(ExitCode::SUCCESS)
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "srcfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn verification_label(v: Verification) -> &'static str {
    match v {
        Verification::Passed => "passed",
        Verification::Failed => "failed",
        Verification::Unknown => "unknown",
    }
}
