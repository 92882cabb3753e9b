//! Configuration file loading for srcfix.
//!
//! Discovers and loads `srcfix.toml` from the run root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "srcfix.toml";

/// Top-level configuration from srcfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SrcfixConfig {
    /// Target selection and rule settings.
    pub run: RunConfig,

    /// Verification settings.
    pub verify: VerifyConfig,
}

/// Run section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Glob patterns, relative to the run root. Empty means the built-in
    /// default set.
    pub globs: Vec<String>,

    /// Rule-set profile name.
    pub profile: String,

    /// Report would-be changes without writing files.
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            globs: Vec::new(),
            profile: srcfix_rules::PROFILE_DEFAULT.to_string(),
            dry_run: false,
        }
    }
}

/// Verify section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Verification command, run via the shell after repairs.
    pub command: Option<String>,

    /// Timeout for the verification command, in seconds.
    pub timeout_secs: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout_secs: 120,
        }
    }
}

/// Discover the srcfix.toml config file.
///
/// Searches for `srcfix.toml` in the run root directory.
/// Returns `None` if no config file is found.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a srcfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<SrcfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<SrcfixConfig> {
    let config: SrcfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the run root, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<SrcfixConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(SrcfixConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
///
/// CLI arguments take precedence over config file settings.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Glob patterns; empty means the built-in default set.
    pub globs: Vec<String>,

    /// Profile name.
    pub profile: String,

    /// Verification command, `None` when verification is skipped.
    pub verify_command: Option<String>,

    /// Verification timeout in seconds.
    pub verify_timeout_secs: u64,

    /// Whether this run is a dry run.
    pub dry_run: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: SrcfixConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: SrcfixConfig) -> Self {
        Self { config }
    }

    /// Merge with run command CLI arguments.
    ///
    /// CLI globs replace config globs when given. `--no-verify` wins over
    /// both a CLI `--verify` and a configured command. `--dry-run` can only
    /// widen (a config `dry_run = true` is not overridable from the CLI).
    pub fn merge_run_args(
        self,
        cli_globs: &[String],
        cli_profile: Option<&str>,
        cli_verify: Option<&str>,
        no_verify: bool,
        cli_timeout_secs: Option<u64>,
        cli_dry_run: bool,
    ) -> MergedConfig {
        let globs = if cli_globs.is_empty() {
            self.config.run.globs.clone()
        } else {
            cli_globs.to_vec()
        };

        let profile = cli_profile
            .map(str::to_string)
            .unwrap_or_else(|| self.config.run.profile.clone());

        let verify_command = if no_verify {
            None
        } else {
            cli_verify
                .map(str::to_string)
                .or_else(|| self.config.verify.command.clone())
        };

        MergedConfig {
            globs,
            profile,
            verify_command,
            verify_timeout_secs: cli_timeout_secs.unwrap_or(self.config.verify.timeout_secs),
            dry_run: cli_dry_run || self.config.run.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_example_config() {
        let contents = r#"
[run]
globs = ["src/**/*.ts", "src/**/*.vue", "plugins/**/*.ts"]
profile = "default"
dry_run = false

[verify]
command = "npm run typecheck"
timeout_secs = 300
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.run.globs.len(), 3);
        assert_eq!(config.run.profile, "default");
        assert!(!config.run.dry_run);
        assert_eq!(config.verify.command.as_deref(), Some("npm run typecheck"));
        assert_eq!(config.verify.timeout_secs, 300);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.run.globs.is_empty());
        assert_eq!(config.run.profile, "default");
        assert!(config.verify.command.is_none());
        assert_eq!(config.verify.timeout_secs, 120);
    }

    #[test]
    fn test_merge_cli_globs_replace_config_globs() {
        let config = SrcfixConfig {
            run: RunConfig {
                globs: vec!["src/**/*.ts".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        let cli_globs = vec!["lib/**/*.vue".to_string()];
        let merged =
            ConfigMerger::new(config).merge_run_args(&cli_globs, None, None, false, None, false);

        assert_eq!(merged.globs, vec!["lib/**/*.vue"]);
    }

    #[test]
    fn test_merge_cli_profile_wins() {
        let config = SrcfixConfig {
            run: RunConfig {
                profile: "default".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged =
            ConfigMerger::new(config).merge_run_args(&[], Some("precise"), None, false, None, false);

        assert_eq!(merged.profile, "precise");
    }

    #[test]
    fn test_merge_no_verify_drops_configured_command() {
        let config = SrcfixConfig {
            verify: VerifyConfig {
                command: Some("npm run typecheck".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_run_args(
            &[],
            None,
            Some("tsc --noEmit"),
            true,
            None,
            false,
        );

        assert!(merged.verify_command.is_none());
    }

    #[test]
    fn test_merge_cli_verify_wins_over_config() {
        let config = SrcfixConfig {
            verify: VerifyConfig {
                command: Some("npm run typecheck".to_string()),
                timeout_secs: 120,
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_run_args(
            &[],
            None,
            Some("tsc --noEmit"),
            false,
            Some(60),
            false,
        );

        assert_eq!(merged.verify_command.as_deref(), Some("tsc --noEmit"));
        assert_eq!(merged.verify_timeout_secs, 60);
    }

    #[test]
    fn test_merge_dry_run_widens_only() {
        let config = SrcfixConfig {
            run: RunConfig {
                dry_run: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_run_args(&[], None, None, false, None, false);
        assert!(merged.dry_run);
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert!(cfg.run.globs.is_empty());
        assert!(cfg.verify.command.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = parse_config("[run\nglobs = ").expect_err("invalid toml");
        assert!(err.to_string().contains("invalid TOML"));
    }
}
