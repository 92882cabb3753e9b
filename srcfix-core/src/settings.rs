//! Clap-free settings for the repair pipeline.

use std::time::Duration;

use camino::Utf8PathBuf;

/// Settings for one repair run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Root the run operates on; relative paths and globs anchor here.
    pub root: Utf8PathBuf,

    // Target selection
    pub paths: Vec<Utf8PathBuf>,
    pub globs: Vec<String>,

    // Rules
    pub profile: String,

    // Verification
    pub verify_command: Option<String>,
    pub verify_timeout: Duration,

    // Behaviour
    pub dry_run: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            paths: Vec::new(),
            globs: vec![
                "src/**/*.ts".to_string(),
                "src/**/*.vue".to_string(),
                "plugins/**/*.ts".to_string(),
            ],
            profile: srcfix_rules::PROFILE_DEFAULT.to_string(),
            verify_command: None,
            verify_timeout: Duration::from_secs(120),
            dry_run: false,
        }
    }
}
