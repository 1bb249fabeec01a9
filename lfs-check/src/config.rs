use std::path::{Path, PathBuf};
use std::time::Duration;

use fs_err as fs;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::git::{GitCli, DEFAULT_TIMEOUT};

pub const CONFIG_FILE_NAME: &str = "lfs-check.toml";
/// Overrides the `git` key of the config file.
pub const GIT_PROGRAM_ENV: &str = "LFS_CHECK_GIT";

/// Finds the root of a git repository by walking up from the given directory
/// until a `.git` entry is found (a directory, or a file for worktrees).
///
/// Returns `None` if no `.git` is found before reaching the filesystem root.
pub fn find_repo_root(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut dir = start_dir.as_ref();
    log::debug!("Searching for repo root starting from {}", dir.display());

    loop {
        if dir.join(".git").exists() {
            log::debug!("Found repo root at {}", dir.display());
            return Some(dir.to_path_buf());
        }

        dir = dir.parent()?;
    }
}

/// Optional settings read from `lfs-check.toml` at the repository root.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Program used to run git queries.
    git: String,
    /// Seconds a single git query may take before it is killed.
    timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.git.trim().is_empty() {
            return Err(Error::config("`git` must not be empty"));
        }
        if config.timeout_secs == 0 {
            return Err(Error::config("`timeout_secs` must be at least 1"));
        }
        Ok(config)
    }

    /// Load the config of the repository containing `repo_root`, falling back
    /// to defaults when there is no config file.
    pub fn load(repo_root: impl AsRef<Path>) -> Result<Self> {
        let config_path = repo_root.as_ref().join(CONFIG_FILE_NAME);
        log::debug!("Looking for config at {}", config_path.display());
        if !config_path.is_file() {
            log::debug!("No config file found at {}", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::Config(message) => {
                Error::config(format!("{}: {}", config_path.display(), message))
            }
            other => other,
        })
    }

    /// Apply `LFS_CHECK_GIT` if it is set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(program) = std::env::var(GIT_PROGRAM_ENV) {
            if !program.trim().is_empty() {
                log::debug!("Using git program from {GIT_PROGRAM_ENV}: {program}");
                self.git = program;
            }
        }
        self
    }

    pub fn set_timeout_secs(&mut self, secs: u64) {
        self.timeout_secs = secs.max(1);
    }

    pub fn git(&self) -> &str {
        &self.git
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Git queries for `repo_root` using these settings.
    pub fn git_cli(&self, repo_root: impl Into<PathBuf>) -> GitCli {
        GitCli::new(repo_root)
            .with_program(&self.git)
            .with_timeout(self.timeout())
    }
}
