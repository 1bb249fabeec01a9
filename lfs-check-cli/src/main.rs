use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use fs_err as fs;
use lfs_check::{find_repo_root, run_check, CandidateMode, CheckRequest, Config};

/// Exit status for anything that is not a compliance verdict: git missing,
/// not a repository, a failed or timed out query, a bad config file.
const EXIT_FAILURE: u8 = 2;

/// Checks that files matching Git LFS tracking patterns are stored in LFS.
///
/// Meant to run as a pre-commit hook: pre-commit passes the staged files and
/// only the ones newly added in this commit are checked.
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Cli {
    /// Filenames pre-commit believes are changed.
    pub filenames: Vec<String>,

    /// Check every file in the repository instead of the given filenames.
    #[clap(long)]
    pub all_files: bool,

    /// Check every given filename, not only the ones newly added in this commit.
    #[clap(long, conflicts_with = "all_files")]
    pub check_existing: bool,

    /// Seconds a single git query may take (overrides `lfs-check.toml`).
    #[clap(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output results as JSON
    #[clap(long)]
    pub json: bool,
}

impl Cli {
    fn mode(&self) -> CandidateMode {
        if self.all_files {
            CandidateMode::AllFiles
        } else if self.check_existing {
            CandidateMode::Listed
        } else {
            CandidateMode::AddedOnly
        }
    }
}

fn try_main(cli: Cli) -> Result<i32> {
    let current_dir = fs::canonicalize(std::env::current_dir()?)?;
    let repo_root =
        find_repo_root(&current_dir).ok_or_else(|| anyhow!("Not in a git repository"))?;

    let mut config = Config::load(&repo_root)?.with_env_overrides();
    if let Some(secs) = cli.timeout {
        config.set_timeout_secs(secs);
    }
    let git = config.git_cli(&repo_root);
    log::debug!(
        "Using {} with a {}s timeout in {}",
        config.git(),
        config.timeout().as_secs(),
        git.repo_root().display()
    );

    let request = CheckRequest {
        mode: cli.mode(),
        filenames: cli.filenames,
    };
    let report = run_check(&git, &request).context("LFS pattern check could not run")?;

    if cli.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print!("{report}");
    }
    Ok(report.exit_code())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match try_main(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
