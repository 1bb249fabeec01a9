//! Git queries behind a small capability trait.
//!
//! The compliance engine only ever sees text listings, so it can be driven by
//! canned fixtures in tests. `GitCli` is the real implementation, shelling out
//! to the system `git` (and through it, `git-lfs`).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{ExternalToolError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The four repository listings the checker needs.
///
/// Each call returns the raw text of the listing or fails with an
/// [`ExternalToolError`]. Implementations must not cache across runs.
pub trait RepoQueries {
    /// Output of `git lfs track`.
    fn pattern_listing(&self) -> Result<String>;

    /// Paths stored in LFS, one per line.
    fn tracked_listing(&self) -> Result<String>;

    /// Every file known to git, NUL separated (`git ls-files -z`).
    fn all_files(&self) -> Result<String>;

    /// Files added in the staged change set, NUL separated.
    fn added_files(&self) -> Result<String>;
}

/// Queries answered by running the `git` executable in `repo_root`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    repo_root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("git"),
            repo_root: repo_root.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Run a git command in the repository and return stdout.
    fn run_git(&self, args: &[&str]) -> Result<String> {
        let display = format!("git {}", args.join(" "));
        log::debug!("Running `{}` in {}", display, self.repo_root.display());

        let mut cmd = Command::new(&self.program);
        cmd.arg("-C")
            .arg(&self.repo_root)
            .args(["-c", "core.quotePath=false"])
            .args(args);

        let output = run_with_timeout(cmd, &display, self.timeout)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(self
                .classify_failure(display, output.status.to_string(), stderr)
                .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// git says "not a git repository", git-lfs says "Not in a Git repository".
    fn classify_failure(
        &self,
        command: String,
        status: String,
        stderr: String,
    ) -> ExternalToolError {
        let lower = stderr.to_lowercase();
        if lower.contains("not a git repository") || lower.contains("not in a git repository") {
            ExternalToolError::NotARepository {
                path: self.repo_root.clone(),
            }
        } else {
            ExternalToolError::Failed {
                command,
                status,
                stderr,
            }
        }
    }
}

impl RepoQueries for GitCli {
    fn pattern_listing(&self) -> Result<String> {
        self.run_git(&["lfs", "track"])
    }

    fn tracked_listing(&self) -> Result<String> {
        self.run_git(&["lfs", "ls-files", "--name-only"])
    }

    fn all_files(&self) -> Result<String> {
        self.run_git(&["ls-files", "-z"])
    }

    fn added_files(&self) -> Result<String> {
        self.run_git(&["diff", "--cached", "--name-only", "--diff-filter=A", "-z"])
    }
}

/// Spawn `cmd` and wait for it, killing it once `timeout` has elapsed.
/// A timeout too large to represent as a deadline means no deadline.
///
/// stdout and stderr are drained on their own threads so a chatty child can
/// never block on a full pipe while we poll.
pub(crate) fn run_with_timeout(
    mut cmd: Command,
    display: &str,
    timeout: Duration,
) -> std::result::Result<Output, ExternalToolError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExternalToolError::Spawn {
            command: display.to_string(),
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now().checked_add(timeout);
    let status = loop {
        let polled = child.try_wait().map_err(|source| ExternalToolError::Wait {
            command: display.to_string(),
            source,
        })?;
        match polled {
            Some(status) => break status,
            None if deadline.is_some_and(|d| Instant::now() >= d) => {
                // The reader threads are left to finish on their own: a grandchild
                // may still hold the pipes open.
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExternalToolError::TimedOut {
                    command: display.to_string(),
                    timeout,
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    Ok(Output {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}
