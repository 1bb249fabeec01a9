//! Error types for lfs-check.
//!
//! Compliance violations are not errors: they are reported through
//! [`crate::ComplianceResult`]. Everything here aborts the run.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A query against the version control tool could not produce an answer.
///
/// These are never downgraded to an empty listing: an empty tracked set
/// would turn every matching file into a false violation.
#[derive(Debug, Error)]
pub enum ExternalToolError {
    /// The program could not be started (not installed, not executable).
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    /// The process started but could not be waited on.
    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
    /// The directory is not inside a git repository.
    #[error("not a git repository: {}", .path.display())]
    NotARepository { path: PathBuf },
    /// The command ran but exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
    /// The command did not finish in time and was killed.
    #[error("`{command}` timed out after {}s", .timeout.as_secs_f32())]
    TimedOut { command: String, timeout: Duration },
}

/// Main error type for lfs-check operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the run failed because a git query failed, as opposed to bad input.
    pub fn is_external_tool(&self) -> bool {
        matches!(self, Error::ExternalTool(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_tool_errors_are_flagged() {
        let err: Error = ExternalToolError::NotARepository {
            path: PathBuf::from("/tmp/nowhere"),
        }
        .into();
        assert!(err.is_external_tool());
        assert_eq!(err.to_string(), "not a git repository: /tmp/nowhere");

        assert!(!Error::config("bad").is_external_tool());
    }

    #[test]
    fn timed_out_message_names_command() {
        let err = ExternalToolError::TimedOut {
            command: "git lfs ls-files".to_string(),
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "`git lfs ls-files` timed out after 1.5s");
    }

    #[test]
    fn wait_failure_is_not_a_spawn_failure() {
        let err: Error = ExternalToolError::Wait {
            command: "git ls-files -z".to_string(),
            source: io::Error::new(io::ErrorKind::Interrupted, "interrupted"),
        }
        .into();
        assert!(err.is_external_tool());
        assert_eq!(
            err.to_string(),
            "failed waiting for `git ls-files -z`: interrupted"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
