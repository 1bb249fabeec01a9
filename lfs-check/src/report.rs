//! Human and machine readable rendering of a run.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::candidates::CandidateMode;
use crate::check::ComplianceResult;
use crate::patterns::Pattern;

/// Everything a run found, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub patterns: Vec<Pattern>,
    /// Number of files evaluated.
    pub candidates: usize,
    pub mode: CandidateMode,
    pub result: ComplianceResult,
}

impl Report {
    pub fn exit_code(&self) -> i32 {
        self.result.exit_code()
    }

    pub fn passed(&self) -> bool {
        self.result.is_clean()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Report", 5)?;
        s.serialize_field("patterns", &self.patterns)?;
        s.serialize_field("candidates", &self.candidates)?;
        s.serialize_field("mode", &self.mode)?;
        s.serialize_field("violations", &self.result.violations)?;
        s.serialize_field("passed", &self.passed())?;
        s.end()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mode == CandidateMode::AllFiles {
            writeln!(f, "Enforcing all files are checked.")?;
        }
        writeln!(
            f,
            "Checking {} LFS patterns against {} files.",
            self.patterns.len(),
            self.candidates
        )?;
        if self.patterns.is_empty() {
            writeln!(f, "Patterns: (none)")?;
        } else {
            let list: Vec<&str> = self.patterns.iter().map(Pattern::as_str).collect();
            writeln!(f, "Patterns: {}", list.join(", "))?;
        }

        for violation in &self.result.violations {
            writeln!(
                f,
                "File '{}' matches pattern '{}' but is not tracked by LFS.",
                violation.path, violation.pattern
            )?;
        }

        if !self.result.is_clean() {
            write_remediation(f, &self.result)?;
        }
        Ok(())
    }
}

fn write_remediation(f: &mut fmt::Formatter<'_>, result: &ComplianceResult) -> fmt::Result {
    let files = result
        .paths()
        .map(shell_quote)
        .collect::<Vec<_>>()
        .join(" ");

    writeln!(f)?;
    writeln!(f, "To fix this, if the files are already committed, migrate them into LFS:")?;
    writeln!(f, "    git lfs migrate import --no-rewrite {files}")?;
    writeln!(f, "If the files are new, re-stage them so the LFS filter applies:")?;
    writeln!(f, "    git rm --cached {files}")?;
    writeln!(f, "    git add {files}")?;
    writeln!(f, "Then confirm they are tracked with:")?;
    writeln!(f, "    git lfs ls-files")
}

/// Quote a path for a POSIX shell when it contains anything but safe characters.
fn shell_quote(path: &str) -> String {
    let safe = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./+@%:,=".contains(c));
    if safe {
        path.to_string()
    } else {
        format!("'{}'", path.replace('\'', r"'\''"))
    }
}
