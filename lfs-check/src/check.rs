use serde::Serialize;

use crate::candidates::{resolve_candidates, CandidateMode};
use crate::error::Result;
use crate::git::RepoQueries;
use crate::matcher::Matcher;
use crate::patterns::{extract_patterns, Pattern};
use crate::report::Report;
use crate::tracked::TrackedPaths;

/// A candidate that matches an LFS pattern but is not stored in LFS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub pattern: Pattern,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceResult {
    pub violations: Vec<Violation>,
}

impl ComplianceResult {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// `0` when clean, `1` when at least one file is in violation.
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.path.as_str())
    }
}

/// Check every candidate against the patterns.
///
/// Each offending path is reported once, against the first pattern (in
/// extraction order) it matches. The output only depends on the inputs.
pub fn check(
    candidates: &[String],
    patterns: &[Pattern],
    tracked: &TrackedPaths,
) -> Result<ComplianceResult> {
    let matcher = Matcher::new(patterns)?;

    let violations = candidates
        .iter()
        .filter_map(|path| {
            let pattern = matcher.first_match(path)?;
            if tracked.contains(path) {
                log::debug!("{path} matches {pattern} and is tracked");
                return None;
            }
            Some(Violation {
                path: path.clone(),
                pattern: pattern.clone(),
            })
        })
        .collect();

    Ok(ComplianceResult { violations })
}

/// What a run should look at.
#[derive(Debug, Clone, Default)]
pub struct CheckRequest {
    pub filenames: Vec<String>,
    pub mode: CandidateMode,
}

/// Query the repository and check it.
///
/// Queries run in order (patterns, tracked paths, candidates) and the first
/// failure aborts the run before anything is checked.
pub fn run_check(repo: &dyn RepoQueries, request: &CheckRequest) -> Result<Report> {
    let patterns = extract_patterns(&repo.pattern_listing()?);
    let tracked = TrackedPaths::from_listing(&repo.tracked_listing()?);
    if tracked.is_empty() {
        log::debug!("No files are stored in LFS yet");
    }
    let candidates = resolve_candidates(repo, &request.filenames, request.mode)?;

    let result = check(&candidates, &patterns, &tracked)?;
    log::info!(
        "Checked {} files against {} patterns ({} LFS files): {} violations",
        candidates.len(),
        patterns.len(),
        tracked.len(),
        result.violations.len()
    );

    Ok(Report {
        patterns,
        candidates: candidates.len(),
        mode: request.mode,
        result,
    })
}
