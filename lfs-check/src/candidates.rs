use std::collections::HashSet;

use serde::Serialize;

use crate::error::Result;
use crate::git::RepoQueries;

/// Which files a run evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateMode {
    /// Every file in `git ls-files`; the caller's list is ignored.
    AllFiles,
    /// The caller's files that are newly added in the staged change set.
    /// Files that were accepted in earlier commits are not flagged again.
    #[default]
    AddedOnly,
    /// The caller's files as given.
    Listed,
}

/// Resolve the ordered, de-duplicated list of paths to check.
pub fn resolve_candidates(
    repo: &dyn RepoQueries,
    filenames: &[String],
    mode: CandidateMode,
) -> Result<Vec<String>> {
    let candidates = match mode {
        CandidateMode::AllFiles => {
            if !filenames.is_empty() {
                log::debug!("Ignoring {} listed files in all-files mode", filenames.len());
            }
            unique(nul_separated(&repo.all_files()?))
        }
        CandidateMode::AddedOnly => {
            let added = repo.added_files()?;
            let added: HashSet<&str> = nul_separated(&added).collect();
            unique(
                filenames
                    .iter()
                    .map(|f| normalize(f))
                    .filter(|f| added.contains(f)),
            )
        }
        CandidateMode::Listed => unique(filenames.iter().map(|f| normalize(f))),
    };

    log::debug!("Resolved {} candidate files ({:?})", candidates.len(), mode);
    Ok(candidates)
}

/// Split `-z` output. Paths are taken verbatim: with `-z` git neither quotes
/// nor escapes them, and leading or trailing spaces are part of the name.
fn nul_separated(listing: &str) -> impl Iterator<Item = &str> {
    listing.split('\0').filter(|p| !p.is_empty())
}

fn normalize(path: &str) -> &str {
    let mut path = path;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path
}

fn unique<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .filter(|p| !p.is_empty() && seen.insert(*p))
        .map(str::to_owned)
        .collect()
}
