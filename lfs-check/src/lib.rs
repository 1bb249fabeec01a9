//! Checks that files matching Git LFS tracking patterns are stored in LFS.
//!
//! - `patterns`: extract `*.ext` patterns from `git lfs track`
//! - `tracked`: the exact set of paths in the LFS index
//! - `candidates`: which files a run evaluates
//! - `matcher`: anchored glob matching
//! - `check`: the compliance check and the end-to-end run
//! - `report`: text and JSON rendering
//! - `git`: the repository queries, behind `RepoQueries`

pub mod candidates;
pub mod check;
pub mod config;
pub mod error;
pub mod git;
pub mod matcher;
pub mod patterns;
pub mod report;
pub mod tracked;

pub use candidates::{resolve_candidates, CandidateMode};
pub use check::{check, run_check, CheckRequest, ComplianceResult, Violation};
pub use config::{find_repo_root, Config};
pub use error::{Error, ExternalToolError, Result};
pub use git::{GitCli, RepoQueries};
pub use matcher::Matcher;
pub use patterns::{extract_patterns, Pattern};
pub use report::Report;
pub use tracked::TrackedPaths;
