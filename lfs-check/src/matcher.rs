//! Anchored glob matching of repository paths against LFS patterns.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{Error, Result};
use crate::patterns::Pattern;

/// Every pattern compiled once into a single anchored automaton.
///
/// A pattern has to match the whole path: `*.bin` matches `a.bin` and
/// `assets/a.bin` but not `a.binx` or `a.bin.bak`. `*` is allowed to cross
/// `/`, which is how git applies a slash-less attribute pattern to every
/// directory level.
#[derive(Debug, Clone)]
pub struct Matcher {
    patterns: Vec<Pattern>,
    set: GlobSet,
}

impl Matcher {
    pub fn new(patterns: &[Pattern]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern.as_str())
                .literal_separator(false)
                .build()
                .map_err(|e| Error::invalid_pattern(pattern.as_str(), e.to_string()))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| Error::invalid_pattern("<pattern set>", e.to_string()))?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// The earliest pattern, in extraction order, matching `path`.
    pub fn first_match(&self, path: &str) -> Option<&Pattern> {
        self.set
            .matches(path)
            .into_iter()
            .min()
            .map(|idx| &self.patterns[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Matcher {
        fn is_match(&self, path: &str) -> bool {
            self.first_match(path).is_some()
        }
    }

    fn matcher(patterns: &[&str]) -> Matcher {
        let patterns: Vec<Pattern> = patterns.iter().map(|p| Pattern::new(*p).unwrap()).collect();
        Matcher::new(&patterns).unwrap()
    }

    #[test]
    fn matches_whole_path_only() {
        let m = matcher(&["*.bin"]);
        assert!(m.is_match("a.bin"));
        assert!(m.is_match("assets/a.bin"));
        assert!(m.is_match("deep/nested/dir/a.bin"));

        assert!(!m.is_match("foo.binx"));
        assert!(!m.is_match("a.bin.bak"));
        assert!(!m.is_match("a.bin/readme.md"));
        assert!(!m.is_match("abin"));
    }

    #[test]
    fn extension_is_literal() {
        // `.` must not act as a regex wildcard
        let m = matcher(&["*.bin"]);
        assert!(!m.is_match("a_bin"));
        assert!(!m.is_match("axbin"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let m = matcher(&["*.psd"]);
        assert!(m.is_match("art/cover.psd"));
        assert!(!m.is_match("art/cover.PSD"));
    }

    #[test]
    fn first_match_follows_pattern_order() {
        let m = matcher(&["*.gz", "*.bin", "*.gz"]);
        assert_eq!(m.first_match("x.bin").map(Pattern::as_str), Some("*.bin"));
        assert_eq!(m.first_match("x.gz").map(Pattern::as_str), Some("*.gz"));
        assert_eq!(m.first_match("x.txt"), None);
    }

    #[test]
    fn empty_matcher_matches_nothing() {
        let m = matcher(&[]);
        assert!(!m.is_match("anything.bin"));
        assert_eq!(m.first_match("anything.bin"), None);
    }
}
