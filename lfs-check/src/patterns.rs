use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

const TRACKED_HEADER: &str = "Listing tracked patterns";
const EXCLUDED_HEADER: &str = "Listing excluded patterns";

/// An extension-style LFS tracking pattern such as `*.psd`.
///
/// Only `*.` followed by ASCII alphanumerics is accepted, so a `Pattern` is
/// never empty and never contains anything a glob engine could read as a
/// separator, class or alternation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Pattern(String);

impl Pattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if is_extension_glob(&pattern) {
            Ok(Self(pattern))
        } else {
            Err(Error::invalid_pattern(
                pattern,
                "expected `*.` followed by an alphanumeric extension",
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_extension_glob(token: &str) -> bool {
    token
        .strip_prefix("*.")
        .is_some_and(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Extracts the tracking patterns from `git lfs track` output.
///
/// The output looks like:
///
/// ```text
/// Listing tracked patterns
///     *.psd (.gitattributes)
///     *.bin [lockable] (.gitattributes)
/// Listing excluded patterns
///     *.tmp (.gitattributes)
/// ```
///
/// Each line contributes its first token when that token is a valid
/// [`Pattern`]; other lines are skipped. Entries under the excluded header
/// are not tracking rules and are ignored. Duplicates keep their first
/// position.
pub fn extract_patterns(listing: &str) -> Vec<Pattern> {
    let mut patterns: Vec<Pattern> = Vec::new();
    let mut excluded = false;

    for line in listing.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(TRACKED_HEADER) {
            excluded = false;
            continue;
        }
        if trimmed.starts_with(EXCLUDED_HEADER) {
            excluded = true;
            continue;
        }
        if excluded || trimmed.is_empty() {
            continue;
        }

        let token = trimmed.split_whitespace().next().unwrap_or_default();
        match Pattern::new(token) {
            Ok(pattern) => {
                if !patterns.contains(&pattern) {
                    patterns.push(pattern);
                }
            }
            // compound extensions and directory globs are not enforced
            Err(_) => log::warn!("Not enforcing LFS rule {trimmed:?}: only `*.ext` patterns are checked"),
        }
    }

    log::debug!("Extracted {} LFS patterns", patterns.len());
    patterns
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn strings(patterns: &[Pattern]) -> Vec<&str> {
        patterns.iter().map(Pattern::as_str).collect()
    }

    #[test]
    fn pattern_validation() {
        assert!(Pattern::new("*.psd").is_ok());
        assert!(Pattern::new("*.MP4").is_ok());

        assert!(Pattern::new("").is_err());
        assert!(Pattern::new("*.").is_err());
        assert!(Pattern::new("*.tar.gz").is_err());
        assert!(Pattern::new("assets/*.bin").is_err());
        assert!(Pattern::new("*.[ch]").is_err());
        assert!(Pattern::new("data.bin").is_err());
    }

    #[test]
    fn extracts_patterns_from_track_output() {
        let listing = "Listing tracked patterns\n    *.psd (.gitattributes)\n    *.bin (.gitattributes)\n";
        assert_eq!(strings(&extract_patterns(listing)), vec!["*.psd", "*.bin"]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let listing = "    *.bin (.gitattributes)\n    *.psd (sub/.gitattributes)\n    *.bin (sub/.gitattributes)\n";
        assert_eq!(strings(&extract_patterns(listing)), vec!["*.bin", "*.psd"]);
    }

    #[test]
    fn skips_lines_that_are_not_extension_globs() {
        let listing = [
            "Listing tracked patterns",
            "    *.zip [lockable] (.gitattributes)",
            "    assets/** (.gitattributes)",
            "    *.tar.gz (.gitattributes)",
            "    big-file.iso (.gitattributes)",
            "random noise",
        ]
        .join("\n");
        assert_eq!(strings(&extract_patterns(&listing)), vec!["*.zip"]);
    }

    struct Capture(Mutex<Vec<(log::Level, String)>>);

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut records) = self.0.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    #[test]
    fn unenforced_rules_are_warned_about() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);

        extract_patterns("    *.tar.gz (.gitattributes)
    *.psd (.gitattributes)
");

        let records = CAPTURE.0.lock().unwrap();
        let warned: Vec<&str> = records
            .iter()
            .filter(|(level, msg)| *level == log::Level::Warn && msg.contains("*.tar.gz"))
            .map(|(_, msg)| msg.as_str())
            .collect();
        assert_eq!(warned.len(), 1, "{records:?}");
        assert!(!records.iter().any(|(_, msg)| msg.contains("*.psd (")));
    }

    #[test]
    fn ignores_excluded_section() {
        let listing = "Listing tracked patterns\n    *.psd (.gitattributes)\nListing excluded patterns\n    *.tmp (.gitattributes)\n";
        assert_eq!(strings(&extract_patterns(listing)), vec!["*.psd"]);
    }

    #[test]
    fn empty_listing_has_no_patterns() {
        assert!(extract_patterns("").is_empty());
        assert!(extract_patterns("Listing tracked patterns\nListing excluded patterns\n").is_empty());
    }
}
