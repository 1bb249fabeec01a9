use std::collections::HashSet;

/// Paths currently stored in Git LFS, relative to the repository root.
///
/// Built from `git lfs ls-files --name-only`, one path per line. Lookups are
/// exact: `a.bin` is not tracked just because `other/a.bin.bak` is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedPaths {
    paths: HashSet<String>,
}

impl TrackedPaths {
    pub fn from_listing(listing: &str) -> Self {
        let paths: HashSet<String> = listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        log::debug!("{} paths tracked by LFS", paths.len());
        Self { paths }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TrackedPaths {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}
