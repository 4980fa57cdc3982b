// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Removal of unstable releases.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::{error::Error, release::Release};

/// Compiled set of exclusion patterns.
///
/// Patterns are matched case-insensitively anywhere in the version string,
/// so `rc` rejects both `6.7.0.0-rc1` and `6.7.0.0-RC1`.
#[derive(Debug, Clone,)]
pub struct ReleaseFilter
{
    patterns: Vec<Regex,>,
}

impl ReleaseFilter
{
    /// Compiles the provided exclusion patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) naming the first
    /// pattern that is not a valid regular expression.
    pub fn new<S,>(patterns: &[S],) -> Result<Self, Error,>
    where
        S: AsRef<str,>,
    {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern,).case_insensitive(true,).build().map_err(|e| {
                    Error::validation(format!("invalid exclude pattern '{pattern}': {e}"),)
                },)
            },)
            .collect::<Result<Vec<_,>, _,>>()?;

        Ok(Self {
            patterns,
        },)
    }

    /// Returns `true` when the release should be built.
    pub fn accepts(&self, release: &Release,) -> bool
    {
        if release.prerelease || release.draft {
            return false;
        }

        !self.patterns.iter().any(|pattern| pattern.is_match(&release.version,),)
    }

    /// Drops prereleases, drafts and releases matching any pattern.
    ///
    /// Order is preserved and applying the filter twice yields the same list.
    ///
    /// # Examples
    ///
    /// ```
    /// use shopware_matrix::{Release, ReleaseFilter};
    ///
    /// let filter = ReleaseFilter::new(&["rc"],)?;
    /// let kept = filter.apply(vec![Release::new("6.7.1.0",), Release::new("6.7.2.0-RC1",)],);
    /// assert_eq!(kept, vec![Release::new("6.7.1.0",)]);
    /// # Ok::<(), shopware_matrix::Error>(())
    /// ```
    pub fn apply(&self, releases: Vec<Release,>,) -> Vec<Release,>
    {
        releases
            .into_iter()
            .filter(|release| {
                let keep = self.accepts(release,);
                if !keep {
                    debug!("Excluding release {}", release.version);
                }
                keep
            },)
            .collect()
    }
}
