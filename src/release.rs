// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Release records flowing through the matrix pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Single product release as reported by the registry or the fallback
/// catalog.
///
/// The source does not guarantee uniqueness; selection is responsible for
/// collapsing duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Release
{
    /// Version string without the leading `v` of the tag.
    pub version:      String,
    /// Publication timestamp when known.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc,>,>,
    /// Human readable release title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name:         Option<String,>,
    /// Set by the registry for prereleases.
    #[serde(default)]
    pub prerelease:   bool,
    /// Set by the registry for unpublished drafts.
    #[serde(default)]
    pub draft:        bool,
}

impl Release
{
    /// Creates a stable release record without registry metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use shopware_matrix::Release;
    ///
    /// let release = Release::new("6.7.1.0",);
    /// assert!(!release.prerelease && !release.draft);
    /// ```
    pub fn new<V,>(version: V,) -> Self
    where
        V: Into<String,>,
    {
        Self {
            version:      version.into(),
            published_at: None,
            name:         None,
            prerelease:   false,
            draft:        false,
        }
    }

    /// Parses the release version, returning `None` for unexpected shapes.
    pub fn parsed_version(&self,) -> Option<Version,>
    {
        Version::parse(&self.version,).ok()
    }
}

/// Release entry as returned by the GitHub releases listing.
///
/// Only the fields consumed by the pipeline are declared; everything else in
/// the payload is ignored.
#[derive(Debug, Clone, Deserialize,)]
pub struct RegistryRelease
{
    /// Git tag of the release, usually prefixed with `v`.
    pub tag_name:     String,
    /// Publication timestamp; absent for drafts.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc,>,>,
    /// Release title.
    #[serde(default)]
    pub name:         Option<String,>,
    /// Prerelease flag.
    #[serde(default)]
    pub prerelease:   bool,
    /// Draft flag.
    #[serde(default)]
    pub draft:        bool,
}

impl From<RegistryRelease,> for Release
{
    fn from(raw: RegistryRelease,) -> Self
    {
        let version = raw.tag_name.strip_prefix('v',).unwrap_or(&raw.tag_name,).to_owned();

        Self {
            version,
            published_at: raw.published_at,
            name: raw.name,
            prerelease: raw.prerelease,
            draft: raw.draft,
        }
    }
}
