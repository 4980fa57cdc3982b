// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Identifier helpers for variant names and Bake target keys.
//!
//! Slugs contain only lowercase ASCII alphanumeric characters separated by
//! single hyphens, which keeps them valid as image tag suffixes, cache keys
//! and Bake target names at the same time.

use crate::version::VersionLine;

/// Normalizes `source` into a slug.
///
/// Returns `None` when nothing slug-worthy remains after normalization.
///
/// # Examples
///
/// ```
/// use shopware_matrix::slugify;
///
/// assert_eq!(slugify(" Slim Image ",).as_deref(), Some("slim-image"));
/// assert_eq!(slugify("***",), None);
/// ```
pub fn slugify(source: &str,) -> Option<String,>
{
    let trimmed = source.trim();
    let mut slug = String::with_capacity(trimmed.len(),);
    let mut pending_separator = false;

    for candidate in trimmed.chars() {
        if candidate.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-',);
            }
            slug.push(candidate.to_ascii_lowercase(),);
            pending_separator = false;
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() { None } else { Some(slug,) }
}

/// Builds the canonical Bake target key, e.g. `shopware-6-7-full`.
pub fn target_key(prefix: &str, line: VersionLine, variant: &str,) -> String
{
    format!("{prefix}-{}-{variant}", line.dashed())
}
