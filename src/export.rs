// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Projections of build descriptors into the documents consumed by CI.
//!
//! [`render_matrix`] produces the GitHub Actions `strategy.matrix` document,
//! [`render_targets`] the Docker Bake target map, and [`summarize`] the build
//! summary. All three are pure; rendering the same descriptors twice yields
//! byte-identical JSON.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{assemble::BuildDescriptor, error::Error, slug::target_key};

/// Separator used to join tags for `docker/metadata-action`.
pub const TAG_SEPARATOR: &str = "\n";

/// GitHub Actions matrix document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct GithubMatrix
{
    /// Matrix combinations, one per descriptor.
    pub include: Vec<MatrixEntry,>,
}

/// Flattened descriptor used as one matrix combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct MatrixEntry
{
    /// Release version.
    pub shopware_version: String,
    /// PHP version.
    pub php_version:      String,
    /// Node.js version.
    pub node_version:     String,
    /// Variant name.
    pub variant:          String,
    /// Docker build context.
    pub context_path:     String,
    /// Build definition file.
    pub dockerfile:       String,
    /// Newline separated tags.
    pub tags:             String,
    /// Build cache scope.
    pub cache_key:        String,
    /// Latest flag.
    pub is_latest:        bool,
}

/// Single Docker Bake target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct BakeTarget
{
    /// Release version.
    pub shopware_version: String,
    /// PHP version.
    pub php_version:      String,
    /// Variant name.
    pub variant:          String,
    /// Docker build context.
    pub context_path:     String,
    /// Latest flag.
    pub is_latest:        bool,
}

/// Bake targets keyed by `<prefix>-<major>-<minor>-<variant>`.
pub type BakeTargets = BTreeMap<String, BakeTarget,>;

/// Aggregate view of a rendered matrix.
///
/// Every list is de-duplicated and keeps first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct BuildSummary
{
    /// Number of matrix combinations.
    pub total_variants:    usize,
    /// Distinct release versions.
    pub shopware_versions: Vec<String,>,
    /// Distinct PHP versions.
    pub php_versions:      Vec<String,>,
    /// Distinct variant names.
    pub variants:          Vec<String,>,
}

/// Renders the GitHub Actions matrix for `descriptors`.
pub fn render_matrix(descriptors: &[BuildDescriptor],) -> GithubMatrix
{
    let include = descriptors
        .iter()
        .map(|descriptor| MatrixEntry {
            shopware_version: descriptor.release_version.clone(),
            php_version:      descriptor.php_version.clone(),
            node_version:     descriptor.node_version.clone(),
            variant:          descriptor.variant.clone(),
            context_path:     descriptor.context_path.clone(),
            dockerfile:       descriptor.build_file.clone(),
            tags:             descriptor.tags.join(TAG_SEPARATOR,),
            cache_key:        descriptor.cache_key.clone(),
            is_latest:        descriptor.is_latest,
        },)
        .collect();

    GithubMatrix {
        include,
    }
}

/// Renders the Docker Bake target map for `descriptors`.
///
/// Keys combine `prefix`, the dashed version line and the variant, e.g.
/// `shopware-6-7-full`. Selection guarantees one release per line, so keys
/// are unique for a selected release set.
pub fn render_targets(descriptors: &[BuildDescriptor], prefix: &str,) -> BakeTargets
{
    descriptors
        .iter()
        .map(|descriptor| {
            let key = target_key(prefix, descriptor.version_line, &descriptor.variant,);
            let target = BakeTarget {
                shopware_version: descriptor.release_version.clone(),
                php_version:      descriptor.php_version.clone(),
                variant:          descriptor.variant.clone(),
                context_path:     descriptor.context_path.clone(),
                is_latest:        descriptor.is_latest,
            };
            (key, target,)
        },)
        .collect()
}

/// Summarizes a rendered matrix.
pub fn summarize(matrix: &GithubMatrix,) -> BuildSummary
{
    BuildSummary {
        total_variants:    matrix.include.len(),
        shopware_versions: distinct(matrix.include.iter().map(|entry| entry.shopware_version.as_str(),),),
        php_versions:      distinct(matrix.include.iter().map(|entry| entry.php_version.as_str(),),),
        variants:          distinct(matrix.include.iter().map(|entry| entry.variant.as_str(),),),
    }
}

/// Formats the `matrix=<json>` line for `$GITHUB_OUTPUT`.
///
/// Compact JSON escapes the newline tag separator, so the line never spans
/// more than one line.
///
/// # Errors
///
/// Returns [`Error::Serialize`](Error::Serialize) when encoding fails.
pub fn github_output_line(matrix: &GithubMatrix,) -> Result<String, Error,>
{
    Ok(format!("matrix={}", serde_json::to_string(matrix,)?),)
}

fn distinct<'a, I,>(values: I,) -> Vec<String,>
where
    I: Iterator<Item = &'a str,>,
{
    let mut seen = HashSet::new();
    values.filter(|value| seen.insert(*value,),).map(str::to_owned,).collect()
}
