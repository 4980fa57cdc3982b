// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Expansion of selected releases into per-variant build descriptors.
//!
//! Every selected release produces one [`BuildDescriptor`] per configured
//! variant. Descriptors are emitted release by release, with the default
//! variant first and the remaining variants in declaration order; the GitHub
//! matrix keeps this order so CI logs diff cleanly between runs.

use serde::Serialize;

use crate::{
    compat::CompatibilityResolver,
    config::{MatrixConfig, VariantSpec},
    error::Error,
    release::Release,
    version::{Version, VersionLine},
};

const TAG_PREFIX: &str = "type=raw,value=";
const LATEST_TAG: &str = "latest";

/// Fully resolved unit of work for one release and variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct BuildDescriptor
{
    /// Release version exactly as published.
    pub release_version: String,
    /// `major.minor` line of the release.
    pub version_line:    VersionLine,
    /// Preferred PHP version for the line.
    pub php_version:     String,
    /// Node.js version for the line.
    pub node_version:    String,
    /// Variant name.
    pub variant:         String,
    /// Build definition of the variant.
    pub build_file:      String,
    /// Docker build context, the line directory.
    pub context_path:    String,
    /// Image tags in emission order: version, line, then `latest`.
    pub tags:            Vec<String,>,
    /// Build cache scope, `<line>-<variant>`.
    pub cache_key:       String,
    /// Whether this release is the configured latest version.
    pub is_latest:       bool,
}

/// Builds descriptors for `releases` using the tables in `config`.
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) when no variant is
/// configured or a release version does not parse.
///
/// # Examples
///
/// ```
/// use shopware_matrix::{MatrixConfig, Release, assemble};
///
/// let config = MatrixConfig::default();
/// let descriptors = assemble(&[Release::new("6.7.1.0",)], &config,)?;
/// assert_eq!(descriptors.len(), 2);
/// assert_eq!(descriptors[1].tags, vec![
///     "type=raw,value=6.7.1.0-slim",
///     "type=raw,value=6.7-slim",
///     "type=raw,value=latest-slim",
/// ]);
/// # Ok::<(), shopware_matrix::Error>(())
/// ```
pub fn assemble(releases: &[Release], config: &MatrixConfig,) -> Result<Vec<BuildDescriptor,>, Error,>
{
    let (default_variant, other_variants,) = config
        .variants
        .split_first()
        .ok_or_else(|| Error::validation("configuration must include at least one variant",),)?;

    let resolver = CompatibilityResolver::new(config,);
    let mut descriptors = Vec::with_capacity(releases.len() * config.variants.len(),);

    for release in releases {
        let version = Version::parse(&release.version,)?;
        let line = version.line();
        let php_version = resolver.resolve_php(line,);
        let node_version = resolver.resolve_node(line,);
        let is_latest = config.latest_version.as_deref() == Some(release.version.as_str(),);

        let context = ReleaseContext {
            release_version: &release.version,
            line,
            php_version,
            node_version,
            is_latest,
        };

        descriptors.push(context.describe(default_variant, None,),);
        for variant in other_variants {
            descriptors.push(context.describe(variant, Some(variant.name.as_str(),),),);
        }
    }

    Ok(descriptors,)
}

/// Values shared by every variant of one release.
struct ReleaseContext<'a,>
{
    release_version: &'a str,
    line:            VersionLine,
    php_version:     &'a str,
    node_version:    &'a str,
    is_latest:       bool,
}

impl ReleaseContext<'_,>
{
    fn describe(&self, variant: &VariantSpec, suffix: Option<&str,>,) -> BuildDescriptor
    {
        let line = self.line.to_string();

        BuildDescriptor {
            release_version: self.release_version.to_owned(),
            version_line:    self.line,
            php_version:     self.php_version.to_owned(),
            node_version:    self.node_version.to_owned(),
            variant:         variant.name.clone(),
            build_file:      variant.build_file.clone(),
            tags:            self.tags(&line, suffix,),
            cache_key:       format!("{line}-{}", variant.name),
            context_path:    line,
            is_latest:       self.is_latest,
        }
    }

    fn tags(&self, line: &str, suffix: Option<&str,>,) -> Vec<String,>
    {
        let mut values = vec![self.release_version, line];
        if self.is_latest {
            values.push(LATEST_TAG,);
        }

        values
            .into_iter()
            .map(|value| match suffix {
                Some(suffix,) => format!("{TAG_PREFIX}{value}-{suffix}"),
                None => format!("{TAG_PREFIX}{value}"),
            },)
            .collect()
    }
}
