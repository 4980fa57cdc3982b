// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Configuration document driving matrix generation.
//!
//! Every table the pipeline consults (supported lines, PHP/Node
//! compatibility, exclusion patterns, fallback catalog, variants) lives in a
//! single immutable [`MatrixConfig`] value that is passed into
//! [`generate`](crate::generate). [`MatrixConfig::default`] is the reference
//! configuration for Shopware development images; YAML documents override
//! any subset of its sections.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    filter::ReleaseFilter,
    release::Release,
    slug::slugify,
    version::{Version, VersionLine},
};

/// Default GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Repository whose releases are listed.
pub const DEFAULT_REPOSITORY: &str = "shopware/shopware";
/// Identifying client header sent with the releases request.
pub const DEFAULT_USER_AGENT: &str = "Shopware-Docker-Builder/1.0";
/// PHP version used for lines missing from the compatibility table.
pub const DEFAULT_PHP_VERSION: &str = "8.3";
/// Node.js version used for lines without an explicit entry.
pub const DEFAULT_NODE_VERSION: &str = "20.18.0";
const DEFAULT_PER_PAGE: u8 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LATEST_VERSION: &str = "6.7.1.0";
const DEFAULT_TARGET_PREFIX: &str = "shopware";

/// Root configuration document.
///
/// # Examples
///
/// ```
/// use shopware_matrix::parse_config;
///
/// let yaml = r#"
/// supported_lines: ["6.6", "6.7"]
/// latest_version: "6.7.2.0"
/// fallback_releases:
///   - version: 6.6.10.6
///   - version: 6.7.2.0
/// "#;
/// let config = parse_config(yaml,)?;
/// assert_eq!(config.supported_lines.len(), 2);
/// assert_eq!(config.variants.len(), 2);
/// # Ok::<(), shopware_matrix::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default, deny_unknown_fields)]
pub struct MatrixConfig
{
    /// Release registry settings.
    pub source:            SourceConfig,
    /// `major.minor` lines that receive images.
    pub supported_lines:   Vec<VersionLine,>,
    /// PHP and Node.js compatibility per line.
    pub compatibility:     BTreeMap<VersionLine, CompatibilityEntry,>,
    /// Versions used for lines missing from [`Self::compatibility`].
    pub defaults:          RuntimeDefaults,
    /// Case-insensitive regular expressions matched against versions.
    pub exclude_patterns:  Vec<String,>,
    /// Releases substituted when the registry cannot be reached.
    pub fallback_releases: Vec<Release,>,
    /// Build variants; the first entry is the default variant.
    pub variants:          Vec<VariantSpec,>,
    /// Version that receives the `latest` tags.
    pub latest_version:    Option<String,>,
    /// Prefix of Bake target names.
    pub target_prefix:     String,
}

/// Settings for the release registry request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig
{
    /// Base URI of the GitHub API.
    pub api_base:     String,
    /// `owner/name` of the repository whose releases are listed.
    pub repository:   String,
    /// Value of the `User-Agent` header.
    pub user_agent:   String,
    /// Page size requested from the listing endpoint.
    pub per_page:     u8,
    /// Upper bound for the whole request in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig
{
    fn default() -> Self
    {
        Self {
            api_base:     DEFAULT_API_BASE.to_owned(),
            repository:   DEFAULT_REPOSITORY.to_owned(),
            user_agent:   DEFAULT_USER_AGENT.to_owned(),
            per_page:     DEFAULT_PER_PAGE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Runtime versions associated with one version line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct CompatibilityEntry
{
    /// Compatible PHP versions, ascending; the last one is preferred.
    pub php:  Vec<String,>,
    /// Node.js version used by the administration build.
    #[serde(default)]
    pub node: Option<String,>,
}

impl CompatibilityEntry
{
    fn new(php: &[&str], node: &str,) -> Self
    {
        Self {
            php:  php.iter().map(|version| (*version).to_owned(),).collect(),
            node: Some(node.to_owned(),),
        }
    }
}

/// Fallback runtime versions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeDefaults
{
    /// PHP version for unknown lines.
    pub php:  String,
    /// Node.js version for lines without a configured value.
    pub node: String,
}

impl Default for RuntimeDefaults
{
    fn default() -> Self
    {
        Self {
            php:  DEFAULT_PHP_VERSION.to_owned(),
            node: DEFAULT_NODE_VERSION.to_owned(),
        }
    }
}

/// Named build flavor producing a distinct image from the same release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct VariantSpec
{
    /// Variant name, also used as tag and cache key suffix.
    pub name:       String,
    /// Build definition consumed by `docker build`.
    pub build_file: String,
}

impl VariantSpec
{
    /// Creates a variant description.
    pub fn new<N, F,>(name: N, build_file: F,) -> Self
    where
        N: Into<String,>,
        F: Into<String,>,
    {
        Self {
            name: name.into(), build_file: build_file.into(),
        }
    }
}

impl Default for MatrixConfig
{
    fn default() -> Self
    {
        let compatibility = BTreeMap::from([
            (VersionLine::new(6, 5,), CompatibilityEntry::new(&["8.1", "8.2"], "20.18.0",),),
            (VersionLine::new(6, 6,), CompatibilityEntry::new(&["8.2", "8.3"], "20.18.0",),),
            (VersionLine::new(6, 7,), CompatibilityEntry::new(&["8.3", "8.4"], "22.11.0",),),
        ],);

        let fallback_releases = [
            ("6.5.8.18", "2024-01-01T00:00:00Z",),
            ("6.6.10.6", "2024-06-01T00:00:00Z",),
            ("6.7.1.0", "2024-12-01T00:00:00Z",),
        ]
        .into_iter()
        .map(|(version, published_at,)| Release {
            published_at: published_at.parse().ok(),
            ..Release::new(version,)
        },)
        .collect();

        Self {
            source: SourceConfig::default(),
            supported_lines: vec![
                VersionLine::new(6, 5,),
                VersionLine::new(6, 6,),
                VersionLine::new(6, 7,),
            ],
            compatibility,
            defaults: RuntimeDefaults::default(),
            exclude_patterns: ["rc", "beta", "alpha", "dev"]
                .into_iter()
                .map(str::to_owned,)
                .collect(),
            fallback_releases,
            variants: vec![
                VariantSpec::new("full", "Dockerfile",),
                VariantSpec::new("slim", "Dockerfile.slim",),
            ],
            latest_version: Some(DEFAULT_LATEST_VERSION.to_owned(),),
            target_prefix: DEFAULT_TARGET_PREFIX.to_owned(),
        }
    }
}

impl MatrixConfig
{
    /// Returns the default variant, i.e. the first declared one.
    pub fn default_variant(&self,) -> Option<&VariantSpec,>
    {
        self.variants.first()
    }

    /// Checks the invariants the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) when no line or
    /// variant is configured, the request timeout or page size is zero, a
    /// variant name or the target prefix is not a
    /// slug, variant names repeat, an exclusion pattern does not compile, a
    /// fallback release does not parse, or a supported line lacks a fallback
    /// release.
    pub fn validate(&self,) -> Result<(), Error,>
    {
        if self.supported_lines.is_empty() {
            return Err(Error::validation("configuration must include at least one supported line",),);
        }
        if self.variants.is_empty() {
            return Err(Error::validation("configuration must include at least one variant",),);
        }

        if self.source.timeout_secs == 0 {
            return Err(Error::validation("source.timeout_secs must be greater than zero",),);
        }
        if self.source.per_page == 0 {
            return Err(Error::validation("source.per_page must be greater than zero",),);
        }

        validate_slug(&self.target_prefix, "target_prefix",)?;

        let mut seen_variants = HashSet::with_capacity(self.variants.len(),);
        for variant in &self.variants {
            validate_slug(&variant.name, "variant name",)?;
            if variant.build_file.trim().is_empty() {
                return Err(Error::validation(format!(
                    "variant '{}' requires a build_file",
                    variant.name
                ),),);
            }
            if !seen_variants.insert(variant.name.as_str(),) {
                return Err(Error::validation(format!("duplicate variant '{}'", variant.name),),);
            }
        }

        ReleaseFilter::new(self.exclude_patterns.as_slice(),)?;

        let mut covered = HashSet::with_capacity(self.fallback_releases.len(),);
        for release in &self.fallback_releases {
            let version = Version::parse(&release.version,)?;
            covered.insert(version.line(),);
        }
        if let Some(missing,) = self.supported_lines.iter().find(|line| !covered.contains(*line,),) {
            return Err(Error::validation(format!(
                "fallback_releases must include a release for line {missing}"
            ),),);
        }

        Ok((),)
    }
}

fn validate_slug(value: &str, field: &str,) -> Result<(), Error,>
{
    match slugify(value,) {
        Some(slug,) if slug == value => Ok((),),
        _ => Err(Error::validation(format!(
            "{field} '{value}' must contain only lowercase letters, digits and single hyphens"
        ),),),
    }
}

/// Loads and validates the configuration at `path`.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or the configuration violates invariants.
pub fn load_config(path: &Path,) -> Result<MatrixConfig, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_config(&contents,)
}

/// Parses and validates a YAML configuration document.
///
/// An empty document yields [`MatrixConfig::default`].
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) when the YAML cannot be decoded
/// and [`Error::Validation`](Error::Validation) when invariants are violated.
pub fn parse_config(contents: &str,) -> Result<MatrixConfig, Error,>
{
    let config = if contents.trim().is_empty() {
        MatrixConfig::default()
    } else {
        serde_yaml::from_str(contents,)?
    };

    config.validate()?;
    Ok(config,)
}
