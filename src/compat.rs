// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Mapping from version lines to runtime versions.

use tracing::warn;

use crate::{config::MatrixConfig, version::VersionLine};

/// Total lookup over the compatibility table of a [`MatrixConfig`].
///
/// Unknown lines never fail: a release line newer than the table degrades to
/// the configured defaults with a warning so matrix generation keeps going.
#[derive(Debug, Clone, Copy,)]
pub struct CompatibilityResolver<'config,>
{
    config: &'config MatrixConfig,
}

impl<'config,> CompatibilityResolver<'config,>
{
    /// Creates a resolver borrowing the configuration tables.
    pub fn new(config: &'config MatrixConfig,) -> Self
    {
        Self {
            config,
        }
    }

    /// Returns the preferred PHP version for `line`.
    ///
    /// The preferred version is the last entry of the line's compatibility
    /// list. Missing lines and empty lists fall back to the default.
    ///
    /// # Examples
    ///
    /// ```
    /// use shopware_matrix::{CompatibilityResolver, MatrixConfig, VersionLine};
    ///
    /// let config = MatrixConfig::default();
    /// let resolver = CompatibilityResolver::new(&config,);
    /// assert_eq!(resolver.resolve_php(VersionLine::new(6, 6,),), "8.3");
    /// assert_eq!(resolver.resolve_php(VersionLine::new(6, 8,),), "8.3");
    /// ```
    pub fn resolve_php(&self, line: VersionLine,) -> &'config str
    {
        match self.config.compatibility.get(&line,).and_then(|entry| entry.php.last(),) {
            Some(version,) => version,
            None => {
                warn!(
                    "Unknown Shopware line {line}, defaulting to PHP {}",
                    self.config.defaults.php
                );
                &self.config.defaults.php
            }
        }
    }

    /// Returns the Node.js version for `line`, or the default when absent.
    pub fn resolve_node(&self, line: VersionLine,) -> &'config str
    {
        self.config
            .compatibility
            .get(&line,)
            .and_then(|entry| entry.node.as_deref(),)
            .unwrap_or(self.config.defaults.node.as_str(),)
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::CompatibilityResolver;
    use crate::{
        config::{CompatibilityEntry, MatrixConfig},
        log_capture::capture_warnings,
        version::VersionLine,
    };

    #[test]
    fn resolves_last_compatible_php_version()
    {
        let config = MatrixConfig::default();
        let resolver = CompatibilityResolver::new(&config,);

        assert_eq!(resolver.resolve_php(VersionLine::new(6, 5,)), "8.2");
        assert_eq!(resolver.resolve_php(VersionLine::new(6, 6,)), "8.3");
        assert_eq!(resolver.resolve_php(VersionLine::new(6, 7,)), "8.4");
    }

    #[test]
    fn resolves_node_versions()
    {
        let config = MatrixConfig::default();
        let resolver = CompatibilityResolver::new(&config,);

        assert_eq!(resolver.resolve_node(VersionLine::new(6, 5,)), "20.18.0");
        assert_eq!(resolver.resolve_node(VersionLine::new(6, 7,)), "22.11.0");
    }

    #[test]
    fn unknown_line_uses_documented_defaults()
    {
        let config = MatrixConfig::default();
        let resolver = CompatibilityResolver::new(&config,);
        let line = VersionLine::new(6, 8,);

        assert_eq!(resolver.resolve_php(line,), "8.3");
        assert_eq!(resolver.resolve_node(line,), "20.18.0");
    }

    #[test]
    fn unknown_line_logs_a_warning()
    {
        let config = MatrixConfig::default();
        let resolver = CompatibilityResolver::new(&config,);

        let (php, logs,) = capture_warnings(|| resolver.resolve_php(VersionLine::new(6, 8,),),);
        assert_eq!(php, "8.3");
        assert!(logs.contains("WARN"), "missing warning in {logs:?}");
        assert!(logs.contains("Unknown Shopware line 6.8, defaulting to PHP 8.3"));

        let (_, logs,) = capture_warnings(|| resolver.resolve_php(VersionLine::new(6, 7,),),);
        assert!(logs.is_empty(), "unexpected warning: {logs}");
    }

    #[test]
    fn empty_php_list_and_missing_node_use_defaults()
    {
        let mut config = MatrixConfig::default();
        config.compatibility.insert(
            VersionLine::new(7, 0,),
            CompatibilityEntry {
                php: Vec::new(), node: None,
            },
        );
        let resolver = CompatibilityResolver::new(&config,);

        assert_eq!(resolver.resolve_php(VersionLine::new(7, 0,)), "8.3");
        assert_eq!(resolver.resolve_node(VersionLine::new(7, 0,)), "20.18.0");
    }

    proptest! {
        #[test]
        fn php_resolution_is_total(major in 0u64..20, minor in 0u64..20) {
            let config = MatrixConfig::default();
            let resolver = CompatibilityResolver::new(&config);
            prop_assert!(!resolver.resolve_php(VersionLine::new(major, minor)).is_empty());
            prop_assert!(!resolver.resolve_node(VersionLine::new(major, minor)).is_empty());
        }
    }
}
