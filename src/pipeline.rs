// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! End-to-end matrix generation.
//!
//! Stages run strictly in order: discovery, filtering, selection, assembly,
//! rendering and finally the sink. Every stage before the sink is a pure
//! transformation, so the sink only ever sees a complete artifact set.
use tracing::info;

use crate::{
    assemble::{BuildDescriptor, assemble},
    config::MatrixConfig,
    error::Error,
    export::{render_matrix, render_targets, summarize},
    filter::ReleaseFilter,
    release::Release,
    select::select_latest_per_line,
    sink::{Artifacts, OutputSink},
    source::{ReleaseSource, discover_releases},
};

/// Renders artifacts from already discovered releases without any I/O.
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) when the configuration
/// cannot drive the pipeline.
///
/// # Examples
///
/// ```
/// use shopware_matrix::{MatrixConfig, Release, build_artifacts};
///
/// let config = MatrixConfig::default();
/// let releases = vec![Release::new("6.6.10.6",), Release::new("6.7.1.0",)];
/// let artifacts = build_artifacts(releases, &config,)?;
/// assert_eq!(artifacts.summary.total_variants, 4);
/// # Ok::<(), shopware_matrix::Error>(())
/// ```
pub fn build_artifacts(releases: Vec<Release,>, config: &MatrixConfig,) -> Result<Artifacts, Error,>
{
    let descriptors = plan(releases, config,)?;
    let matrix = render_matrix(&descriptors,);
    let targets = render_targets(&descriptors, &config.target_prefix,);
    let summary = summarize(&matrix,);

    Ok(Artifacts {
        matrix,
        targets,
        summary,
    },)
}

/// Filters, selects and assembles descriptors for `releases`.
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) for invalid exclusion
/// patterns or an empty variant set.
pub fn plan(releases: Vec<Release,>, config: &MatrixConfig,) -> Result<Vec<BuildDescriptor,>, Error,>
{
    let filter = ReleaseFilter::new(config.exclude_patterns.as_slice(),)?;
    let stable = filter.apply(releases,);
    let selected = select_latest_per_line(stable, &config.supported_lines,);

    info!("Selected {} latest patch versions", selected.len());
    let descriptors = assemble(&selected, config,)?;
    let default_variant = config.default_variant().map(|variant| variant.name.as_str(),);
    for descriptor in descriptors
        .iter()
        .filter(|descriptor| Some(descriptor.variant.as_str(),) == default_variant,)
    {
        info!(
            "  {} (PHP {}, Node {})",
            descriptor.release_version, descriptor.php_version, descriptor.node_version
        );
    }

    Ok(descriptors,)
}

/// Runs the whole pipeline and hands the artifacts to `sink`.
///
/// Release discovery never fails; the returned error is either a
/// configuration problem or a sink failure.
///
/// # Errors
///
/// Propagates [`Error::Validation`](Error::Validation) from planning and
/// [`Error::Sink`](Error::Sink) or [`Error::Serialize`](Error::Serialize)
/// from the sink.
pub async fn generate<S, O,>(source: &S, sink: &O, config: &MatrixConfig,) -> Result<Artifacts, Error,>
where
    S: ReleaseSource,
    O: OutputSink,
{
    info!("Generating dynamic build matrix for Shopware Docker images");

    let releases = discover_releases(source, config,).await;
    let artifacts = build_artifacts(releases, config,)?;
    sink.write(&artifacts,)?;

    info!("Total build variants: {}", artifacts.summary.total_variants);
    info!("PHP versions: {}", artifacts.summary.php_versions.join(", "));
    info!("Shopware versions: {}", artifacts.summary.shopware_versions.join(", "));

    Ok(artifacts,)
}

#[cfg(test)]
mod tests
{
    use std::cell::RefCell;

    use super::*;
    use crate::source::StaticReleaseSource;

    #[derive(Default,)]
    struct RecordingSink
    {
        written: RefCell<Vec<Artifacts,>,>,
    }

    impl OutputSink for RecordingSink
    {
        fn write(&self, artifacts: &Artifacts,) -> Result<(), Error,>
        {
            self.written.borrow_mut().push(artifacts.clone(),);
            Ok((),)
        }
    }

    struct RejectingSink;

    impl OutputSink for RejectingSink
    {
        fn write(&self, _artifacts: &Artifacts,) -> Result<(), Error,>
        {
            Err(crate::error::sink_error(
                std::path::Path::new("build-config",),
                std::io::Error::other("disk full",),
            ),)
        }
    }

    #[test]
    fn plan_filters_then_selects_then_assembles()
    {
        let releases = ["6.5.8.18", "6.6.10.6", "6.7.1.0", "6.7.2.0-rc1"]
            .into_iter()
            .map(Release::new,)
            .collect();

        let descriptors = plan(releases, &MatrixConfig::default(),).expect("plan succeeds",);
        assert_eq!(descriptors.len(), 6);
        assert!(descriptors.iter().all(|descriptor| descriptor.release_version != "6.7.2.0-rc1"));
    }

    #[tokio::test]
    async fn generate_hands_complete_artifacts_to_sink()
    {
        let config = MatrixConfig::default();
        let source = StaticReleaseSource::new(vec![Release::new("6.6.10.6",)],);
        let sink = RecordingSink::default();

        let artifacts = generate(&source, &sink, &config,).await.expect("generation succeeds",);

        let written = sink.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0], artifacts);
        assert_eq!(artifacts.matrix.include.len(), 2);
        assert_eq!(artifacts.targets.len(), 2);
    }

    #[tokio::test]
    async fn generate_propagates_sink_failure()
    {
        let config = MatrixConfig::default();
        let source = StaticReleaseSource::new(config.fallback_releases.clone(),);

        let error = generate(&source, &RejectingSink, &config,).await.expect_err("expected failure",);
        assert!(matches!(error, Error::Sink { .. }));
    }

    #[test]
    fn plan_rejects_invalid_patterns_before_assembly()
    {
        let config = MatrixConfig {
            exclude_patterns: vec!["(".to_owned()],
            ..MatrixConfig::default()
        };
        assert!(plan(vec![Release::new("6.7.1.0")], &config,).is_err());
    }
}
