//! Build matrix generation for Shopware development images.
//!
//! The library discovers Shopware releases, keeps the latest patch of every
//! supported `major.minor` line, resolves the PHP and Node.js versions for
//! each line and expands the result into per-variant build descriptors. The
//! descriptors are rendered as a GitHub Actions matrix and as Docker Bake
//! targets. Network access and file output sit behind the [`ReleaseSource`]
//! and [`OutputSink`] ports so the pipeline can run entirely in memory.

mod assemble;
mod compat;
mod config;
mod error;
mod export;
mod filter;
mod health;
#[cfg(test)]
mod log_capture;
mod pipeline;
mod release;
mod select;
mod sink;
mod slug;
mod source;
mod version;

pub use assemble::{BuildDescriptor, assemble};
pub use compat::CompatibilityResolver;
pub use config::{
    CompatibilityEntry, DEFAULT_NODE_VERSION, DEFAULT_PHP_VERSION, MatrixConfig, RuntimeDefaults,
    SourceConfig, VariantSpec, load_config, parse_config,
};
pub use error::{Error, io_error, sink_error};
pub use export::{
    BakeTarget, BakeTargets, BuildSummary, GithubMatrix, MatrixEntry, TAG_SEPARATOR,
    github_output_line, render_matrix, render_targets, summarize,
};
pub use filter::ReleaseFilter;
pub use health::{DEFAULT_INSTALL_MARKER, HealthReport, HealthStatus, check_installation};
pub use pipeline::{build_artifacts, generate, plan};
pub use release::{RegistryRelease, Release};
pub use select::select_latest_per_line;
pub use sink::{
    Artifacts, BAKE_MATRIX_FILE, BUILD_SUMMARY_FILE, FileSink, GITHUB_MATRIX_FILE, OutputSink,
};
pub use slug::{slugify, target_key};
pub use source::{GithubReleaseSource, ReleaseSource, StaticReleaseSource, discover_releases};
pub use version::{Version, VersionLine, compare_versions};
