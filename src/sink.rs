// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Persistence of rendered matrix documents.
//!
//! Writes are the last stage of the pipeline and receive a fully rendered
//! [`Artifacts`] value. No cleanup is attempted after a failed write, so a
//! failed run leaves the output directory in an indeterminate state.
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use serde::Serialize;
use tracing::info;

use crate::{
    error::{Error, sink_error},
    export::{BakeTargets, BuildSummary, GithubMatrix, github_output_line},
};

/// File name of the GitHub Actions matrix.
pub const GITHUB_MATRIX_FILE: &str = "github-matrix.json";
/// File name of the Docker Bake target map.
pub const BAKE_MATRIX_FILE: &str = "bake-matrix.json";
/// File name of the build summary.
pub const BUILD_SUMMARY_FILE: &str = "build-summary.json";

/// Complete set of rendered documents for one run.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Artifacts
{
    /// GitHub Actions matrix.
    pub matrix:  GithubMatrix,
    /// Docker Bake targets.
    pub targets: BakeTargets,
    /// Build summary.
    pub summary: BuildSummary,
}

/// Capability to persist rendered artifacts.
pub trait OutputSink
{
    /// Persists every document in `artifacts`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sink`](Error::Sink) when a directory or file cannot
    /// be written and [`Error::Serialize`](Error::Serialize) when encoding
    /// fails.
    fn write(&self, artifacts: &Artifacts,) -> Result<(), Error,>;
}

/// Writes artifacts into a directory and optionally to `$GITHUB_OUTPUT`.
#[derive(Debug, Clone,)]
pub struct FileSink
{
    output_dir:    PathBuf,
    github_output: Option<PathBuf,>,
}

impl FileSink
{
    /// Creates a sink writing into `output_dir`.
    pub fn new<P,>(output_dir: P,) -> Self
    where
        P: Into<PathBuf,>,
    {
        Self {
            output_dir: output_dir.into(), github_output: None,
        }
    }

    /// Appends the `matrix=<json>` line to `path` after writing the files.
    pub fn with_github_output(mut self, path: Option<PathBuf,>,) -> Self
    {
        self.github_output = path;
        self
    }

    fn write_json<T,>(&self, file_name: &str, document: &T,) -> Result<(), Error,>
    where
        T: Serialize,
    {
        let path = self.output_dir.join(file_name,);
        let contents = serde_json::to_string_pretty(document,)?;
        fs::write(&path, contents,).map_err(|source| sink_error(&path, source,),)
    }
}

impl OutputSink for FileSink
{
    fn write(&self, artifacts: &Artifacts,) -> Result<(), Error,>
    {
        fs::create_dir_all(&self.output_dir,)
            .map_err(|source| sink_error(&self.output_dir, source,),)?;

        self.write_json(GITHUB_MATRIX_FILE, &artifacts.matrix,)?;
        self.write_json(BAKE_MATRIX_FILE, &artifacts.targets,)?;
        self.write_json(BUILD_SUMMARY_FILE, &artifacts.summary,)?;
        info!("Files written to {}", self.output_dir.display());

        if let Some(path,) = self.github_output.as_deref() {
            let line = github_output_line(&artifacts.matrix,)?;
            let mut file = OpenOptions::new()
                .create(true,)
                .append(true,)
                .open(path,)
                .map_err(|source| sink_error(path, source,),)?;
            writeln!(file, "{line}").map_err(|source| sink_error(path, source,),)?;
            info!("GitHub Actions output written");
        }

        Ok((),)
    }
}
