// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Release discovery with fallback to a static catalog.
//!
//! The registry is reached through the [`ReleaseSource`] port so the rest of
//! the pipeline can be exercised without network access. [`discover_releases`]
//! performs exactly one fetch and never fails: any error or timeout swaps in
//! the fallback catalog of the active [`MatrixConfig`].
use std::{future::Future, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, header::ACCEPT};
use tracing::{debug, info, warn};

use crate::{
    config::{MatrixConfig, SourceConfig},
    error::Error,
    release::{RegistryRelease, Release},
};

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Capability to list product releases.
pub trait ReleaseSource
{
    /// Lists releases in registry order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`](Error::Service) when the registry cannot be
    /// reached or answers with an unexpected payload.
    fn fetch_releases(&self,) -> impl Future<Output = Result<Vec<Release,>, Error,>,> + Send;
}

/// Lists releases through the GitHub REST API.
#[derive(Debug, Clone,)]
pub struct GithubReleaseSource
{
    settings: SourceConfig,
    token:    Option<String,>,
}

impl GithubReleaseSource
{
    /// Creates an unauthenticated source for the configured repository.
    pub fn new(settings: SourceConfig,) -> Self
    {
        Self {
            settings, token: None,
        }
    }

    /// Authenticates requests with a personal access token, which raises the
    /// API rate limit.
    pub fn with_token<T,>(mut self, token: T,) -> Self
    where
        T: Into<String,>,
    {
        self.token = Some(token.into(),);
        self
    }

    /// Path of the releases listing relative to the API base.
    pub fn route(&self,) -> String
    {
        format!("/repos/{}/releases", self.settings.repository)
    }

    fn url(&self,) -> String
    {
        format!("{}{}", self.settings.api_base.trim_end_matches('/',), self.route())
    }

    fn client(&self,) -> Result<Client, Error,>
    {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.settings.timeout_secs,),)
            .user_agent(self.settings.user_agent.as_str(),)
            .build()?,)
    }
}

impl ReleaseSource for GithubReleaseSource
{
    async fn fetch_releases(&self,) -> Result<Vec<Release,>, Error,>
    {
        let client = self.client()?;
        let url = self.url();
        debug!("Requesting {url}");

        let mut request = client
            .get(&url,)
            .header(ACCEPT, GITHUB_JSON,)
            .query(&[("per_page", self.settings.per_page,)],);
        if let Some(token,) = self.token.as_deref() {
            request = request.bearer_auth(token,);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::service(format!("failed to list releases: {e}"),),)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::service(format!("HTTP {status} listing releases from {url}"),),);
        }

        let releases: Vec<RegistryRelease,> = response
            .json()
            .await
            .map_err(|e| Error::service(format!("unexpected releases payload: {e}"),),)?;

        Ok(releases.into_iter().map(Release::from,).collect(),)
    }
}

/// Serves a fixed release list; used for offline runs.
#[derive(Debug, Clone, Default,)]
pub struct StaticReleaseSource
{
    releases: Vec<Release,>,
}

impl StaticReleaseSource
{
    /// Creates a source returning `releases` on every fetch.
    pub fn new(releases: Vec<Release,>,) -> Self
    {
        Self {
            releases,
        }
    }
}

impl ReleaseSource for StaticReleaseSource
{
    async fn fetch_releases(&self,) -> Result<Vec<Release,>, Error,>
    {
        Ok(self.releases.clone(),)
    }
}

/// Fetches releases once, substituting the fallback catalog on failure.
///
/// The fetch is bounded by `config.source.timeout_secs`. Failures are
/// logged as warnings and never returned.
pub async fn discover_releases<S,>(source: &S, config: &MatrixConfig,) -> Vec<Release,>
where
    S: ReleaseSource,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.yellow} [{elapsed_precise}] {msg}",)
            .unwrap_or_else(|_| ProgressStyle::default_spinner(),),
    );
    spinner.enable_steady_tick(Duration::from_millis(120,),);
    spinner.set_message("Fetching Shopware releases...",);
    info!("Fetching Shopware releases from {}", config.source.repository);

    let limit = Duration::from_secs(config.source.timeout_secs,);
    let outcome = match tokio::time::timeout(limit, source.fetch_releases(),).await {
        Ok(result,) => result,
        Err(_,) => Err(Error::service(format!(
            "release request timed out after {}s",
            config.source.timeout_secs
        ),),),
    };

    match outcome {
        Ok(releases,) => {
            spinner.finish_and_clear();
            info!("Found {} total releases", releases.len());
            releases
        }
        Err(error,) => {
            spinner.finish_and_clear();
            warn!("Failed to fetch releases, using fallback versions: {error}");
            config.fallback_releases.clone()
        }
    }
}
