// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Liveness probe for built Shopware images.
//!
//! The probe is independent from matrix generation; it only checks for the
//! installation marker that the Shopware installer leaves behind.
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Marker written by the Shopware installer.
pub const DEFAULT_INSTALL_MARKER: &str = "/var/www/html/install.lock";

/// Overall probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus
{
    /// The installation is complete.
    Ok,
    /// The installation is missing or incomplete.
    Error,
}

/// JSON document reported by the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct HealthReport
{
    /// Probe outcome.
    pub status:    HealthStatus,
    /// Human readable explanation.
    pub message:   String,
    /// RFC 3339 time of a successful probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String,>,
}

impl HealthReport
{
    /// HTTP status code equivalent of the report.
    pub fn http_status(&self,) -> u16
    {
        match self.status {
            HealthStatus::Ok => 200,
            HealthStatus::Error => 503,
        }
    }

    /// Returns `true` when the installation is healthy.
    pub fn is_healthy(&self,) -> bool
    {
        self.status == HealthStatus::Ok
    }
}

/// Checks whether the installation marker at `marker` exists.
///
/// # Examples
///
/// ```
/// use shopware_matrix::check_installation;
///
/// let report = check_installation(std::path::Path::new("/nonexistent/install.lock",),);
/// assert_eq!(report.http_status(), 503);
/// ```
pub fn check_installation(marker: &Path,) -> HealthReport
{
    match marker.try_exists() {
        Ok(true,) => HealthReport {
            status:    HealthStatus::Ok,
            message:   "Shopware is running".to_owned(),
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false,),),
        },
        Ok(false,) => HealthReport {
            status:    HealthStatus::Error,
            message:   "Installation not complete".to_owned(),
            timestamp: None,
        },
        Err(error,) => HealthReport {
            status:    HealthStatus::Error,
            message:   error.to_string(),
            timestamp: None,
        },
    }
}
