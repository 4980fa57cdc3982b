// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Typed release versions and `major.minor` version lines.
//!
//! Versions are parsed into numeric components up front so that every
//! derived value, most importantly the [`VersionLine`] used as grouping key,
//! is computed from fields rather than from string positions. `10.0.1`
//! therefore belongs to the `10.0` line.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Release version in the `major.minor.patch[.build]` shape.
///
/// Equality, ordering and hashing treat a missing `build` component as `0`,
/// so `6.7.1` and `6.7.1.0` compare equal while still displaying as written.
///
/// # Examples
///
/// ```
/// use shopware_matrix::Version;
///
/// let version: Version = "6.6.10.6".parse()?;
/// assert_eq!(version.line().to_string(), "6.6");
/// assert!(version > "6.6.9.9".parse::<Version>()?);
/// # Ok::<(), shopware_matrix::Error>(())
/// ```
#[derive(Debug, Clone, Copy,)]
pub struct Version
{
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
    /// Optional fourth component used by Shopware releases.
    pub build: Option<u64,>,
}

impl Version
{
    /// Parses a dot-separated numeric version with three or four components.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) when the component
    /// count is outside `3..=4` or any component is not a base-10 integer.
    pub fn parse(input: &str,) -> Result<Self, Error,>
    {
        let components = parse_components(input,)
            .ok_or_else(|| Error::validation(format!("invalid version '{input}'"),),)?;

        match components.as_slice() {
            [major, minor, patch] => Ok(Self {
                major: *major, minor: *minor, patch: *patch, build: None,
            },),
            [major, minor, patch, build] => Ok(Self {
                major: *major, minor: *minor, patch: *patch, build: Some(*build,),
            },),
            _ => Err(Error::validation(format!(
                "version '{input}' must have three or four components"
            ),),),
        }
    }

    /// Returns the `major.minor` line this version belongs to.
    pub fn line(&self,) -> VersionLine
    {
        VersionLine {
            major: self.major, minor: self.minor,
        }
    }

    fn key(&self,) -> (u64, u64, u64, u64,)
    {
        (self.major, self.minor, self.patch, self.build.unwrap_or(0,),)
    }
}

impl FromStr for Version
{
    type Err = Error;

    fn from_str(input: &str,) -> Result<Self, Self::Err,>
    {
        Self::parse(input,)
    }
}

impl PartialEq for Version
{
    fn eq(&self, other: &Self,) -> bool
    {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl Hash for Version
{
    fn hash<H: Hasher,>(&self, state: &mut H,)
    {
        self.key().hash(state,);
    }
}

impl PartialOrd for Version
{
    fn partial_cmp(&self, other: &Self,) -> Option<Ordering,>
    {
        Some(self.cmp(other,),)
    }
}

impl Ord for Version
{
    fn cmp(&self, other: &Self,) -> Ordering
    {
        self.key().cmp(&other.key(),)
    }
}

impl fmt::Display for Version
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build,) = self.build {
            write!(f, ".{build}")?;
        }
        Ok((),)
    }
}

/// `major.minor` identifier used as grouping and lookup key.
///
/// Serialized as the dotted string (`"6.7"`) so it can be used directly as a
/// YAML mapping key in configuration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,)]
#[serde(try_from = "String", into = "String")]
pub struct VersionLine
{
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
}

impl VersionLine
{
    /// Creates a line from its numeric components.
    pub const fn new(major: u64, minor: u64,) -> Self
    {
        Self {
            major, minor,
        }
    }

    /// Renders the line with a dash separator, e.g. `6-7`.
    pub fn dashed(&self,) -> String
    {
        format!("{}-{}", self.major, self.minor)
    }
}

impl FromStr for VersionLine
{
    type Err = Error;

    fn from_str(input: &str,) -> Result<Self, Self::Err,>
    {
        match parse_components(input,).as_deref() {
            Some([major, minor],) => Ok(Self::new(*major, *minor,),),
            _ => Err(Error::validation(format!(
                "version line '{input}' must have the form major.minor"
            ),),),
        }
    }
}

impl TryFrom<String,> for VersionLine
{
    type Error = Error;

    fn try_from(value: String,) -> Result<Self, Self::Error,>
    {
        value.parse()
    }
}

impl From<VersionLine,> for String
{
    fn from(line: VersionLine,) -> Self
    {
        line.to_string()
    }
}

impl fmt::Display for VersionLine
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Compares two raw version strings component by component.
///
/// Both strings are split on `.` and each position is compared as an integer.
/// Missing trailing components and components that are not integers count as
/// `0`, which keeps the comparator total over arbitrary input.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
///
/// use shopware_matrix::compare_versions;
///
/// assert_eq!(compare_versions("6.7.1.0", "6.7.0.9"), Ordering::Greater);
/// assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
/// ```
pub fn compare_versions(left: &str, right: &str,) -> Ordering
{
    let left_parts: Vec<u64,> = left.split('.',).map(lenient_component,).collect();
    let right_parts: Vec<u64,> = right.split('.',).map(lenient_component,).collect();
    let width = left_parts.len().max(right_parts.len(),);

    for index in 0..width {
        let lhs = left_parts.get(index,).copied().unwrap_or(0,);
        let rhs = right_parts.get(index,).copied().unwrap_or(0,);
        match lhs.cmp(&rhs,) {
            Ordering::Equal => {}
            decided => return decided,
        }
    }

    Ordering::Equal
}

fn lenient_component(component: &str,) -> u64
{
    component.trim().parse().unwrap_or(0,)
}

fn parse_components(input: &str,) -> Option<Vec<u64,>,>
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .split('.',)
        .map(|component| {
            if component.is_empty() || !component.bytes().all(|byte| byte.is_ascii_digit(),) {
                return None;
            }
            component.parse::<u64,>().ok()
        },)
        .collect()
}
