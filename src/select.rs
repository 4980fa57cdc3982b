// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Latest-patch selection per version line.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    release::Release,
    version::{Version, VersionLine},
};

/// Keeps the highest release of every supported `major.minor` line.
///
/// Releases are compared with the typed [`Version`] ordering, which is the
/// component-wise numeric comparison with a missing build component counted
/// as `0`. A candidate replaces the retained release only when it is
/// strictly greater, so ties keep the first one seen. The output lists lines
/// in the order they were first encountered. Releases whose version does not
/// parse and releases on unsupported lines are skipped.
///
/// # Examples
///
/// ```
/// use shopware_matrix::{Release, VersionLine, select_latest_per_line};
///
/// let releases = vec![
///     Release::new("6.6.9.9",),
///     Release::new("6.6.10.6",),
///     Release::new("6.4.20.2",),
/// ];
/// let selected = select_latest_per_line(releases, &[VersionLine::new(6, 6,)],);
/// assert_eq!(selected, vec![Release::new("6.6.10.6",)]);
/// ```
pub fn select_latest_per_line(
    releases: Vec<Release,>,
    supported_lines: &[VersionLine],
) -> Vec<Release,>
{
    let mut retained: Vec<(Version, Release,),> = Vec::with_capacity(supported_lines.len(),);
    let mut slots: HashMap<VersionLine, usize,> = HashMap::with_capacity(supported_lines.len(),);

    for release in releases {
        let Some(version,) = release.parsed_version() else {
            warn!("Skipping release with unexpected version '{}'", release.version);
            continue;
        };

        let line = version.line();
        if !supported_lines.contains(&line,) {
            debug!("Skipping release {} on unsupported line {line}", release.version);
            continue;
        }

        match slots.get(&line,) {
            Some(&slot,) => {
                let (current, _,) = &retained[slot];
                if version > *current {
                    retained[slot] = (version, release,);
                }
            }
            None => {
                slots.insert(line, retained.len(),);
                retained.push((version, release,),);
            }
        }
    }

    retained.into_iter().map(|(_, release,)| release,).collect()
}

#[cfg(test)]
mod tests
{
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::select_latest_per_line;
    use crate::{
        log_capture::capture_warnings,
        release::Release,
        version::{VersionLine, compare_versions},
    };

    fn reference_lines() -> Vec<VersionLine,>
    {
        vec![VersionLine::new(6, 5,), VersionLine::new(6, 6,), VersionLine::new(6, 7,)]
    }

    fn versions(releases: &[Release],) -> Vec<&str,>
    {
        releases.iter().map(|release| release.version.as_str(),).collect()
    }

    #[test]
    fn keeps_highest_patch_per_line()
    {
        let releases = ["6.5.8.2", "6.6.9.9", "6.5.8.18", "6.6.10.6", "6.7.0.9", "6.7.1.0"]
            .into_iter()
            .map(Release::new,)
            .collect();

        let selected = select_latest_per_line(releases, &reference_lines(),);
        assert_eq!(versions(&selected), vec!["6.5.8.18", "6.6.10.6", "6.7.1.0"]);
    }

    #[test]
    fn output_follows_first_seen_line_order()
    {
        let releases = ["6.7.1.0", "6.5.8.18", "6.6.10.6", "6.5.8.19"]
            .into_iter()
            .map(Release::new,)
            .collect();

        let selected = select_latest_per_line(releases, &reference_lines(),);
        assert_eq!(versions(&selected), vec!["6.7.1.0", "6.5.8.19", "6.6.10.6"]);
    }

    #[test]
    fn ties_keep_first_seen_release()
    {
        let first = Release {
            name: Some("first".to_owned(),), ..Release::new("6.7.1",)
        };
        let second = Release {
            name: Some("second".to_owned(),), ..Release::new("6.7.1.0",)
        };

        let selected = select_latest_per_line(vec![first.clone(), second], &reference_lines(),);
        assert_eq!(selected, vec![first]);
    }

    #[test]
    fn duplicates_collapse_to_single_entry()
    {
        let releases = vec![Release::new("6.6.10.6"), Release::new("6.6.10.6")];
        let selected = select_latest_per_line(releases, &reference_lines(),);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn skips_unsupported_and_malformed_versions()
    {
        let releases = ["6.4.20.2", "10.0.1", "nightly", "6.7.2.0-rc1", "6.6.10.6"]
            .into_iter()
            .map(Release::new,)
            .collect();

        let selected = select_latest_per_line(releases, &reference_lines(),);
        assert_eq!(versions(&selected), vec!["6.6.10.6"]);
    }

    #[test]
    fn malformed_versions_are_reported_as_warnings()
    {
        let releases: Vec<Release,> =
            ["6.7.1.0.1", "6.4.20.2", "6.7.1.0"].into_iter().map(Release::new,).collect();

        let (selected, logs,) =
            capture_warnings(|| select_latest_per_line(releases, &reference_lines(),),);
        assert_eq!(versions(&selected), vec!["6.7.1.0"]);
        assert!(logs.contains("Skipping release with unexpected version '6.7.1.0.1'"));
        assert!(!logs.contains("6.4.20.2"), "unsupported lines stay at debug level: {logs}");
    }

    #[test]
    fn multi_digit_components_group_by_parsed_fields()
    {
        let lines = vec![VersionLine::new(10, 0,), VersionLine::new(6, 10,)];
        let releases = ["10.0.1", "10.0.12", "6.10.0.1", "6.1.0.99"]
            .into_iter()
            .map(Release::new,)
            .collect();

        let selected = select_latest_per_line(releases, &lines,);
        assert_eq!(versions(&selected), vec!["10.0.12", "6.10.0.1"]);
    }

    proptest! {
        #[test]
        fn at_most_one_maximal_release_per_line(raw in proptest::collection::vec((5u64..8, 5u64..8, 0u64..20, 0u64..20), 0..32)) {
            let releases: Vec<Release> = raw
                .iter()
                .map(|(major, minor, patch, build)| Release::new(format!("{major}.{minor}.{patch}.{build}")))
                .collect();
            let lines = vec![VersionLine::new(6, 5), VersionLine::new(6, 6), VersionLine::new(6, 7)];

            let selected = select_latest_per_line(releases.clone(), &lines);

            let mut seen = HashSet::new();
            for chosen in &selected {
                let line = chosen.parsed_version().unwrap().line();
                prop_assert!(lines.contains(&line));
                prop_assert!(seen.insert(line));
                for candidate in releases.iter().filter(|candidate| candidate.parsed_version().unwrap().line() == line) {
                    prop_assert!(compare_versions(&chosen.version, &candidate.version).is_ge());
                }
            }

            let expected_lines: HashSet<VersionLine> = releases
                .iter()
                .map(|release| release.parsed_version().unwrap().line())
                .filter(|line| lines.contains(line))
                .collect();
            prop_assert_eq!(seen, expected_lines);
        }
    }
}
