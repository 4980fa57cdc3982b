// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::{collections::HashSet, fs};

use shopware_matrix::{
    BAKE_MATRIX_FILE, BUILD_SUMMARY_FILE, FileSink, GITHUB_MATRIX_FILE, GithubReleaseSource,
    MatrixConfig, Release, StaticReleaseSource, VersionLine, build_artifacts, generate,
    parse_config,
};
use tempfile::tempdir;

fn releases(versions: &[&str],) -> Vec<Release,>
{
    versions.iter().copied().map(Release::new,).collect()
}

#[test]
fn release_candidates_are_dropped_and_latest_is_flagged()
{
    let config = MatrixConfig {
        latest_version: Some("6.7.1.0".to_owned(),), ..MatrixConfig::default()
    };
    let input = releases(&["6.5.8.18", "6.6.10.6", "6.7.1.0", "6.7.2.0-rc1"],);

    let artifacts = build_artifacts(input, &config,).expect("pipeline succeeds",);
    let include = &artifacts.matrix.include;

    assert_eq!(include.len(), 6);
    assert!(include.iter().all(|entry| !entry.shopware_version.contains("rc")));
    assert_eq!(artifacts.summary.shopware_versions, vec!["6.5.8.18", "6.6.10.6", "6.7.1.0"]);

    let latest: Vec<(&str, &str,),> = include
        .iter()
        .filter(|entry| entry.is_latest,)
        .map(|entry| (entry.shopware_version.as_str(), entry.variant.as_str(),),)
        .collect();
    assert_eq!(latest, vec![("6.7.1.0", "full"), ("6.7.1.0", "slim")]);
}

#[tokio::test]
async fn unreachable_registry_still_produces_documents()
{
    let temp = tempdir().expect("failed to create tempdir",);
    let output_dir = temp.path().join("build-config",);

    let mut config = MatrixConfig::default();
    config.source.api_base = "http://127.0.0.1:9".to_owned();
    config.source.timeout_secs = 10;
    let source = GithubReleaseSource::new(config.source.clone(),);
    let sink = FileSink::new(&output_dir,);

    let artifacts = generate(&source, &sink, &config,).await.expect("generation succeeds",);
    assert_eq!(artifacts.matrix.include.len(), 6);

    let matrix: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(output_dir.join(GITHUB_MATRIX_FILE,),).expect("matrix written",),
    )
    .expect("valid json",);
    assert!(!matrix["include"].as_array().expect("include array",).is_empty());

    let bake: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(output_dir.join(BAKE_MATRIX_FILE,),).expect("bake written",),
    )
    .expect("valid json",);
    assert!(!bake.as_object().expect("target map",).is_empty());
    assert!(bake.get("shopware-6-7-full").is_some());
}

#[tokio::test]
async fn line_without_compatibility_row_uses_defaults()
{
    let yaml = r#"
supported_lines: ["6.7", "6.8"]
fallback_releases:
  - version: 6.7.1.0
  - version: 6.8.0.0
"#;
    let config = parse_config(yaml,).expect("valid configuration",);
    assert!(!config.compatibility.contains_key(&VersionLine::new(6, 8,)));

    let temp = tempdir().expect("failed to create tempdir",);
    let source = StaticReleaseSource::new(releases(&["6.8.0.0", "6.8.0.1", "6.7.1.0"],),);
    let sink = FileSink::new(temp.path(),);

    let artifacts = generate(&source, &sink, &config,).await.expect("generation succeeds",);
    let on_new_line: Vec<_,> = artifacts
        .matrix
        .include
        .iter()
        .filter(|entry| entry.context_path == "6.8",)
        .collect();

    // Values only; the fallback warning is asserted in the compat unit tests.
    assert_eq!(on_new_line.len(), 2);
    assert!(on_new_line.iter().all(|entry| entry.shopware_version == "6.8.0.1"));
    assert!(on_new_line.iter().all(|entry| entry.php_version == "8.3"));
    assert!(on_new_line.iter().all(|entry| entry.node_version == "20.18.0"));
}

#[test]
fn summary_lists_never_repeat_values()
{
    let config = MatrixConfig::default();
    let input = releases(&["6.5.8.18", "6.6.10.6", "6.6.10.5", "6.7.1.0", "6.7.0.0"],);

    let summary = build_artifacts(input, &config,).expect("pipeline succeeds",).summary;
    let json = serde_json::to_value(&summary,).expect("serializable",);

    assert_eq!(json["total_variants"], 6);
    for field in ["shopware_versions", "php_versions", "variants"] {
        let values = json[field].as_array().expect("array",);
        let distinct: HashSet<String,> = values.iter().map(ToString::to_string,).collect();
        assert_eq!(values.len(), distinct.len(), "{field} contains duplicates");
    }
    assert_eq!(summary.php_versions, vec!["8.2", "8.3", "8.4"]);
}

#[tokio::test]
async fn written_documents_are_stable_across_runs()
{
    let config = MatrixConfig::default();
    let source = StaticReleaseSource::new(config.fallback_releases.clone(),);
    let first = tempdir().expect("failed to create tempdir",);
    let second = tempdir().expect("failed to create tempdir",);

    generate(&source, &FileSink::new(first.path(),), &config,).await.expect("first run",);
    generate(&source, &FileSink::new(second.path(),), &config,).await.expect("second run",);

    for file in [GITHUB_MATRIX_FILE, BAKE_MATRIX_FILE, BUILD_SUMMARY_FILE] {
        let left = fs::read(first.path().join(file,),).expect("first output",);
        let right = fs::read(second.path().join(file,),).expect("second output",);
        assert_eq!(left, right, "{file} differs between runs");
    }
}
