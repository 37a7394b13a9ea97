//! End-to-end aggregation over in-memory and on-disk documents.

mod common;

use common::{ResultFileBuilder, repo, two_machine_results, write_data_dir};
use fastyet_core::delta::percent_changes;
use fastyet_core::{
    AggregateConfig, AggregateError, DataSection, DirectorySource, FieldValue, InMemorySource, SizeReference,
    SourceError, assemble, assemble_from, find_coverage_gaps,
};
use tempfile::TempDir;

// ===== Merging =====

#[test]
fn test_reversed_file_order_gives_identical_output() {
    let catalog = [repo("hello", "1.40.0")];
    let forward = two_machine_results();
    let mut reversed = forward.clone();
    reversed.reverse();

    // Sizes come from the first file, so pin the reference to keep it out of the comparison.
    let config = AggregateConfig {
        size_reference: SizeReference::Cores(4),
        ..AggregateConfig::default()
    };
    let a = assemble(&catalog, &forward, &config).unwrap();
    let b = assemble(&catalog, &reversed, &config).unwrap();
    assert_eq!(a.charts, b.charts);
    assert_eq!(
        serde_json::to_string(&a.charts).unwrap(),
        serde_json::to_string(&b.charts).unwrap()
    );
}

#[test]
fn test_point_per_version_with_all_series() {
    let assembly = assemble(&[repo("hello", "1.40.0")], &two_machine_results(), &AggregateConfig::default()).unwrap();
    let chart = &assembly.charts[0];

    let versions: Vec<_> = chart.compile_times.iter().map(|p| p.version().as_str()).collect();
    assert_eq!(versions, ["1.42.0", "1.43.0"]);

    let latest = &chart.compile_times[1];
    assert_eq!(latest.value("Check,Clean,4 cores"), Some(3.0));
    assert_eq!(latest.value("Check,Clean,8 cores"), Some(1.5));
    assert_eq!(latest.value("Release,PatchIncremental,8 cores"), Some(0.75));
    assert_eq!(latest.field_count(), 3);

    assert_eq!(
        chart.series_names(),
        [
            "Check,Clean,4 cores",
            "Check,Clean,8 cores",
            "Debug,Incremental,4 cores",
            "Release,PatchIncremental,8 cores",
        ]
    );
}

#[test]
fn test_intervals_bracket_chart_values() {
    let assembly = assemble(&[repo("hello", "1.40.0")], &two_machine_results(), &AggregateConfig::default()).unwrap();
    let chart = &assembly.charts[0];
    assert_eq!(chart.intervals.len(), 6);
    for series_point in &chart.intervals {
        let point = chart.compile_time_point(&series_point.version).unwrap();
        let value = point.value(&series_point.series.to_string()).unwrap();
        assert_eq!(value, series_point.interval.mid);
        assert!(series_point.interval.low <= value && value <= series_point.interval.high);
    }
}

#[test]
fn test_unknown_core_count_excludes_only_that_file() {
    let mut results = two_machine_results();
    results.push(
        ResultFileBuilder::new(3)
            .timing("hello", "1.43.0,Check,Clean", &[1.0])
            .build(),
    );
    let assembly = assemble(&[repo("hello", "1.40.0")], &results, &AggregateConfig::default()).unwrap();

    assert_eq!(assembly.warnings.len(), 1);
    assert!(matches!(
        assembly.warnings[0].error,
        AggregateError::UnknownSystem(ref e) if e.cores == 3
    ));
    let expected = assemble(&[repo("hello", "1.40.0")], &two_machine_results(), &AggregateConfig::default()).unwrap();
    assert_eq!(assembly.charts, expected.charts);
}

// ===== Sizes =====

#[test]
fn test_sizes_from_first_file() {
    let assembly = assemble(&[repo("hello", "1.40.0")], &two_machine_results(), &AggregateConfig::default()).unwrap();
    let sizes = &assembly.charts[0].sizes;
    assert_eq!(sizes.len(), 2);
    assert_eq!(sizes[0].get("Debug"), Some(&FieldValue::Text("4.000".into())));
    assert_eq!(sizes[1].get("Debug"), Some(&FieldValue::Text("3.000".into())));
    assert_eq!(sizes[1].get("Release"), Some(&FieldValue::Text("1.000".into())));

    let json = serde_json::to_value(&sizes[1]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "version": "1.43.0", "Debug": "3.000", "Release": "1.000" })
    );
}

#[test]
fn test_sizes_from_chosen_system() {
    let config = AggregateConfig {
        size_reference: SizeReference::Cores(8),
        ..AggregateConfig::default()
    };
    let assembly = assemble(&[repo("hello", "1.40.0")], &two_machine_results(), &config).unwrap();
    let sizes = &assembly.charts[0].sizes;
    assert_eq!(sizes.len(), 1);
    assert_eq!(sizes[0].value("Debug"), Some(5.0));
}

// ===== Deltas =====

#[test]
fn test_delta_over_assembled_series() {
    let assembly = assemble(&[repo("hello", "1.40.0")], &two_machine_results(), &AggregateConfig::default()).unwrap();
    let deltas = percent_changes(&assembly.charts[0].compile_times, "Check,Clean,4 cores");
    assert_eq!(deltas[0].delta, Some(0.0));
    // 4.0s -> 3.0s
    assert_eq!(deltas[1].delta, Some(25.0));

    let size_deltas = percent_changes(&assembly.charts[0].sizes, "Debug");
    assert_eq!(size_deltas[1].delta, Some(25.0));
}

// ===== Errors =====

#[test]
fn test_cataloged_repo_without_data() {
    let catalog = [repo("hello", "1.40.0"), repo("missing", "1.40.0")];
    let err = assemble(&catalog, &two_machine_results(), &AggregateConfig::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "repository \"missing\" is in the catalog but has no compile time data"
    );

    let lenient = AggregateConfig {
        strict: false,
        ..AggregateConfig::default()
    };
    let assembly = assemble(&catalog, &two_machine_results(), &lenient).unwrap();
    assert!(assembly.warnings.iter().all(|w| w.repo.as_deref() == Some("missing")));
    assert!(assembly.warnings.iter().any(|w| matches!(
        w.error,
        AggregateError::MissingRepoData {
            section: DataSection::Sizes,
            ..
        }
    )));
}

#[test]
fn test_malformed_bucket_does_not_touch_others() {
    let results = vec![
        ResultFileBuilder::new(2)
            .timing("hello", "1.43.0,Debug", &[1.0])
            .timing("hello", "1.43.0,Turbo,Clean", &[1.0])
            .timing("hello", "1.43.0,Debug,Clean", &[2000.0])
            .size("hello", "1.43.0,Debug", 1_048_576)
            .build(),
    ];
    let assembly = assemble(&[repo("hello", "1.40.0")], &results, &AggregateConfig::default()).unwrap();
    assert_eq!(assembly.warnings.len(), 2);
    let point = &assembly.charts[0].compile_times[0];
    assert_eq!(point.field_count(), 1);
    assert_eq!(point.value("Debug,Clean,2 cores"), Some(2.0));
}

// ===== Coverage =====

#[test]
fn test_coverage_gaps_for_two_machines() {
    let gaps = find_coverage_gaps(&[repo("hello", "1.40.0")], &two_machine_results());
    let rendered: Vec<_> = gaps.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        [
            "hello 1.42.0: no data for Debug,Incremental,8 cores",
            "hello 1.43.0: no data for Release,PatchIncremental,4 cores",
        ]
    );
    assert!(find_coverage_gaps(&[repo("hello", "1.43.0")], &two_machine_results()).len() == 1);
}

// ===== Sources =====

#[test]
fn test_directory_and_memory_sources_agree() {
    let dir = TempDir::new().unwrap();
    let catalog = vec![repo("hello", "1.40.0")];
    let results = two_machine_results();
    write_data_dir(dir.path(), &catalog, &results);

    let config = AggregateConfig::default();
    let from_disk = assemble_from(&DirectorySource::new(dir.path()), &config).unwrap();
    let from_memory = assemble_from(&InMemorySource::new(catalog, results), &config).unwrap();
    assert_eq!(from_disk.charts, from_memory.charts);
}

#[test]
fn test_config_directory_source() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path(), &[repo("hello", "1.40.0")], &two_machine_results());

    let mut config = AggregateConfig::default();
    config
        .apply_toml(&format!("data_dir = {:?}\nsize_reference = {{ cores = 8 }}", dir.path()))
        .unwrap();
    let assembly = assemble_from(&config.directory_source(), &config).unwrap();
    assert_eq!(assembly.charts[0].sizes[0].value("Debug"), Some(5.0));
}

#[test]
fn test_unreadable_result_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path(), &[repo("hello", "1.40.0")], &two_machine_results());
    std::fs::write(dir.path().join("results-zz.json"), "[1, 2").unwrap();

    let err = assemble_from(&DirectorySource::new(dir.path()), &AggregateConfig::default()).unwrap_err();
    assert!(matches!(err, AggregateError::Source(SourceError::Json { .. })));
}
