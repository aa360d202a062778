//! End-to-end tests for the archive transcoder.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use gtfs_filter_core::FilterError;
use gtfs_filter_core::FilterRegistry;
use gtfs_filter_core::ProgressCallback;
use gtfs_filter_core::test_utils::read_zip_entries;
use gtfs_filter_core::test_utils::write_test_zip;
use gtfs_filter_core::transcode;
use gtfs_filter_core::transcode_with_progress;
use std::path::PathBuf;
use tempfile::TempDir;

fn paths(temp: &TempDir) -> (PathBuf, PathBuf) {
    (temp.path().join("gtfs.zip"), temp.path().join("out.zip"))
}

#[test]
fn test_pass_through_file_unchanged() {
    // Scenario A: stops.txt survives byte-identically.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    let stops = "stop_id,stop_name\n1,Central\n2,Harbor\n";
    write_test_zip(&input, vec![("stops.txt", stops.as_bytes())]);

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(report.files_written, 1);
    assert_eq!(report.rows_written, 2);
    assert!(report.is_clean());

    let entries = read_zip_entries(&output);
    assert_eq!(entries, vec![("stops.txt".to_string(), stops.to_string())]);
}

#[test]
fn test_feed_info_columns_stripped() {
    // Scenario B: conv_rev and plan_rev disappear from header and rows.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![(
            "feed_info.txt",
            b"feed_publisher_name,feed_lang,conv_rev,plan_rev\n\"Acme\",\"en\",\"7\",\"3\"\n"
                .as_slice(),
        )],
    );

    transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    let entries = read_zip_entries(&output);
    assert_eq!(
        entries,
        vec![(
            "feed_info.txt".to_string(),
            "feed_publisher_name,feed_lang\nAcme,en\n".to_string()
        )]
    );
}

#[test]
fn test_blacklisted_file_dropped() {
    // Scenario C: a file named exactly `logging` leaves no output entry.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("logging", b"ts,msg\n1,boot\n".as_slice()),
            ("stops.txt", b"stop_id,stop_name\n1,Central\n".as_slice()),
        ],
    );

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.files_written, 1);
    assert!(report.has_warnings());
    assert!(report.warnings.iter().any(|w| w.contains("logging")));

    let names: Vec<String> = read_zip_entries(&output).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["stops.txt".to_string()]);
}

#[test]
fn test_missing_input_fails_before_output() {
    // Scenario D: bad input path, no output file created.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);

    let err = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap_err();

    assert!(matches!(err, FilterError::ArchiveOpen { .. }));
    assert!(err.is_fatal());
    assert!(!output.exists());
}

#[test]
fn test_invalid_archive_rejected() {
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    std::fs::write(&input, b"this is not a zip archive").unwrap();

    let err = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap_err();

    assert!(matches!(err, FilterError::ArchiveOpen { .. }));
    assert!(!output.exists());
}

#[test]
fn test_existing_output_untouched() {
    // Scenario E: exclusive create, never overwrite.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(&input, vec![("stops.txt", b"stop_id\n1\n".as_slice())]);
    std::fs::write(&output, b"precious bytes").unwrap();

    let err = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap_err();

    assert!(matches!(err, FilterError::OutputExists { .. }));
    assert_eq!(std::fs::read(&output).unwrap(), b"precious bytes");
}

#[test]
fn test_round_trip_entry_count() {
    // Zero blacklisted names: N entries in, N entries out.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("agency.txt", b"agency_id,agency_name\n1,Acme Transit\n".as_slice()),
            ("routes.txt", b"route_id,route_type\n10,3\n".as_slice()),
            ("stops.txt", b"stop_id,stop_name\n1,Central\n".as_slice()),
            ("trips.txt", b"trip_id,route_id\n100,10\n".as_slice()),
        ],
    );

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(report.files_written, 4);
    assert_eq!(read_zip_entries(&output).len(), 4);
}

#[test]
fn test_output_order_deterministic() {
    // Output entries follow the sorted staging walk, not zip order.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("stops.txt", b"stop_id\n1\n".as_slice()),
            ("agency.txt", b"agency_id\n1\n".as_slice()),
            ("routes.txt", b"route_id\n10\n".as_slice()),
        ],
    );

    transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    let names: Vec<String> = read_zip_entries(&output).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["agency.txt", "routes.txt", "stops.txt"]);
}

#[test]
fn test_idempotent_row_content() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("gtfs.zip");
    write_test_zip(
        &input,
        vec![
            ("feed_info.txt", b"feed_publisher_name,conv_rev\nAcme,9\n".as_slice()),
            ("stops.txt", b"stop_id,stop_name\n1,Central\n".as_slice()),
        ],
    );

    let out1 = temp.path().join("out1.zip");
    let out2 = temp.path().join("out2.zip");
    transcode(&input, &out1, &FilterRegistry::gtfs()).unwrap();
    transcode(&input, &out2, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(read_zip_entries(&out1), read_zip_entries(&out2));
}

#[test]
fn test_nested_paths_preserved() {
    // Same base name in two subdirectories must not collide in staging.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("north/stops.txt", b"stop_id,stop_name\n1,North End\n".as_slice()),
            ("south/stops.txt", b"stop_id,stop_name\n2,South End\n".as_slice()),
        ],
    );

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();
    assert_eq!(report.files_written, 2);

    let entries = read_zip_entries(&output);
    assert_eq!(
        entries,
        vec![
            (
                "north/stops.txt".to_string(),
                "stop_id,stop_name\n1,North End\n".to_string()
            ),
            (
                "south/stops.txt".to_string(),
                "stop_id,stop_name\n2,South End\n".to_string()
            ),
        ]
    );
}

#[test]
fn test_blacklist_matches_base_name_in_subdirectory() {
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("internal/logging", b"ts,msg\n1,boot\n".as_slice()),
            ("stops.txt", b"stop_id\n1\n".as_slice()),
        ],
    );

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(report.files_skipped, 1);
    let names: Vec<String> = read_zip_entries(&output).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["stops.txt".to_string()]);
}

#[test]
fn test_malformed_file_does_not_abort_run() {
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            // Data row has one field too many.
            ("broken.txt", b"a,b\n1,2,3\n".as_slice()),
            ("stops.txt", b"stop_id,stop_name\n1,Central\n".as_slice()),
        ],
    );

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(report.files_failed, 1);
    assert_eq!(report.files_written, 1);
    assert!(!report.is_clean());
    assert!(report.warnings.iter().any(|w| w.contains("broken.txt")));

    let names: Vec<String> = read_zip_entries(&output).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["stops.txt".to_string()]);
}

#[test]
fn test_feed_info_registry_hit_requires_exact_name() {
    // Only the literal base name feed_info.txt gets column stripping.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    let other = "feed_publisher_name,conv_rev\nAcme,9\n";
    write_test_zip(&input, vec![("feed_information.txt", other.as_bytes())]);

    transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    let entries = read_zip_entries(&output);
    assert_eq!(entries[0].1, other);
}

#[test]
fn test_synthetic_registry_injection() {
    // The transcoder takes whatever registry it is handed.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("audit.txt", b"event,who\nlogin,alice\n".as_slice()),
            ("stops.txt", b"stop_id\n1\n".as_slice()),
        ],
    );

    let registry = FilterRegistry::new().with_blacklisted("audit.txt");
    let report = transcode(&input, &output, &registry).unwrap();

    assert_eq!(report.files_skipped, 1);
    let names: Vec<String> = read_zip_entries(&output).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["stops.txt".to_string()]);
}

#[test]
fn test_progress_callbacks_invoked() {
    #[derive(Default)]
    struct TestProgress {
        started: Vec<String>,
        completed: Vec<String>,
        finished: bool,
    }

    impl ProgressCallback for TestProgress {
        fn on_file_start(&mut self, name: &str, _total: usize, _current: usize) {
            self.started.push(name.to_string());
        }

        fn on_file_complete(&mut self, name: &str) {
            self.completed.push(name.to_string());
        }

        fn on_complete(&mut self) {
            self.finished = true;
        }
    }

    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("stops.txt", b"stop_id\n1\n".as_slice()),
            ("logging", b"x\n1\n".as_slice()),
        ],
    );

    let mut progress = TestProgress::default();
    transcode_with_progress(&input, &output, &FilterRegistry::gtfs(), &mut progress).unwrap();

    // Blacklisted files still report progress; they just produce nothing.
    assert_eq!(progress.started, vec!["stops.txt", "logging"]);
    assert_eq!(progress.completed, vec!["stops.txt", "logging"]);
    assert!(progress.finished);
}

#[test]
fn test_all_columns_excluded_keeps_empty_entry() {
    // A file whose header is entirely excluded stays in the output as an
    // empty entry; the entry count invariant holds.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("feed_info.txt", b"conv_rev,plan_rev\n7,3\n".as_slice()),
            ("stops.txt", b"stop_id\n1\n".as_slice()),
        ],
    );

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(report.files_written, 2);
    assert!(report.is_clean());

    let entries = read_zip_entries(&output);
    assert_eq!(
        entries,
        vec![
            ("feed_info.txt".to_string(), String::new()),
            ("stops.txt".to_string(), "stop_id\n1\n".to_string()),
        ]
    );
}

#[test]
fn test_empty_file_entry_preserved() {
    // A zero-byte input file round-trips as a zero-byte output entry.
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(
        &input,
        vec![
            ("frequencies.txt", b"".as_slice()),
            ("stops.txt", b"stop_id\n1\n".as_slice()),
        ],
    );

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(report.files_written, 2);
    let entries = read_zip_entries(&output);
    assert_eq!(entries[0], ("frequencies.txt".to_string(), String::new()));
}

#[test]
fn test_empty_archive_produces_empty_archive() {
    let temp = TempDir::new().unwrap();
    let (input, output) = paths(&temp);
    write_test_zip(&input, vec![]);

    let report = transcode(&input, &output, &FilterRegistry::gtfs()).unwrap();

    assert_eq!(report.files_written, 0);
    assert!(output.exists());
    assert!(read_zip_entries(&output).is_empty());
}
