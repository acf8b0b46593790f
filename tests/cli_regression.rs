// Regression tests: drive the palimpsest binary end to end and check that
// errors surface as miette diagnostics with stable codes.
// Requires: assert_cmd, predicates, tempfile crates in [dev-dependencies]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use palimpsest::{FailureObserved, Fingerprint, SessionEvent};
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const DEMO: &str = "    >>> beep()\n    boop\n";

fn palimpsest() -> Command {
    Command::cargo_bin("palimpsest").unwrap()
}

fn write_demo(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("demo.py");
    fs::write(&path, DEMO).unwrap();
    path
}

/// Builds a record stream: one `collect` event per tracked path, then one
/// `failure` replacing line 1 of the demo file.
fn write_records(dir: &TempDir, demo: &Path, tracked: bool) -> PathBuf {
    let mut lines = Vec::new();
    if tracked {
        let event = SessionEvent::Collect {
            path: demo.to_path_buf(),
            fingerprint: Fingerprint::of_file(demo).unwrap(),
        };
        lines.push(serde_json::to_string(&event).unwrap());
    }
    let event = SessionEvent::Failure(FailureObserved {
        path: demo.to_path_buf(),
        declaration_line: 0,
        example_line: 0,
        source_line_count: 1,
        expected_line_count: 1,
        actual_output: "BOOP\n".to_string(),
    });
    lines.push(serde_json::to_string(&event).unwrap());

    let records = dir.path().join("records.jsonl");
    fs::write(&records, lines.join("\n") + "\n").unwrap();
    records
}

#[test]
fn apply_without_accept_flags_is_inert() {
    let dir = TempDir::new().unwrap();
    let demo = write_demo(&dir);
    let records = write_records(&dir, &demo, true);

    palimpsest()
        .arg("apply")
        .arg(&records)
        .assert()
        .success()
        .stdout(contains("pending:").and(contains("accept summary:")));

    assert_eq!(fs::read_to_string(&demo).unwrap(), DEMO);
}

#[test]
fn apply_accept_rewrites_in_place() {
    let dir = TempDir::new().unwrap();
    let demo = write_demo(&dir);
    let records = write_records(&dir, &demo, true);

    palimpsest()
        .arg("apply")
        .arg(&records)
        .arg("--accept")
        .assert()
        .success()
        .stdout(contains("accepted:"));

    assert_eq!(
        fs::read_to_string(&demo).unwrap(),
        "    >>> beep()\n    BOOP\n"
    );
}

#[test]
fn apply_accept_copy_leaves_the_original_alone() {
    let dir = TempDir::new().unwrap();
    let demo = write_demo(&dir);
    let records = write_records(&dir, &demo, true);

    palimpsest()
        .arg("apply")
        .arg(&records)
        .arg("--accept-copy")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&demo).unwrap(), DEMO);
    assert_eq!(
        fs::read_to_string(dir.path().join("demo.py.new")).unwrap(),
        "    >>> beep()\n    BOOP\n"
    );
}

#[test]
fn apply_strict_skips_untracked_files() {
    let dir = TempDir::new().unwrap();
    let demo = write_demo(&dir);
    let records = write_records(&dir, &demo, false);

    palimpsest()
        .arg("apply")
        .arg(&records)
        .arg("--accept")
        .arg("--strict")
        .assert()
        .success()
        .stdout(contains("skipped (untracked):"))
        .stderr(contains("warning:").and(contains("never fingerprinted")));

    assert_eq!(fs::read_to_string(&demo).unwrap(), DEMO);
}

#[test]
fn apply_diff_prints_removed_and_added_lines() {
    let dir = TempDir::new().unwrap();
    let demo = write_demo(&dir);
    let records = write_records(&dir, &demo, true);

    palimpsest()
        .arg("apply")
        .arg(&records)
        .arg("--accept")
        .arg("--diff")
        .assert()
        .success()
        .stdout(contains("-    boop").and(contains("+    BOOP")));
}

#[test]
fn malformed_records_report_a_diagnostic_code() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("records.jsonl");
    fs::write(&records, "this is not json\n").unwrap();

    palimpsest()
        .arg("apply")
        .arg(&records)
        .assert()
        .failure()
        .stderr(contains("palimpsest::records::malformed"));
}

#[test]
fn missing_records_file_reports_a_diagnostic_code() {
    palimpsest()
        .arg("apply")
        .arg("no/such/records.jsonl")
        .assert()
        .failure()
        .stderr(contains("palimpsest::io::read"));
}

#[test]
fn fingerprint_prints_checksum_lines() {
    let dir = TempDir::new().unwrap();
    let demo = write_demo(&dir);
    let expected = Fingerprint::of_file(&demo).unwrap().to_string();

    palimpsest()
        .arg("fingerprint")
        .arg(&demo)
        .assert()
        .success()
        .stdout(contains(&expected).and(contains("demo.py")));
}

#[test]
fn fingerprint_json_emits_replayable_collect_events() {
    let dir = TempDir::new().unwrap();
    let demo = write_demo(&dir);

    let assert = palimpsest()
        .arg("fingerprint")
        .arg(&demo)
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let event: SessionEvent = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(
        event,
        SessionEvent::Collect {
            path: demo.clone(),
            fingerprint: Fingerprint::of_file(&demo).unwrap(),
        }
    );
}

#[test]
fn fingerprint_walks_directories_with_an_extension_filter() {
    let dir = TempDir::new().unwrap();
    write_demo(&dir);
    fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

    palimpsest()
        .arg("fingerprint")
        .arg(dir.path())
        .arg("--ext")
        .arg("py")
        .assert()
        .success()
        .stdout(contains("demo.py").and(contains("notes.txt").not()));
}
