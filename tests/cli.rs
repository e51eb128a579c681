use std::process::{Command, Output};

mod common;
use common::write_dataset;

fn dataset_index(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dataset-index"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary runs")
}

#[test]
fn prints_index_dump() {
    let path = write_dataset("cli", "a b c 2 10.5 20.5 deadbeef cafebabe\n");
    let output = dataset_index(&["--file", path.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\"deadbeef\": (0, 10.5), \"cafebabe\": (1, 20.5)}\n"
    );
}

#[test]
fn empty_file_prints_empty_mapping() {
    let path = write_dataset("cli-empty", "");
    let output = dataset_index(&["-f", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{}\n");
}

#[test]
fn footprint_goes_to_stderr() {
    let path = write_dataset("cli-footprint", "a b c 1 1.0 k\n");
    let output = dataset_index(&["-f", path.to_str().unwrap(), "--capacity", "8", "--footprint"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Table:"), "stderr: {stderr}");
    assert!(stderr.contains("Index:"), "stderr: {stderr}");
}

#[test]
fn missing_argument_prints_usage() {
    let output = dataset_index(&[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn missing_file_fails_without_output() {
    let output = dataset_index(&["-f", "/no/such/dataset.txt"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to index"));
}

#[test]
fn strict_capacity_rejects_overflow() {
    let path = write_dataset("cli-strict", "a b c 2 1 2 k1 k2\n");
    let output = dataset_index(&[
        "-f",
        path.to_str().unwrap(),
        "--capacity",
        "1",
        "--strict-capacity",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("capacity exceeded"));
}

#[test]
fn group_order_flag_switches_layout() {
    let path = write_dataset("cli-order", "a b c 1 k 2.5\n");
    let output = dataset_index(&[
        "-f",
        path.to_str().unwrap(),
        "--group-order",
        "keys-then-values",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"k\": (0, 2.5)}\n");
}

#[test]
fn delimiter_count_field_and_trim_flags_apply() {
    let path = write_dataset("cli-flags", "  id;1; 2.5 ;k one  \n");
    let file = path.to_str().unwrap();

    let output = dataset_index(&[
        "-f",
        file,
        "-d",
        ";",
        "--count-field",
        "1",
        "--trim",
        "whitespace",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"k one\": (0, 2.5)}\n");

    // Without whitespace trimming the trailing padding stays part of the key.
    let output = dataset_index(&["-f", file, "-d", ";", "--count-field", "1"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"k one  \": (0, 2.5)}\n");
}

#[test]
fn unreservable_capacity_exits_with_message() {
    let path = write_dataset("cli-huge", "a b c 0\n");
    let rows = (usize::MAX / 8).to_string();
    let output = dataset_index(&["-f", path.to_str().unwrap(), "--capacity", &rows]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot reserve table"));
}
