//! Runs the `shmembench` binary against the fake backend.
use std::io::Write;
use std::process::{Command, Output};

fn shmembench(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shmembench"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn fake_backend_reports_the_default_working_set() {
    let output = shmembench(&["--backend", "fake"]);
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Buffer sizes: 8MB\n"), "{}", stdout);
    assert!(stdout.contains("Device specifications"));
    assert!(stdout.contains("ROCm driver version: 12.20\n"));
}

#[cfg(not(feature = "hip"))]
#[test]
fn hip_without_real_gpu_fails() {
    let output = shmembench(&["--backend", "hip"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("must be compiled with --features=real_gpu to use HIP"),
        "{}",
        stderr
    );
}

#[test]
fn failed_device_selection_exits_before_the_benchmark() {
    let file = config_file(
        r#"
        backend = "fake"

        [fake]
        fail_device_selection = true
        "#,
    );
    let output = shmembench(&["--config", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("HIP error in file '"), "{}", stderr);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("Buffer sizes"));
}

#[test]
fn json_output_parses() {
    let output = shmembench(&["--backend", "fake", "--json"]);
    assert!(output.status.success(), "{:?}", output);
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["result"]["buffer_bytes"], 8_388_608);
    assert_eq!(summary["result"]["elements"], 1_048_576);
}

#[test]
fn config_file_sets_the_working_set() {
    let file = config_file(
        r#"
        backend = "fake"
        working_set_elements = 2097152
        "#,
    );
    let output = shmembench(&["--config", file.path().to_str().unwrap()]);
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Buffer sizes: 16MB\n"), "{}", stdout);
}

#[test]
fn invalid_config_is_rejected() {
    let file = config_file("nonexistent_option = 3\n");
    let output = shmembench(&["--config", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("invalid configuration"), "{}", stderr);
}

#[test]
fn oversized_working_set_exits_with_an_error() {
    let output = shmembench(&["--backend", "fake", "--elements", "4611686018427387904"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to allocate"), "{}", stderr);
    assert!(!stderr.contains("panicked"), "{}", stderr);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("Buffer sizes"));
}
