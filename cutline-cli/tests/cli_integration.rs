use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn cutline_cmd() -> Command {
    Command::cargo_bin("cutline").expect("Failed to find cutline binary")
}

#[test]
fn test_help_lists_main_options() {
    cutline_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--input"))
        .stdout(contains("--fade"))
        .stdout(contains("--gif"));
}

#[test]
fn test_missing_arguments_is_a_usage_error() {
    cutline_cmd().assert().failure().code(2);
    cutline_cmd().args(["-i", "in.mkv"]).assert().failure().code(2);
}

#[test]
fn test_conflicting_targets_are_rejected() {
    cutline_cmd()
        .args(["-i", "in.mkv", "--gif", "--x265", "out.gif"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_conflicting_end_options_are_rejected() {
    cutline_cmd()
        .args(["-i", "in.mkv", "-t", "5", "--to", "0:10", "out.mp4"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("cannot be used with"));
}

#[test]
fn test_invalid_crop_fails_before_probing() {
    // The input does not exist, so reaching the existence check would give a
    // different message.
    cutline_cmd()
        .args(["-i", "missing.mkv", "-c", "640:360:10", "out.mp4"])
        .env("CUTLINE_FFPROBE", "cutline-no-such-ffprobe")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Invalid crop specification"));
}

#[test]
fn test_invalid_timestamp_is_reported() {
    cutline_cmd()
        .args(["-i", "missing.mkv", "-s", "soon", "out.mp4"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Unrecognized time expression: 'soon'"));
}

#[test]
fn test_nonexistent_input_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("nope.mkv");
    let output = dir.path().join("out.mp4");

    cutline_cmd()
        .arg("-i")
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("does not exist"));

    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_missing_ffprobe_is_reported() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("in.mkv");
    std::fs::write(&input, b"not really video")?;

    cutline_cmd()
        .arg("-i")
        .arg(&input)
        .arg("--ffprobe-path")
        .arg("cutline-no-such-ffprobe")
        .arg("--dry-run")
        .arg(dir.path().join("out.mp4"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Required external command not found"));
    Ok(())
}
