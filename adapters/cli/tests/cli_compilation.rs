use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "frame-assault"])
        .status()
        .expect("failed to invoke cargo check for frame-assault CLI binary");

    assert!(status.success(), "cargo check --bin frame-assault should succeed");
}

#[test]
fn short_skirmish_prints_banner_and_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_frame-assault"))
        .args(["--seed", "7", "--ticks", "1", "--enemies", "2", "--script", "a"])
        .output()
        .expect("failed to run frame-assault");

    assert!(output.status.success(), "frame-assault should exit cleanly");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("After 1 ticks:"), "missing summary in {stdout}");
}

#[test]
fn unknown_script_symbol_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_frame-assault"))
        .args(["--ticks", "1", "--script", "?"])
        .output()
        .expect("failed to run frame-assault");

    assert!(!output.status.success());
}
