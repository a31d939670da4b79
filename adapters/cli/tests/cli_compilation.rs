use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "tower-defense"])
        .status()
        .expect("failed to invoke cargo check for tower-defense CLI binary");

    assert!(status.success(), "cargo check --bin tower-defense should succeed");
}

#[test]
fn cli_runs_a_short_headless_session() {
    let output = Command::new(env!("CARGO_BIN_EXE_tower-defense"))
        .args([
            "--ticks",
            "60",
            "--tower",
            "basic@140,180",
            "--export-layout",
        ])
        .output()
        .expect("failed to launch tower-defense binary");

    assert!(output.status.success(), "headless run should exit cleanly");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.trim().starts_with("td:v1:"),
        "exported layout missing from stdout: {stdout}"
    );
}
