use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn headless_run_prints_final_state() {
    let mut cmd = Command::cargo_bin("flashlight-walkthrough").expect("binary exists");
    cmd.arg("--headless").arg("--frames").arg("3");
    cmd.assert()
        .success()
        .stdout(contains("Built scene with 17 nodes"))
        .stdout(contains("Ran 3 frame(s)"))
        .stdout(contains(" - entity (mesh) pos=(0.00, 0.00, 9.96)"))
        .stdout(contains(" - glint (mesh) pos=(0.01, 0.01, -2.15)"))
        .stdout(contains(" - flashlight (spot light) pos=(0.01, 0.01, 0.00)"))
        .stdout(contains(" - door 1 (mesh) pos=(4.15, -0.50, 5.40)"))
        .stdout(contains("Glint material transparent=true opacity=0.00"));
}

#[test]
fn headless_defaults_to_a_single_frame() {
    let mut cmd = Command::cargo_bin("flashlight-walkthrough").expect("binary exists");
    cmd.arg("--headless");
    cmd.assert()
        .success()
        .stdout(contains("Ran 1 frame(s)"))
        .stdout(contains(" - entity (mesh) pos=(0.00, 0.00, 9.99)"));
}

#[test]
fn unknown_argument_is_rejected() {
    let mut cmd = Command::cargo_bin("flashlight-walkthrough").expect("binary exists");
    cmd.arg("--fullscreen");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --fullscreen"));
}
