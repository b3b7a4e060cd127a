use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_horsepower"))
}

fn fixture_file(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn replay_json(name: &str) -> Vec<Value> {
    let output = cli()
        .args(["replay", "--input", &fixture_file(name)])
        .output()
        .expect("failed to run horsepower replay");
    assert_success(&output, "replay");

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("one JSON document per line"))
        .collect()
}

fn assert_success(output: &Output, command: &str) {
    assert!(
        output.status.success(),
        "{command} exited with {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn try_ends(lines: &[Value]) -> Vec<&Value> {
    lines
        .iter()
        .filter(|line| line["emission"]["type"] == "try_ended")
        .map(|line| &line["emission"]["payload"])
        .collect()
}

#[test]
fn single_lift_replay_reports_one_try() {
    let lines = replay_json("single_lift.log");
    let (telemetry, emissions) = lines.split_last().expect("at least the telemetry line");

    // Baseline and the debounced duplicate are not printed
    assert_eq!(emissions.len(), 33);
    assert!(emissions
        .iter()
        .all(|line| line["emission"]["type"] != "baseline"
            && line["emission"]["type"] != "debounced"));

    let tries = try_ends(emissions);
    assert_eq!(tries.len(), 1);
    let summary = tries[0];
    assert!((summary["peak_hp"].as_f64().unwrap() - 0.0947).abs() < 1e-3);
    assert!((summary["duration_s"].as_f64().unwrap() - 1.0).abs() < 1e-6);
    assert!((summary["distance_mm"].as_f64().unwrap() - 576.0).abs() < 1e-6);

    let counters = &telemetry["telemetry"]["counters"];
    assert_eq!(counters["tries_completed"], 1);
    assert_eq!(counters["malformed_lines"], 1);
    assert_eq!(counters["language_changes"], 1);
    assert_eq!(counters["samples_debounced"], 1);
}

#[test]
fn noisy_session_replay_counts_every_try() {
    let lines = replay_json("noisy_session.log");
    let (telemetry, emissions) = lines.split_last().expect("at least the telemetry line");

    // Raising and lowering the bar each count as a try
    let tries = try_ends(emissions);
    assert_eq!(tries.len(), 4);
    for summary in &tries {
        let peak = summary["peak_hp"].as_f64().unwrap();
        assert!(peak > 0.05 && peak < 0.1, "unexpected peak {peak}");
    }

    let counters = &telemetry["telemetry"]["counters"];
    assert_eq!(counters["tries_completed"], 4);
    assert_eq!(counters["malformed_lines"], 2);
    assert_eq!(counters["language_changes"], 2);
    assert_eq!(counters["samples_debounced"], 1);

    let recent = telemetry["telemetry"]["recent"]
        .as_array()
        .expect("recent events array");
    assert!(recent
        .iter()
        .any(|event| event["type"] == "malformed_line" && event["payload"]["line"] == "ERR"));
}

#[test]
fn text_replay_ends_with_panel_and_snapshot() {
    let output = cli()
        .args([
            "replay",
            "--input",
            &fixture_file("single_lift.log"),
            "--format",
            "text",
        ])
        .output()
        .expect("failed to run horsepower replay");
    assert_success(&output, "replay");

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert!(stdout.starts_with("t=2.20s try: 0.09 hp"), "got {stdout}");
    // One SPACE press switched the panel to English
    assert!(stdout.contains("Horsepower"), "got {stdout}");
    assert!(stdout.contains("You lifted 7.5 kg to a height of 57.6 cm"));
    assert!(stdout.contains("\"tries_completed\": 1"));
}

#[test]
fn missing_replay_file_fails() {
    let output = cli()
        .args(["replay", "--input", &fixture_file("does_not_exist.log")])
        .output()
        .expect("failed to run horsepower replay");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3004"), "got {stderr}");
}

#[test]
fn simulate_output_replays_to_one_try() {
    let output_path =
        std::env::temp_dir().join(format!("horsepower-simulate-{}.log", std::process::id()));

    let output = cli()
        .args([
            "simulate",
            "--seed",
            "11",
            "--switch-language-at",
            "0.55",
            "--output",
            output_path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run horsepower simulate");
    assert_success(&output, "simulate");

    let data = std::fs::read_to_string(&output_path).expect("session written to disk");
    assert!(data.starts_with("# synthetic lift seed=11"));
    assert!(data.contains(",SPACE\n"));

    let output = cli()
        .args(["replay", "--input", output_path.to_str().unwrap()])
        .output()
        .expect("failed to run horsepower replay");
    assert_success(&output, "replay");
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let last: Value =
        serde_json::from_str(stdout.lines().last().expect("telemetry line")).expect("JSON");
    assert_eq!(last["telemetry"]["counters"]["tries_completed"], 1);
    assert_eq!(last["telemetry"]["counters"]["language_changes"], 1);

    let _ = std::fs::remove_file(&output_path);
}
