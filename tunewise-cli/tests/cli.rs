//! End-to-end tests for the tunewise binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn tunewise() -> Command {
    Command::cargo_bin("tunewise").expect("tunewise binary")
}

fn civic_args() -> Vec<&'static str> {
    vec![
        "recommend",
        "--make",
        "Honda",
        "--model",
        "Civic",
        "--year",
        "2019",
        "--goal",
        "daily_comfort",
        "--budget",
        "moderate",
        "--max-budget",
        "3000",
    ]
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_sample_feeds_recommend_via_stdin() {
    let sample = tunewise().arg("sample").output().expect("run sample");
    assert!(sample.status.success());
    let request = stdout_json(&sample);
    assert_eq!(request["vehicle"]["make"], "BMW");

    let output = tunewise()
        .args(["recommend", "--request", "-", "--format", "json"])
        .write_stdin(sample.stdout)
        .output()
        .expect("run recommend");
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(report["schema"], "tunewise.report.v1");
    assert!(!report["recommendations"].as_array().expect("array").is_empty());
}

#[test]
fn test_recommend_from_flags_text() {
    tunewise()
        .args(civic_args())
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommendations for 2019 Honda Civic"));
}

#[test]
fn test_recommend_is_deterministic() {
    let run = || {
        let mut args = civic_args();
        args.extend(["--format", "json"]);
        tunewise().args(args).output().expect("run").stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_unknown_make_is_rejected() {
    tunewise()
        .args([
            "recommend", "--make", "Yugo", "--model", "GV", "--year", "1988", "--goal",
            "performance",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown make: Yugo"));
}

#[test]
fn test_no_validate_lets_unknown_make_through() {
    tunewise()
        .args([
            "recommend",
            "--make",
            "Yugo",
            "--model",
            "GV",
            "--year",
            "1988",
            "--goal",
            "performance",
            "--no-validate",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Yugo GV"));
}

#[test]
fn test_strict_budget_below_cheapest_exits_two() {
    let mut args = civic_args();
    args.truncate(args.len() - 1);
    args.extend(["10", "--strict-budget", "--no-validate"]);
    tunewise()
        .args(args)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid preferences"));
}

#[test]
fn test_max_budget_outside_tier_is_rejected() {
    let mut args = civic_args();
    args.truncate(args.len() - 1);
    args.push("500");
    tunewise()
        .args(args)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("outside the moderate tier"));
}

#[test]
fn test_missing_required_flag_is_usage_error() {
    tunewise()
        .args(["recommend", "--make", "Honda", "--year", "2019", "--goal", "performance"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--model"));
}

#[test]
fn test_goal_tokens_accept_hyphens() {
    tunewise()
        .args([
            "recommend",
            "--make",
            "Subaru",
            "--model",
            "WRX",
            "--year",
            "2020",
            "--goal",
            "track-use,performance",
            "--format",
            "json",
        ])
        .assert()
        .success();
}

#[test]
fn test_malformed_request_file_exits_two() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("request.json");
    fs::write(&path, "{ \"vehicle\": ").unwrap();

    tunewise()
        .args(["recommend", "--request"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformed request"));
}

#[test]
fn test_validate_reports_errors() {
    tunewise()
        .args([
            "validate", "--make", "Yugo", "--model", "GV", "--year", "1988", "--goal",
            "performance",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("error: unknown make: Yugo"));
}

#[test]
fn test_validate_json_carries_warnings() {
    let output = tunewise()
        .args([
            "validate",
            "--make",
            "Ferrari",
            "--model",
            "F8",
            "--year",
            "2022",
            "--engine",
            "diesel",
            "--goal",
            "performance",
            "--format",
            "json",
        ])
        .output()
        .expect("run validate");
    assert!(output.status.success());
    let validation = stdout_json(&output);
    assert!(validation["errors"].as_array().expect("errors").is_empty());
    assert_eq!(
        validation["warnings"][0],
        "engine type 'diesel' is unusual for Ferrari"
    );
}

#[test]
fn test_validate_rejects_conflicting_goals_for_electric() {
    let output = tunewise()
        .args([
            "validate",
            "--make",
            "Tesla",
            "--model",
            "Model 3",
            "--year",
            "2022",
            "--engine",
            "electric",
            "--goal",
            "fuel_economy",
            "--format",
            "json",
        ])
        .output()
        .expect("run validate");
    assert_eq!(output.status.code(), Some(2));
    let validation = stdout_json(&output);
    assert_eq!(
        validation["errors"][0],
        "fuel economy goal does not apply to electric vehicles"
    );
}

#[test]
fn test_list_mods_text() {
    tunewise()
        .arg("list-mods")
        .assert()
        .success()
        .stdout(predicate::str::contains("stage1_ecu_remap"))
        .stdout(predicate::str::contains("Use 'tunewise explain <id>'"));
}

#[test]
fn test_list_mods_json() {
    let output = tunewise()
        .args(["list-mods", "--format", "json"])
        .output()
        .expect("run list-mods");
    assert!(output.status.success());
    let mods = stdout_json(&output);
    assert_eq!(mods.as_array().expect("array").len(), 13);
    assert_eq!(mods[0]["id"], "stage1_ecu_remap");
}

#[test]
fn test_explain_known_modification() {
    tunewise()
        .args(["explain", "big-brake-kit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MODIFICATION:"))
        .stdout(predicate::str::contains("SAFETY LEVEL:"))
        .stdout(predicate::str::contains("COMPATIBILITY"));
}

#[test]
fn test_explain_unknown_modification() {
    tunewise()
        .args(["explain", "nitrous_kit"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown modification"));
}

#[test]
fn test_suggest_make_and_model() {
    tunewise()
        .args(["suggest", "make", "bm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMW"));

    tunewise()
        .args(["suggest", "model", "toyota", "co"])
        .assert()
        .success()
        .stdout("Corolla\nTacoma\n");
}

#[test]
fn test_options_json() {
    let output = tunewise()
        .args(["options", "--format", "json"])
        .output()
        .expect("run options");
    assert!(output.status.success());
    let options = stdout_json(&output);
    assert_eq!(options["goals"].as_array().expect("goals").len(), 5);
    assert_eq!(options["budget_tiers"][0]["tier"], "budget");
    assert!(options["models"]["Toyota"].is_array());
}

#[test]
fn test_out_dir_writes_artifacts() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");

    let mut args = civic_args();
    args.push("--out-dir");
    tunewise().args(args).arg(&out).assert().success();

    assert!(out.join("report.json").exists());
    assert!(out.join("report.md").exists());
    let run: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("run.json")).unwrap()).unwrap();
    assert_eq!(run["tool"]["name"], "tunewise");
}

#[test]
fn test_config_file_is_discovered() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("tunewise.toml"),
        "[output]\nformat = \"json\"\ndir = \"artifacts\"\n",
    )
    .unwrap();

    let output = tunewise()
        .current_dir(temp.path())
        .args(civic_args())
        .output()
        .expect("run recommend");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["schema"], "tunewise.report.v1");
    assert!(temp.path().join("artifacts").join("report.json").exists());
}

#[test]
fn test_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tunewise.toml"), "[output\n").unwrap();

    tunewise()
        .current_dir(temp.path())
        .args(civic_args())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tunewise.toml"));
}

#[test]
fn test_broken_catalog_exits_one() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("catalog.json");
    fs::write(&path, "{ not json").unwrap();

    tunewise()
        .arg("--catalog")
        .arg(&path)
        .args(civic_args())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("load catalog"));
}
