//! Integration tests for the `windsite` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const SITE: &str = r#"
name = "west-bank"

[turbine]
rotor_diameter_m = 80.0
thrust_coefficient = 0.8
power_curve = [[3.0, 0.0], [6.0, 300.0], [9.0, 1100.0], [12.0, 2000.0], [25.0, 2000.0]]

[wake]
exposure = "offshore"

[grid]
x = { start = -400.0, end = 1600.0, points = 41 }
y = { start = -600.0, end = 600.0, points = 25 }

[candidates]
lattice = { x_start = 0.0, x_end = 1200.0, y_start = -400.0, y_end = 400.0, spacing = 400.0 }

[wind]
scenarios = [
    { speed = 10.0, direction = 270.0, probability = 0.6 },
    { speed = 8.0, direction = 225.0, probability = 0.4 },
]

[layout]
turbines = 3
min_separation_diameters = 6.0
"#;

fn write_site(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("site.toml");
    fs::write(&path, body).unwrap();
    path
}

fn windsite() -> Command {
    Command::cargo_bin("windsite").unwrap()
}

#[test]
fn test_help_lists_commands() {
    windsite()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("optimize"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("field"));
}

#[cfg(feature = "solver-microlp")]
#[test]
fn test_optimize_writes_json() {
    let dir = tempdir().unwrap();
    let site = write_site(dir.path(), SITE);
    let out = dir.path().join("layout.json");

    windsite()
        .args(["optimize", site.to_str().unwrap(), "--threads", "2", "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Layout Solution Summary"))
        .stdout(predicate::str::contains("Turbines Placed: 3"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["site"], "west-bank");
    assert_eq!(json["outcome"]["status"], "optimal");
    assert_eq!(json["outcome"]["selected"].as_array().unwrap().len(), 3);
    assert_eq!(json["candidates"].as_array().unwrap().len(), 12);
    assert_eq!(json["evaluation"]["turbines"].as_array().unwrap().len(), 3);
}

#[cfg(feature = "solver-microlp")]
#[test]
fn test_optimize_infeasible_exits_nonzero() {
    let dir = tempdir().unwrap();
    let site = write_site(dir.path(), SITE);

    windsite()
        .args(["optimize", site.to_str().unwrap(), "--turbines", "20"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Layout Infeasible"))
        .stderr(predicate::str::contains("layout infeasible"));
}

#[test]
fn test_field_writes_csv() {
    let dir = tempdir().unwrap();
    let site = write_site(dir.path(), SITE);
    let out = dir.path().join("field.csv");

    windsite()
        .args(["field", site.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1025 rows"));

    let csv = fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("x,y,speed"));
    assert_eq!(lines.count(), 41 * 25);
}

#[test]
fn test_validate_clean_site() {
    let dir = tempdir().unwrap();
    let site = write_site(dir.path(), SITE);

    windsite()
        .args(["validate", site.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_validate_reports_every_issue() {
    let dir = tempdir().unwrap();
    let broken = SITE
        .replace("probability = 0.4", "probability = 0.3")
        .replace("turbines = 3", "turbines = 30")
        .replace("y_end = 400.0", "y_end = 800.0");
    let site = write_site(dir.path(), &broken);

    windsite()
        .args(["validate", site.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("probabilities sum to 0.9"))
        .stdout(predicate::str::contains("outside the sample grid"))
        .stdout(predicate::str::contains("30 turbines requested"));
}

#[test]
fn test_missing_site_file() {
    windsite()
        .args(["validate", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading site file"));
}

#[test]
fn test_completions_bash() {
    windsite()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("windsite"));
}
