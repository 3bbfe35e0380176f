//! Integration tests for search commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const QUOTES_CSV: &str = "\
episode_id,timestamp_sec,speaker,text,episode_name,spotify_url
xfm-s1e1,100,karl,Try both.,Pilot,https://open.spotify.com/episode/abc?t=100
xfm-s1e1,130,ricky,You should try them both at once.,Pilot,
xfm-s1e2,200,karl,Keep whacking the cooker.,Episode 2,
xfm-s1e2,260,steve,\"Both of them, try again.\",Episode 2,
xfm-s1e3,340,karl,Little monkey fella.,Episode 3,
xfm-s1e3,400,ricky,He's a pig.,Episode 3,
";

struct TestEnv {
    _dir: TempDir,
    db_path: PathBuf,
    config_path: PathBuf,
}

impl TestEnv {
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("quotefinder").unwrap();
        cmd.env("QUOTEFINDER_DB", &self.db_path)
            .env("QUOTEFINDER_CONFIG", &self.config_path);
        cmd
    }
}

fn setup_corpus() -> TestEnv {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("quotes.csv");
    fs::write(&csv_path, QUOTES_CSV).unwrap();

    let env = TestEnv {
        db_path: dir.path().join("quotes.sqlite"),
        config_path: dir.path().join("config.yml"),
        _dir: dir,
    };

    env.cmd().arg("import").arg(&csv_path).assert().success();
    env
}

fn json_output(env: &TestEnv, args: &[&str]) -> serde_json::Value {
    let output = env
        .cmd()
        .args(["--format", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_search_exact_terminal() {
    let env = setup_corpus();
    env.cmd()
        .args(["search", "Try", "both."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top matches for: \"Try both.\""))
        .stdout(predicate::str::contains("\"Try both.\""))
        .stdout(predicate::str::contains(
            "Spotify: https://open.spotify.com/episode/abc?t=100",
        ));
}

#[test]
fn test_search_exact_json() {
    let env = setup_corpus();
    let value = json_output(&env, &["search", "try both", "--speaker", "Karl"]);
    assert_eq!(value["search_type"], "exact");
    assert_eq!(value["results"][0]["text"], "Try both.");
    assert_eq!(value["results"][0]["timestamp_hms"], "00:01:40");
    assert!(value["results"][0]["rank"].as_f64().unwrap() > 100.0);
    for result in value["results"].as_array().unwrap() {
        assert_eq!(result["speaker"], "karl");
    }
}

#[test]
fn test_search_fuzzy() {
    let env = setup_corpus();
    let value = json_output(&env, &["search", "whaking"]);
    assert_eq!(value["search_type"], "fuzzy");
    assert_eq!(value["query_used"], "whacking");
    assert_eq!(value["original_query"], "whaking");
    assert_eq!(value["auto_corrected"], true);

    env.cmd()
        .args(["search", "whaking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning: Showing results for \"whacking\""));
}

#[test]
fn test_search_suggestion_terminal() {
    let env = setup_corpus();
    env.cmd()
        .args(["search", "pog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Did you mean \"pig\"?"))
        .stdout(predicate::str::contains("Suggested query: pig"))
        .stdout(predicate::str::contains("Preview results for suggestion:"))
        .stdout(predicate::str::contains("- ricky @ 00:06:40 | He's a pig."))
        .stdout(predicate::str::contains("No matches found."));

    let value = json_output(&env, &["search", "pog"]);
    assert_eq!(value["search_type"], "suggestion");
    assert_eq!(value["suggested_query"], "pig");
    assert_eq!(value["results"].as_array().unwrap().len(), 0);
    assert_eq!(value["suggested_results"][0]["text"], "He's a pig.");
}

#[test]
fn test_search_misspelled_phrase() {
    let env = setup_corpus();
    let value = json_output(&env, &["search", "kep", "whaking", "the", "coker"]);
    assert_eq!(value["search_type"], "fuzzy");
    assert_eq!(value["query_used"], "keep whacking the cooker");
    assert_eq!(value["results"][0]["text"], "Keep whacking the cooker.");
}

#[test]
fn test_search_no_match() {
    let env = setup_corpus();
    env.cmd()
        .args(["search", "xyzzyplugh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found."));

    let value = json_output(&env, &["search", "xyzzyplugh"]);
    assert_eq!(value["search_type"], "none");
    assert_eq!(value["results"].as_array().unwrap().len(), 0);
}

#[test]
fn test_search_limit() {
    let env = setup_corpus();
    let value = json_output(&env, &["search", "both", "-n", "1"]);
    assert_eq!(value["results"].as_array().unwrap().len(), 1);
}

#[test]
fn test_search_csv_format() {
    let env = setup_corpus();
    env.cmd()
        .args(["--format", "csv", "search", "monkey"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "episode_id,episode_name,timestamp_sec,timestamp_hms,speaker,text,spotify_url,rank",
        ))
        .stdout(predicate::str::contains("Little monkey fella."));
}

#[test]
fn test_invalid_speaker() {
    let env = setup_corpus();
    env.cmd()
        .args(["search", "both", "--speaker", "suzanne"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid speaker"));
}

#[test]
fn test_search_requires_query() {
    let env = setup_corpus();
    env.cmd().arg("search").assert().failure();
}

#[test]
fn test_suggest() {
    let env = setup_corpus();
    let value = json_output(&env, &["suggest", "whaking"]);
    let suggestions = value.as_array().unwrap();
    assert_eq!(suggestions[0]["term"], "whacking");
    assert_eq!(suggestions[0]["distance"], 1);

    env.cmd()
        .args(["suggest", "whaking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("whacking (distance 1"));
}
