use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn adventure() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_adventure"));
    cmd.env_remove("ADVENTURE_SEED").env_remove("RUST_LOG");
    cmd
}

#[test]
fn simulate_prints_a_json_report() {
    let output = adventure()
        .args(["--seed", "42", "simulate", "--actions", "9", "--monster", "goblin", "--health", "1"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!("player_lost", report["outcome"]);
    assert_eq!("hesitated", report["log"][0]["effect"]["kind"]);
    assert_eq!("Goblin", report["monster"]["name"]);
}

#[test]
fn simulate_fails_when_choices_run_out() {
    let output = adventure()
        .args(["--seed", "1", "simulate", "--actions", "2", "--monster", "troll"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no action supplied for turn 2"));
}

#[test]
fn missing_report_is_an_error() {
    let output = adventure()
        .args(["report", "--input", "does/not/exist.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

/// Config where every flee succeeds and sessions are written under `dir`.
fn fleeing_config(dir: &Path) -> (PathBuf, PathBuf) {
    fs::create_dir_all(dir).unwrap();
    let report = dir.join("session.json");
    let config = dir.join("adventure.toml");
    fs::write(
        &config,
        format!(
            "[rng]\nseed = 3\n\n[combat]\nflee_chance = 1.0\n\n[report]\npath = {:?}\n",
            report.display().to_string()
        ),
    )
    .unwrap();
    (config, report)
}

fn play_with_input(config: &Path, input: &str) -> Output {
    let mut child = adventure()
        .arg("--config")
        .arg(config)
        .arg("play")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("adventure-cli-{name}-{}", std::process::id()))
}

#[test]
fn closed_input_at_continue_prompt_ends_the_session_and_saves_it() {
    let dir = scratch_dir("continue");
    let (config, report_path) = fleeing_config(&dir);
    let output = play_with_input(&config, "Bo\ny\n1\n20\n4\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("You escaped from combat!"));
    assert!(stdout.contains("Report written to"));

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(1, report["encounters"].as_array().unwrap().len());
    assert_eq!(1, report["summary"]["escapes"]);
    assert_eq!("Bo", report["player"]["name"]);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn closed_input_mid_fight_still_saves_finished_encounters() {
    let dir = scratch_dir("midfight");
    let (config, report_path) = fleeing_config(&dir);
    let output = play_with_input(&config, "Bo\ny\n1\n20\n4\nyes\n");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no action supplied for turn 1"));

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(1, report["encounters"].as_array().unwrap().len());
    assert_eq!(1, report["summary"]["escapes"]);
    fs::remove_dir_all(dir).ok();
}
