use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

const LAYOUT: &str = "RStart hh . P RBed\n";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kaiju-cats-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch directory");
    dir
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn kaiju_cats(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_kaiju-cats"))
        .args(args)
        .output()
        .expect("failed to run kaiju-cats")
}

#[test]
fn simulate_reports_json_and_saves_the_grid() {
    let dir = scratch_dir("simulate");
    let layout = write(&dir, "layout.txt", LAYOUT);
    let commands = write(&dir, "commands.txt", "# stomp then boost\n. S. . P .\n");
    let saved = dir.join("saved.txt");

    let output = kaiju_cats(&[
        "simulate",
        "--layout",
        layout.to_str().expect("utf-8 path"),
        "--commands",
        commands.to_str().expect("utf-8 path"),
        "--save",
        saved.to_str().expect("utf-8 path"),
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    // 250 + 250, doubled to 1000, +1000 powerup, +2000 first arrival.
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["report"]["score"], 4000);
    assert_eq!(json["rejected"], 0);
    assert_eq!(json["summary"]["settled"], true);
    assert_eq!(fs::read_to_string(&saved).expect("saved grid"), ". S. . P .\n");
}

#[test]
fn simulate_fails_on_a_broken_layout() {
    let dir = scratch_dir("broken");
    let layout = write(&dir, "layout.txt", "RStart . Q\n");

    let output = kaiju_cats(&["simulate", "--layout", layout.to_str().expect("utf-8 path")]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid layout"), "{stderr}");
}

#[test]
fn batch_picks_the_best_grid() {
    let dir = scratch_dir("batch");
    let layout = write(&dir, "layout.txt", LAYOUT);
    let empty = write(&dir, "empty.txt", ". .. . . .\n");
    let boosted = write(&dir, "boosted.txt", ". .. . P .\n");

    let output = kaiju_cats(&[
        "batch",
        "--layout",
        layout.to_str().expect("utf-8 path"),
        "--format",
        "json",
        empty.to_str().expect("utf-8 path"),
        boosted.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["best"], 1);
    assert_eq!(json["entries"].as_array().map(Vec::len), Some(2));
}
