use std::{
    env, fs,
    path::PathBuf,
    process::{Command, Output},
};

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

fn beatlane(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_beatlane"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("beatlane_cli_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const SMALL_CHART: &str = r#"{
  "meta": { "title": "Small", "bpm": 120 },
  "notes": [
    { "time_ms": 500, "lane": 0, "type": "tap" },
    { "time_ms": 1000, "lane": 2, "type": "hold", "duration_ms": 500, "color": "pink" },
    { "time_ms": 1250, "lane": 1, "type": "tap" },
    { "time_ms": 1750, "lane": 3, "type": "tap" }
  ]
}"#;

#[test]
fn help_lists_subcommands() {
    let output = beatlane(&["--help"]);
    assert!(output.status.success());

    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("simulate"));
    assert!(stdout.contains("timeline"));
}

#[test]
fn generate_writes_chart_json() {
    let dir = scratch_dir("generate");
    let a = dir.join("a.json");
    let b = dir.join("b.json");

    for path in [&a, &b] {
        let out = beatlane(&["generate", "--seed", "3", "-o", path.to_str().unwrap()]);
        assert!(out.status.success());
    }

    let layout = |path: &PathBuf| {
        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(v["meta"]["title"], "Generated");
        assert_eq!(v["meta"]["total_duration_ms"], 120000.0);
        v["notes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| (n["time_ms"].as_f64().unwrap(), n["lane"].as_u64().unwrap()))
            .collect::<Vec<_>>()
    };
    let first = layout(&a);
    assert!(!first.is_empty());
    assert_eq!(first, layout(&b));
}

#[test]
fn generate_into_missing_directory_is_reported() {
    let dir = scratch_dir("generate_missing_dir");
    let target = dir.join("no_such_dir").join("chart.json");

    let out = beatlane(&["generate", "-o", target.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to write chart: "));
}

#[test]
fn simulate_perfect_autoplay_ranks_s() {
    let dir = scratch_dir("simulate");
    let chart = dir.join("small.json");
    fs::write(&chart, SMALL_CHART).unwrap();

    let out = beatlane(&["simulate", chart.to_str().unwrap()]);
    assert!(out.status.success());

    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("score: 400\n"));
    assert!(stdout.contains("perfect: 4\n"));
    assert!(stdout.contains("miss: 0\n"));
    assert!(stdout.contains("accuracy: 100.00%\n"));
    assert!(stdout.contains("rank: S\n"));
}

#[test]
fn simulate_json_with_skipped_notes() {
    let dir = scratch_dir("simulate_json");
    let chart = dir.join("small.json");
    fs::write(&chart, SMALL_CHART).unwrap();

    let out = beatlane(&[
        "simulate",
        chart.to_str().unwrap(),
        "--miss-every",
        "2",
        "--offset-ms",
        "-70",
        "--json",
    ]);
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["good"], 2);
    assert_eq!(v["miss"], 2);
    assert_eq!(v["score"], 100);
    assert_eq!(v["rank"], "C");
}

#[test]
fn simulate_missing_chart_is_reported() {
    let missing = env::temp_dir().join(format!(
        "beatlane_cli_missing_chart_{}.json",
        std::process::id()
    ));
    let _ = fs::remove_file(&missing);

    let out = beatlane(&["simulate", missing.to_str().unwrap()]);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));

    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to load chart: "));
    assert!(stderr.contains("Caused by:"));
}

#[test]
fn invalid_lane_is_rejected() {
    let dir = scratch_dir("invalid_lane");
    let chart = dir.join("bad.json");
    fs::write(
        &chart,
        r#"{ "meta": { "title": "Bad", "bpm": 120 }, "notes": [ { "time_ms": 0, "lane": 4, "type": "tap" } ] }"#,
    )
    .unwrap();

    let out = beatlane(&["timeline", chart.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: invalid chart: "));
    assert!(stderr.contains("lane 4 is out of range"));
}

#[test]
fn timeline_prints_lane_grid() {
    let dir = scratch_dir("timeline");
    let chart = dir.join("small.json");
    fs::write(&chart, SMALL_CHART).unwrap();

    let out = beatlane(&["timeline", chart.to_str().unwrap()]);
    assert!(out.status.success());

    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("Timeline (4 notes"));
    assert!(stdout.contains("   1000.0 | . . H . | pink@2"));
    assert!(stdout.contains("   1500.0 | . . # . |"));
}

#[test]
fn bad_config_is_reported() {
    let dir = scratch_dir("bad_config");
    let config = dir.join("config.json");
    fs::write(&config, "{ not json").unwrap();

    let out = beatlane(&["--config", config.to_str().unwrap(), "generate"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to load config: "));
}
