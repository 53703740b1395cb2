use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .expect("canonicalize repo root")
}

fn graphmrs_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_graphmrs"))
}

fn run(args: &[&str]) -> Output {
    let root = repo_root();
    Command::new(graphmrs_bin())
        .current_dir(&root)
        .env("NO_COLOR", "1")
        .env_remove("GRAPHMRS_LOG")
        .args(args)
        .output()
        .expect("run graphmrs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn check_lexicon_accepts_fixture() {
    let out = run(&["--config", "fixtures/graphmrs.json", "check-lexicon"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("node entries"));
}

#[test]
fn check_lexicon_rejects_unknown_recipe() {
    let dir = tempfile::tempdir().expect("tempdir");
    let lexicon = dir.path().join("lexicon.json");
    fs::write(&lexicon, r#"{ "properties": { "idColor": "colorize" } }"#).expect("write lexicon");

    let out = run(&[
        "--lexicon",
        lexicon.to_str().expect("utf8 path"),
        "check-lexicon",
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("colorize"));
}

#[test]
fn convert_prints_mrs_and_tables() {
    let out = run(&[
        "--config",
        "fixtures/graphmrs.json",
        "convert",
        "fixtures/graphs/red_apple.json",
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("[ TOP: h"));
    assert!(text.contains("_red_a_1"));
    assert!(text.contains("idApple_1"));
    assert!(text.contains("idColor_1"));
    assert!(text.contains("Graph Component"));
}

#[test]
fn convert_json_report_covers_every_graph() {
    let out = run(&[
        "--config",
        "fixtures/graphmrs.json",
        "convert",
        "--json",
        "fixtures/graphs/red_apple.json",
        "fixtures/graphs/unknown_edge.json",
        "fixtures/graphs/cycle.json",
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json report");

    let graphs = report["graphs"].as_array().expect("graphs array");
    assert_eq!(graphs.len(), 3);

    let red_apple = &graphs[0];
    assert_eq!(red_apple["name"], "red_apple");
    assert!(red_apple["mrs"].as_str().expect("mrs").contains("_apple_n_1"));
    assert_eq!(red_apple["summary"]["edges"]["included"], 1);

    let unknown = &graphs[1];
    assert_eq!(
        unknown["evaluation"]["nodes"]["idTable_2"]["included"]["reason"],
        "Descends from failed edge"
    );

    let cycle = &graphs[2];
    assert!(cycle["mrs"].is_null());
    assert_eq!(cycle["generation"]["reason"], "Graph contains cycles");

    assert!(report["summary"]["nodes"]["total"].as_u64().expect("total") >= 4);
}

#[test]
fn convert_skips_rootless_graph_and_keeps_going() {
    let out = run(&[
        "--config",
        "fixtures/graphmrs.json",
        "convert",
        "--json",
        "fixtures/graphs/empty.json",
        "fixtures/graphs/red_apple.json",
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json report");

    let graphs = report["graphs"].as_array().expect("graphs array");
    assert_eq!(graphs.len(), 2);
    assert!(graphs[0]["mrs"].is_null());
    assert_eq!(graphs[0]["generation"]["reason"], "Graph has no root node");
    assert!(graphs[1]["mrs"].as_str().expect("mrs").contains("_red_a_1"));
}

#[cfg(unix)]
#[test]
fn convert_runs_generator_subprocess() {
    // `cat` stands in for the generator and echoes the MRS back as one result.
    let out = run(&[
        "--config",
        "fixtures/graphmrs.json",
        "convert",
        "--json",
        "--generator",
        "cat",
        "fixtures/graphs/apple.json",
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json report");
    let graph = &report["graphs"][0];
    assert_eq!(graph["generation"]["results"], 1);
    assert_eq!(graph["generation"]["reason"], "Successfully generated");
    assert!(graph["results"][0].as_str().expect("result").starts_with("[ TOP:"));
}

#[test]
fn generate_without_generator_fails() {
    let out = run(&[
        "--config",
        "fixtures/graphmrs.json",
        "convert",
        "--generate",
        "fixtures/graphs/apple.json",
    ]);
    assert!(!out.status.success());
}
