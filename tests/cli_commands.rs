// tests/cli_commands.rs

use clap::Parser;
use depgraph::cli::CliArgs;
use depgraph::fs::mock::MockFileSystem;
use depgraph::{Outcome, run_with};

const WORKFLOW: &str = r#"
[graph]
name = "lead-pipeline"

[node.fetch]
kind = "http"

[node.enrich]
after = ["fetch"]

[node.score]
kind = "scorer"
after = ["fetch"]

[node.notify]
after = ["enrich", "score"]
"#;

fn run(fs: &MockFileSystem, argv: &[&str]) -> (Outcome, String) {
    let args = CliArgs::try_parse_from(std::iter::once("depgraph").chain(argv.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    let outcome = run_with(fs, &args, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

fn fs_with_workflow() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("Depgraph.toml", WORKFLOW);
    fs
}

#[test]
fn test_order_prints_one_id_per_line() {
    let (outcome, out) = run(&fs_with_workflow(), &["order"]);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(out, "fetch\nenrich\nscore\nnotify\n");
}

#[test]
fn test_ready_and_waves() {
    let fs = fs_with_workflow();

    let (_, out) = run(&fs, &["ready", "--completed", "fetch,enrich"]);
    assert_eq!(out, "score\n");

    let (_, out) = run(&fs, &["waves"]);
    assert_eq!(out, "fetch\nenrich score\nnotify\n");
}

#[test]
fn test_validate_clean_graph() {
    let (outcome, out) = run(&fs_with_workflow(), &["validate"]);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(out, "ok\n");
}

#[test]
fn test_validate_reports_cycle_as_problem() {
    let fs = MockFileSystem::new();
    fs.add_file(
        "cyclic.toml",
        "[node.a]\nafter = [\"b\"]\n\n[node.b]\nafter = [\"a\"]\n",
    );

    let (outcome, out) = run(&fs, &["validate", "--config", "cyclic.toml"]);
    assert_eq!(outcome, Outcome::Problems);
    assert!(out.contains("would create a cycle"));
}

#[test]
fn test_validate_isolated_nodes_is_not_fatal() {
    let fs = MockFileSystem::new();
    fs.add_file("lonely.toml", "[node.a]\n\n[node.b]\n");

    let (outcome, out) = run(&fs, &["validate", "--config", "lonely.toml"]);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(out, "isolated nodes detected: a, b\n");
}

#[test]
fn test_export_to_file_then_load_snapshot() {
    let fs = fs_with_workflow();

    let (_, out) = run(&fs, &["export", "--out", "snap/graph.json"]);
    assert!(out.is_empty());
    let written = fs.contents("snap/graph.json").unwrap();
    assert!(written.contains("\"lead-pipeline\""));

    let (_, out) = run(&fs, &["order", "--config", "snap/graph.json"]);
    assert_eq!(out, "fetch\nenrich\nscore\nnotify\n");
}

#[test]
fn test_dot_output() {
    let (_, out) = run(&fs_with_workflow(), &["dot"]);
    assert!(out.starts_with("digraph {"));
    assert_eq!(out.matches("->").count(), 4);
}

#[test]
fn test_missing_config_is_an_error() {
    let args = CliArgs::try_parse_from(["depgraph", "order", "--config", "nope.toml"]).unwrap();
    let mut out = Vec::new();
    assert!(run_with(&MockFileSystem::new(), &args, &mut out).is_err());
}
