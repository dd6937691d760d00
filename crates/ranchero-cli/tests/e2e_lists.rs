//! E2E tests for the read-only command surface: overview, block and ticket
//! lists with filters/sorts, and the show-with-redirect contract.
//!
//! Each test runs the `ranch` binary as a subprocess.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn ranch_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ranch"));
    // Suppress tracing output on stderr
    cmd.env("RANCH_LOG", "error");
    cmd
}

fn json_stdout(args: &[&str]) -> Value {
    let output = ranch_cmd().args(args).arg("--json").output().expect("run ranch");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json emits valid JSON")
}

#[test]
fn overview_reports_fixture_stats() {
    let json = json_stdout(&["overview"]);
    assert_eq!(json["ranch"], "Rancho Don Enrique");
    assert_eq!(json["stats"]["total_blocks"], 6);
    assert!(json["stats"]["total_acres"].as_f64().expect("acres") > 70.0);
}

#[test]
fn blocks_lists_all_fixture_blocks() {
    let json = json_stdout(&["blocks"]);
    let blocks = json.as_array().expect("array");
    assert_eq!(blocks.len(), 6);
    // default sort is by name
    let names: Vec<&str> = blocks
        .iter()
        .map(|b| b["name"].as_str().expect("name"))
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn blocks_filter_by_status() {
    let json = json_stdout(&["blocks", "--status", "maintenance"]);
    let blocks = json.as_array().expect("array");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["id"], "rde-block-3");
}

#[test]
fn blocks_search_matches_variety() {
    let json = json_stdout(&["blocks", "--search", "hass"]);
    let blocks = json.as_array().expect("array");
    assert_eq!(blocks.len(), 2);
}

#[test]
fn blocks_sort_area_is_descending() {
    let json = json_stdout(&["blocks", "--sort", "area"]);
    let areas: Vec<f64> = json
        .as_array()
        .expect("array")
        .iter()
        .map(|b| b["area"].as_f64().expect("area"))
        .collect();
    let mut sorted = areas.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).expect("ordered"));
    assert_eq!(areas, sorted);
}

#[test]
fn blocks_rejects_unknown_sort() {
    ranch_cmd()
        .args(["blocks", "--sort", "acreage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort"));
}

#[test]
fn tickets_filters_compose() {
    let json = json_stdout(&["tickets", "--status", "open", "--type", "irrigation"]);
    let tickets = json.as_array().expect("array");
    assert!(tickets.is_empty(), "no open irrigation tickets in fixtures");

    let json = json_stdout(&["tickets", "--status", "open"]);
    assert_eq!(json.as_array().expect("array").len(), 4);

    let json = json_stdout(&["tickets", "--block", "rde-block-1"]);
    assert_eq!(json.as_array().expect("array").len(), 2);
}

#[test]
fn tickets_search_hits_tags() {
    let json = json_stdout(&["tickets", "--search", "compliance"]);
    let tickets = json.as_array().expect("array");
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["id"], "ticket-010");
}

#[test]
fn tickets_sort_due_puts_undated_last() {
    let json = json_stdout(&["tickets", "--sort", "due"]);
    let tickets = json.as_array().expect("array");
    let last = tickets.last().expect("non-empty");
    assert!(last["dueDate"].is_null(), "undated tickets sort last");
    assert!(tickets[0]["dueDate"].is_string());
}

#[test]
fn tickets_text_mode_has_header_row() {
    ranch_cmd()
        .args(["tickets", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id\tstatus\tpriority\ttype\tblock\ttitle",
        ));
}

#[test]
fn show_renders_block_detail() {
    let json = json_stdout(&["show", "rde-block-3"]);
    assert_eq!(json["block"]["name"], "South Terrace");
    assert_eq!(json["block"]["status"], "maintenance");
    // both fixture tickets for the block, newest first
    let recent = json["recentTickets"].as_array().expect("tickets");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["id"], "ticket-001");
}

#[test]
fn show_unknown_block_redirects_to_the_list() {
    // Exit 0, no error text, block list on stdout — the CLI analog of the
    // route redirect.
    let output = ranch_cmd()
        .args(["show", "nonexistent", "--json"])
        .output()
        .expect("run ranch");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json.as_array().expect("block list").len(), 6);
    assert!(
        !String::from_utf8_lossy(&output.stderr).contains("error"),
        "redirect is silent"
    );
}

#[test]
fn pretty_show_includes_metadata() {
    ranch_cmd()
        .args(["show", "rde-block-1", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("North Field"))
        .stdout(predicate::str::contains("14.2 acres"))
        .stdout(predicate::str::contains("Hass"));
}
