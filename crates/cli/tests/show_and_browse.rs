use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Workspace {
    dir: TempDir,
    source: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let items: Vec<Value> = (1..=30)
            .map(|n| {
                json!({
                    "id": n,
                    "title": format!("Listing {n}"),
                    "company": "Anambra Works",
                    "location": if n % 2 == 0 { "Awka" } else { "Onitsha" },
                    "type": if n % 3 == 0 { "Training" } else { "Full-time" },
                    "description": "Entry level role."
                })
            })
            .collect();
        let source = dir.path().join("opportunities.json");
        fs::write(&source, json!({ "opportunities": items }).to_string()).unwrap();
        Self { dir, source }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn prefs(&self) -> PathBuf {
        self.root().join("prefs")
    }

    #[allow(deprecated)]
    fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("listview").expect("binary");
        cmd.current_dir(self.root())
            .env("LISTVIEW_PREFS_DIR", self.prefs())
            .env_remove("LISTVIEW_PAGE_SIZE")
            .env_remove("LISTVIEW_DEBOUNCE_MS")
            .env_remove("RUST_LOG");
        cmd
    }

    fn show_json(&self, extra: &[&str]) -> Value {
        let output = self
            .cli()
            .arg("show")
            .arg("--source")
            .arg(&self.source)
            .arg("--json")
            .args(extra)
            .output()
            .expect("command run");
        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("valid json")
    }
}

#[test]
fn show_renders_first_page_as_text() {
    let ws = Workspace::new();
    ws.cli()
        .arg("show")
        .arg("--source")
        .arg(&ws.source)
        .arg("--no-persist")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Showing 12 of 30 opportunities"))
        .stdout(predicate::str::contains("[12] Listing 12"))
        .stdout(predicate::str::contains("Listing 13").not())
        .stdout(predicate::str::contains("more available"));
}

#[test]
fn query_overrides_filter_the_view() {
    let ws = Workspace::new();
    let frame = ws.show_json(&["--no-persist", "--query", "?type=training&location=awka"]);
    assert_eq!(frame["frame"], "results");
    assert_eq!(frame["headline"], "Showing 5 opportunities");
    assert_eq!(frame["has_more"], false);
    assert_eq!(frame["query"], "type=training&location=awka");
    for item in frame["items"].as_array().unwrap() {
        assert_eq!(item["type"], "Training");
        assert_eq!(item["location"], "Awka");
    }
}

#[test]
fn discrete_third_page_holds_the_tail() {
    let ws = Workspace::new();
    let frame = ws.show_json(&["--no-persist", "--mode", "discrete", "--page", "3"]);
    assert_eq!(frame["headline"], "Showing 25-30 of 30 opportunities");
    assert_eq!(frame["items"].as_array().unwrap().len(), 6);
    assert_eq!(frame["items"][0]["id"], 25);
    assert_eq!(frame["has_more"], false);
}

#[test]
fn cumulative_page_past_the_end_is_clamped() {
    let ws = Workspace::new();
    let frame = ws.show_json(&["--no-persist", "--page", "9"]);
    assert_eq!(frame["page"], 3);
    assert_eq!(frame["items"].as_array().unwrap().len(), 30);
    assert_eq!(frame["headline"], "Showing 30 opportunities");
}

#[test]
fn url_filters_are_remembered_between_runs() {
    let ws = Workspace::new();
    ws.show_json(&["--query", "type=Training"]);

    let frame = ws.show_json(&[]);
    assert_eq!(frame["filters"]["type"], "Training");
    assert_eq!(frame["headline"], "Showing 10 opportunities");

    let output = ws.cli().args(["prefs", "show"]).output().unwrap();
    assert!(output.status.success());
    let prefs: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(prefs["filters"]["type"], "Training");
    assert!(prefs["cache_opportunities"]["document"].is_object());

    ws.cli()
        .args(["prefs", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cleared\":2"));
    let frame = ws.show_json(&[]);
    assert_eq!(frame["headline"], "Showing 12 of 30 opportunities");
}

#[test]
fn open_renders_detail_or_fails() {
    let ws = Workspace::new();
    let frame = ws.show_json(&["--no-persist", "--open", "7"]);
    assert_eq!(frame["frame"], "detail");
    assert_eq!(frame["record"]["title"], "Listing 7");

    ws.cli()
        .arg("show")
        .arg("--source")
        .arg(&ws.source)
        .args(["--no-persist", "--open", "999"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No opportunity with id '999'"));
}

#[test]
fn unreadable_source_degrades_to_empty_results() {
    let ws = Workspace::new();
    ws.cli()
        .args(["show", "--no-persist", "--source"])
        .arg(ws.root().join("missing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("! Could not load opportunities"))
        .stdout(predicate::str::contains("No opportunities found"));
}

#[test]
fn failed_load_is_served_from_the_cached_copy() {
    let ws = Workspace::new();
    let fresh = ws.show_json(&[]);
    assert_eq!(fresh["error"], Value::Null);

    fs::remove_file(&ws.source).unwrap();
    let frame = ws.show_json(&[]);
    assert!(frame["error"].is_string());
    assert_eq!(frame["headline"], "Showing 12 of 30 opportunities");
}

#[test]
fn configured_fallback_fills_in_for_a_missing_source() {
    let ws = Workspace::new();
    fs::write(
        ws.root().join("sample.json"),
        json!([{"id": "mock-1", "title": "Sample listing"}]).to_string(),
    )
    .unwrap();
    fs::write(
        ws.root().join("listview.toml"),
        "source = \"gone.json\"\nfallback = \"sample.json\"\n",
    )
    .unwrap();
    ws.cli()
        .args(["show", "--no-persist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("! Could not load opportunities"))
        .stdout(predicate::str::contains("[1] Sample listing"));
}

#[test]
fn corrupted_preferences_do_not_block_later_runs() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.prefs()).unwrap();
    fs::write(ws.prefs().join("preferences.json"), "{oops").unwrap();

    ws.show_json(&["--query", "location=awka"]);
    let frame = ws.show_json(&[]);
    assert_eq!(frame["filters"]["location"], "awka");

    ws.cli()
        .args(["prefs", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared"));
}

#[test]
fn options_lists_selector_values_and_counts() {
    let ws = Workspace::new();
    let output = ws
        .cli()
        .arg("options")
        .arg("--source")
        .arg(&ws.source)
        .args(["--json", "--no-persist"])
        .output()
        .expect("command run");
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["options"]["types"], json!(["Full-time", "Training"]));
    assert_eq!(report["options"]["locations"], json!(["Awka", "Onitsha"]));
    assert_eq!(report["stats"]["total"], 30);
    assert_eq!(report["stats"]["by_type"]["Training"], 10);

    ws.cli()
        .arg("options")
        .arg("--source")
        .arg(&ws.source)
        .arg("--no-persist")
        .assert()
        .success()
        .stdout(predicate::str::contains("Types       Full-time, Training"))
        .stdout(predicate::str::contains("30 opportunities (Full-time 20, Training 10)"));
}

#[test]
fn missing_source_is_an_error() {
    let ws = Workspace::new();
    ws.cli()
        .args(["show", "--no-persist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No collection source"));
}

#[test]
fn config_file_in_working_directory_is_used() {
    let ws = Workspace::new();
    fs::write(
        ws.root().join("listview.toml"),
        "source = \"opportunities.json\"\npage_size = 5\n",
    )
    .unwrap();
    ws.cli()
        .args(["show", "--no-persist"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Showing 5 of 30 opportunities"));
}

#[test]
fn browse_applies_stdin_events() {
    let ws = Workspace::new();
    let output = ws
        .cli()
        .arg("browse")
        .arg("--source")
        .arg(&ws.source)
        .args(["--json", "--no-persist"])
        .write_stdin("type Training\nmore\nsearch listing 9\n")
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let frames: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("one JSON frame per line"))
        .collect();
    assert_eq!(frames[0]["frame"], "loading");

    let last = frames.last().unwrap();
    assert_eq!(last["frame"], "results");
    assert_eq!(last["filters"]["type"], "Training");
    assert_eq!(last["filters"]["search"], "listing 9");
    assert_eq!(last["headline"], "Showing 1 opportunity");
}
