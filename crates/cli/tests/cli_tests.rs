// Integration tests for the `labsheet` binary against a mock template backend.
// Run with: cargo test -p labsheet-cli --test cli_tests -- --nocapture

use std::path::PathBuf;
use std::process::{Command, Output};

use httpmock::prelude::*;
use labsheet_engine::{DocumentContent, ResolvedStyle, StyleOverlay};
use labsheet_io::xlsx;
use serde_json::json;
use tempfile::TempDir;

struct Fixture {
    server: MockServer,
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let server = MockServer::start();
        let dir = tempfile::tempdir().unwrap();
        let settings = format!(
            "[backend]\napi_base = \"{}\"\nmedia_base = \"{}\"\ntimeout_secs = 5\n\n[document]\nrow_count = 4\n",
            server.url("/api"),
            server.url("/media"),
        );
        std::fs::write(dir.path().join("settings.toml"), settings).unwrap();
        Self { server, dir }
    }

    /// Serve `rows` as the content file and `styles` as the overlay
    fn serve(&self, rows: &[&str], styles: serde_json::Value) {
        let content = DocumentContent::from_rows(rows.iter().copied());
        let bytes = xlsx::export(&content, &StyleOverlay::new(), &ResolvedStyle::default()).unwrap();
        self.server.mock(|when, then| {
            when.method(GET).path("/api/templates/header/styles");
            then.status(200).json_body(json!({ "styles": styles }));
        });
        self.server.mock(|when, then| {
            when.method(GET).path("/media/templates/header.xlsx");
            then.status(200).body(bytes);
        });
    }

    fn labsheet(&self, args: &[&str]) -> Output {
        let config = self.dir.path().join("settings.toml");
        Command::new(env!("CARGO_BIN_EXE_labsheet"))
            .arg("--config")
            .arg(&config)
            .args(args)
            .env("XDG_CONFIG_HOME", self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("LABSHEET_CONFIG")
            .output()
            .expect("run labsheet")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[test]
fn show_json_lists_rows_with_styles() {
    let fx = Fixture::new();
    fx.serve(
        &["Central Laboratory", "", "Protocol No. 17"],
        json!({ "0-0": { "fontWeight": "bold", "fontSize": "20px" } }),
    );

    let output = fx.labsheet(&["show", "--json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["text"], "Central Laboratory");
    assert_eq!(rows[0]["style"]["fontWeight"], "bold");
    assert_eq!(rows[0]["style"]["fontSize"], "20px");
    assert_eq!(rows[0]["styled"], true);
    assert_eq!(rows[2]["style"]["fontWeight"], "normal");
    assert_eq!(rows[3]["text"], "");
}

#[test]
fn format_and_save_posts_full_document() {
    let fx = Fixture::new();
    fx.serve(&["Title", "a", "b", "c"], json!({}));
    let save = fx.server.mock(|when, then| {
        when.method(POST).path("/api/templates/save").json_body(json!({
            "data": [["Title"], ["a"], ["b"], ["c"]],
            "styles": { "0-0": { "fontWeight": "bold", "fontSize": "18px" } },
            "section": "header"
        }));
        then.status(200).json_body(json!({ "status": "ok" }));
    });

    let output = fx.labsheet(&["format", "cell:1", "--bold", "--size", "18", "--save"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    save.assert();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bold 18px"), "stdout: {}", stdout);
}

#[test]
fn format_without_save_sends_nothing() {
    let fx = Fixture::new();
    fx.serve(&["Title"], json!({}));
    let save = fx.server.mock(|when, then| {
        when.method(POST).path("/api/templates/save");
        then.status(200);
    });

    let output = fx.labsheet(&["format", "col:A", "--italic"]);
    assert!(output.status.success());
    save.assert_hits(0);
}

#[test]
fn bad_selection_is_usage_error() {
    let fx = Fixture::new();
    let output = fx.labsheet(&["format", "sheet:1", "--bold"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown selection kind"));
}

#[test]
fn selection_outside_document_is_usage_error() {
    let fx = Fixture::new();
    fx.serve(&["Title"], json!({}));
    let save = fx.server.mock(|when, then| {
        when.method(POST).path("/api/templates/save");
        then.status(200);
    });

    for selection in ["raw:0,0,9223372036854775807,0", "range:1:9999999999", "cell:5", "col:B"] {
        let output = fx.labsheet(&["format", selection, "--bold", "--save"]);
        assert_eq!(output.status.code(), Some(2), "selection {}", selection);
        assert!(String::from_utf8_lossy(&output.stderr).contains("reaches past"));
    }
    save.assert_hits(0);
}

#[test]
fn oversized_column_label_is_usage_error() {
    let fx = Fixture::new();
    let output = fx.labsheet(&["format", "col:ZZZZZZZZZZZZZZZZZZZZ", "--bold"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid column"));
}

#[test]
fn format_needs_a_style_flag() {
    let fx = Fixture::new();
    let output = fx.labsheet(&["format", "cell:1"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn load_failure_exits_3() {
    let fx = Fixture::new();
    fx.server.mock(|when, then| {
        when.method(GET).path("/api/templates/header/styles");
        then.status(503).body("maintenance");
    });

    let output = fx.labsheet(&["show"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("503"), "stderr: {}", stderr);
    assert!(stderr.contains("hint:"), "stderr: {}", stderr);
}

#[test]
fn rejected_save_exits_4() {
    let fx = Fixture::new();
    fx.serve(&["Title"], json!({}));
    fx.server.mock(|when, then| {
        when.method(POST).path("/api/templates/save");
        then.status(422).body("section is read-only");
    });

    let output = fx.labsheet(&["set", "1", "New title", "--save"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("section is read-only"));
}

#[test]
fn render_writes_styled_html() {
    let fx = Fixture::new();
    fx.serve(&["Central <Lab>"], json!({ "0-0": { "fontStyle": "italic" } }));
    let out = fx.path("header.html");

    let output = fx.labsheet(&["render", "--out", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("Central &lt;Lab&gt;"));
    assert!(html.contains("font-style: italic"));
}

#[test]
fn export_writes_xlsx() {
    let fx = Fixture::new();
    fx.serve(&["Central Laboratory", "Dept."], json!({}));
    let out = fx.path("header.xlsx");

    let output = fx.labsheet(&["export", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let bytes = std::fs::read(&out).unwrap();
    let content = xlsx::import_first_column(&bytes, 4).unwrap();
    assert_eq!(content.get(0), Some("Central Laboratory"));
    assert_eq!(content.get(1), Some("Dept."));
}
