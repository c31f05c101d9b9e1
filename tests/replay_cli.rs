//! Integration test: replay traces through the compiled binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run the binary with `args`, feeding `trace` on stdin.
///
/// Config and env overrides are pinned so the user's setup can't leak in.
fn run(args: &[&str], trace: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_scrollwatch"))
        .args(args)
        .arg("--log-stderr")
        .env("SCROLLWATCH_CONFIG", "/nonexistent/scrollwatch/config.toml")
        .env_remove("SCROLLWATCH_DEBOUNCE_MS")
        .env_remove("SCROLLWATCH_BOTTOM_MARGIN")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(trace.as_bytes())
        .expect("write trace");

    child.wait_with_output().expect("binary finished")
}

const NESTED_TRACE: &str = r#"
# page near its bottom, feed without scrollbar
{"op":"element","id":"feed"}
{"op":"geometry","content":1000,"visible":800,"offset":150}
{"op":"geometry","element":"feed","content":400,"visible":400,"offset":0}
{"op":"register","listener":1}
{"op":"register","listener":2,"element":"feed"}
{"op":"signal","element":"feed","signal":"mouse-enter"}
{"op":"signal","signal":"scroll"}
{"op":"signal","element":"feed","signal":"wheel"}
{"op":"advance","ms":250}
{"op":"signal","element":"feed","signal":"mouse-leave"}
{"op":"signal","signal":"scroll"}
{"op":"advance","ms":250}
"#;

#[test]
fn replay_prints_notifications_in_delivery_order() {
    let output = run(&[], NESTED_TRACE);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "200 listener=2",
            "450 listener=1",
            "# evaluations=2 reached_bottom=2 notifications=2 tracked_at_end=2 end_ms=500",
        ]
    );
}

#[test]
fn cli_debounce_override_changes_timing() {
    let trace = r#"{"op":"geometry","content":500,"visible":500,"offset":0}
{"op":"register","listener":9}
{"op":"signal","signal":"scroll"}
{"op":"advance","ms":100}
"#;

    let output = run(&["--debounce-ms", "40"], trace);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("40 listener=9\n"),
        "got: {}",
        stdout
    );
}

#[test]
fn json_report_is_machine_readable() {
    let output = run(&["--json"], NESTED_TRACE);

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["evaluations"], 2);
    assert_eq!(report["notifications"][0]["listener"], 2);
    assert_eq!(report["notifications"][1]["at_ms"], 450);
}

#[test]
fn malformed_trace_fails_with_line_number() {
    let output = run(&[], "{\"op\":\"advance\",\"ms\":1}\nnot json\n");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "stderr: {}", stderr);
}
