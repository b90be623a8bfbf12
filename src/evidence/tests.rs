//! Tests for evidence sinks.

use super::*;

use anyhow::{Context, Result, ensure};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use std::thread;
use tempfile::TempDir;

#[fixture]
fn log_dir() -> TempDir {
    tempfile::tempdir().expect("create evidence log dir")
}

fn log_path(dir: &TempDir) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(dir.path().join("evidence.jsonl"))
        .map_err(|path| anyhow::anyhow!("non UTF-8 temp path: {path:?}"))
}

#[rstest]
fn memory_sink_keeps_recording_order() {
    let sink = MemorySink::default();
    sink.record("Pet Creation Info", "Pet ID: 7");
    sink.compare("Pet Name", "Rex", "Rex");
    assert_eq!(
        sink.entries(),
        vec![
            Evidence::Note {
                title: String::from("Pet Creation Info"),
                content: String::from("Pet ID: 7"),
            },
            Evidence::Comparison {
                label: String::from("Pet Name"),
                expected: String::from("Rex"),
                actual: String::from("Rex"),
            },
        ]
    );
    assert!(sink.contains_heading("Pet Name"));
    assert!(!sink.contains_heading("Order Deletion"));
}

#[rstest]
fn json_lines_sink_appends_one_object_per_entry(log_dir: TempDir) -> Result<()> {
    let path = log_path(&log_dir)?;
    let sink = JsonLinesSink::open(&path)?;
    sink.record("Store Inventory", "available: 1");
    sink.compare("Status code", "200", "404");

    let text = std::fs::read_to_string(&path).context("read evidence log")?;
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    ensure!(lines.len() == 2, "expected two lines, got {text}");
    let first = lines.first().context("first line")?;
    ensure!(first["kind"] == "note", "unexpected first line {first}");
    ensure!(first["title"] == "Store Inventory", "unexpected title {first}");
    ensure!(first["timestamp"].is_string(), "missing timestamp {first}");
    let second = lines.get(1).context("second line")?;
    ensure!(second["kind"] == "comparison", "unexpected line {second}");
    ensure!(second["actual"] == "404", "unexpected actual {second}");
    Ok(())
}

#[rstest]
fn json_lines_sink_reopens_in_append_mode(log_dir: TempDir) -> Result<()> {
    let path = log_path(&log_dir)?;
    JsonLinesSink::open(&path)?.record("first", "1");
    JsonLinesSink::open(&path)?.record("second", "2");
    let text = std::fs::read_to_string(&path)?;
    ensure!(text.lines().count() == 2, "log was truncated: {text}");
    Ok(())
}

#[rstest]
fn json_lines_sink_survives_concurrent_writers(log_dir: TempDir) -> Result<()> {
    let path = log_path(&log_dir)?;
    let sink = Arc::new(JsonLinesSink::open(&path)?);
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let shared = Arc::clone(&sink);
            thread::spawn(move || {
                for step in 0..25 {
                    shared.compare(&format!("worker {worker}"), "ok", &step.to_string());
                }
            })
        })
        .collect();
    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("writer thread panicked"))?;
    }
    let text = std::fs::read_to_string(&path)?;
    ensure!(text.lines().count() == 200, "expected 200 lines");
    for line in text.lines() {
        serde_json::from_str::<serde_json::Value>(line)
            .with_context(|| format!("corrupted line: {line}"))?;
    }
    Ok(())
}

#[rstest]
fn json_lines_sink_rejects_missing_directory(log_dir: TempDir) -> Result<()> {
    let path = log_path(&log_dir)?.join("missing").join("evidence.jsonl");
    ensure!(JsonLinesSink::open(&path).is_err(), "expected open failure");
    Ok(())
}

#[rstest]
fn tee_sink_forwards_to_every_member() {
    let left = Arc::new(MemorySink::default());
    let right = Arc::new(MemorySink::default());
    let tee = TeeSink::default()
        .with(Arc::clone(&left) as Reporter)
        .with(Arc::clone(&right) as Reporter);
    tee.record("Order Update", "Updated status to: approved");
    assert_eq!(left.entries(), right.entries());
    assert_eq!(left.entries().len(), 1);
}

#[rstest]
fn record_entries_renders_key_value_lines() {
    let sink = MemorySink::default();
    record_entries(&sink, "Store Inventory", [("available", 3), ("sold", 1)]);
    assert_eq!(
        sink.entries(),
        vec![Evidence::Note {
            title: String::from("Store Inventory"),
            content: String::from("available: 3\nsold: 1"),
        }]
    );
}
