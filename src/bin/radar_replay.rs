//! Replays recorded topic runs through the engine and prints the outcome.
//!
//! Input: a JSON file `[{"keyword": "...", "items": [...], "candidates": ...}]`
//! where `candidates` is either the comparator's raw text or its JSON.
//! Usage: `radar_replay <runs.json>` (or `RADAR_REPLAY_PATH`).
//! `OUTPUT_JSON=1` prints the reports as JSON instead of the text view.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use industry_radar::candidate::candidates_from_value;
use industry_radar::config::parse_flag;
use industry_radar::{
    parse_candidates, run_topic, CollectedItem, IncomingItem, RadarConfig, RunOutcome,
};

#[derive(Debug, Deserialize)]
struct TopicRun {
    keyword: String,
    /// Items may omit `source`; it is then inferred from `origin` and `url`.
    #[serde(default)]
    items: Vec<IncomingItem>,
    #[serde(default)]
    candidates: Value,
}

fn input_path() -> Result<PathBuf> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RADAR_REPLAY_PATH").ok())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: radar_replay <runs.json> (or set RADAR_REPLAY_PATH)"))
}

fn print_text(outcome: &RunOutcome) {
    let report = &outcome.report;
    println!("{}", "=".repeat(60));
    println!("[{}] {}", report.keyword, report.generated_at);
    println!("{}", report.global_summary);
    println!("{}", "=".repeat(60));
    for d in &report.decisions {
        println!("* {}", d.field);
        if !d.status.is_empty() {
            println!("  status: {}", d.status);
        }
        if !d.old_value.is_empty() {
            println!("  old: {}", d.old_value);
        }
        println!("  new: {}", d.value);
        println!("  arbitration: {}", d.reason);
        if !d.insight.is_empty() {
            println!("  insight: {}", d.insight);
        }
        println!("{}", "-".repeat(40));
    }
    for s in &report.sources {
        match &s.url {
            Some(u) => println!("- {}\n  {}", s.title, u),
            None => println!("- {}", s.title),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    industry_radar::telemetry::init_tracing();

    let path = input_path()?;
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading replay file {}", path.display()))?;
    let runs: Vec<TopicRun> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing replay file {}", path.display()))?;
    let cfg = RadarConfig::load()?;

    tracing::info!(topics = runs.len(), mode = ?cfg.report_mode, "replay started");

    // One blocking worker per topic; the engine keeps no shared state.
    let mut handles = Vec::with_capacity(runs.len());
    for run in runs {
        let cfg = cfg.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let candidates = match &run.candidates {
                Value::String(s) => parse_candidates(s),
                other => candidates_from_value(other),
            };
            let items: Vec<CollectedItem> =
                run.items.into_iter().map(IncomingItem::into_item).collect();
            run_topic(&run.keyword, &items, &candidates, &cfg)
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for h in handles {
        outcomes.push(h.await.context("topic worker panicked")?);
    }

    let as_json = std::env::var("OUTPUT_JSON")
        .map(|v| parse_flag(&v))
        .unwrap_or(false);
    if as_json {
        let reports: Vec<_> = outcomes.iter().map(|o| &o.report).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for o in &outcomes {
            print_text(o);
        }
    }
    Ok(())
}
