//! Aggregation and rendering of headless run results.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;

use floodline_game::{Difficulty, GameType};

use crate::policy::PolicyKind;

/// Outcome of one full headless game.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub game_type: GameType,
    pub policy: PolicyKind,
    pub episode_scores: Vec<i64>,
    pub total_score: i64,
    pub traps: u32,
    pub timeouts: u32,
    pub state_changes: usize,
}

impl RunRecord {
    #[must_use]
    pub fn completed_episodes(&self) -> usize {
        self.episode_scores.len()
    }
}

pub fn print_console_report(records: &[RunRecord], verbose: bool) {
    println!();
    println!("{}", "Floodline Headless Run Summary".bright_cyan().bold());
    println!("{}", "==============================".cyan());
    println!(
        "Generated: {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    let total_runs = records.len();
    let total_traps: u32 = records.iter().map(|r| r.traps).sum();
    let total_timeouts: u32 = records.iter().map(|r| r.timeouts).sum();
    println!("Runs: {total_runs}");
    println!("Trapped trains: {}", colorize_count(total_traps));
    println!("Timed-out rounds: {}", colorize_count(total_timeouts));
    println!();

    for record in records {
        println!(
            "{} seed={} {}/{} [{}]",
            "RUN".bold(),
            record.seed,
            record.difficulty.as_str().bold(),
            record.game_type,
            record.policy.label()
        );
        println!(
            "   episodes: {}  total score: {}  traps: {}  timeouts: {}",
            record.completed_episodes(),
            colorize_score(record.total_score),
            colorize_count(record.traps),
            record.timeouts
        );
        if verbose {
            println!("   per-episode: {:?}", record.episode_scores);
            println!("   state changes observed: {}", record.state_changes);
        }
    }
    println!();
}

fn colorize_score(score: i64) -> String {
    if score >= 0 {
        score.to_string().green().to_string()
    } else {
        score.to_string().red().to_string()
    }
}

fn colorize_count(count: u32) -> String {
    if count == 0 {
        count.to_string().green().to_string()
    } else {
        count.to_string().yellow().to_string()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    records: &'a [RunRecord],
}

/// Write the full record set as pretty JSON.
pub fn write_json_report(records: &[RunRecord], path: &Path) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        records,
    };
    let json = serde_json::to_string_pretty(&report).context("serializing run records")?;
    fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_lowercase_game_type() {
        let record = RunRecord {
            seed: 12,
            difficulty: Difficulty::Hard,
            game_type: GameType::Reward,
            policy: PolicyKind::Threshold,
            episode_scores: vec![100, -50],
            total_score: 50,
            traps: 1,
            timeouts: 0,
            state_changes: 42,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"reward\""));
        assert!(json.contains("\"Hard\""));
        assert_eq!(record.completed_episodes(), 2);
    }
}
