mod policy;
mod report;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::str::FromStr;

use floodline_game::{
    Difficulty, GameConfig, GameMode, GameSession, GameType, RoundPhase,
};
use policy::PolicyKind;
use report::{RunRecord, print_console_report, write_json_report};

#[derive(Debug, Parser)]
#[command(name = "floodline-tester", version = "0.1.0")]
#[command(about = "Headless policy-driven QA runs for the Floodline game core")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Difficulties to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    difficulties: String,

    /// Game types to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    game_types: String,

    /// Game mode: Fixed replays per seed, Random draws fresh entropy
    #[arg(long, default_value = "Fixed")]
    mode: String,

    /// Play strategy
    #[arg(long, value_enum, default_value_t = PolicyKind::Threshold)]
    policy: PolicyKind,

    /// Draw one random difficulty/game-type assignment instead of sweeping
    #[arg(long)]
    assign: bool,

    /// Verbose per-run output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write a JSON report
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut records = Vec::new();
    if args.assign {
        let config = GameConfig::assign_random();
        info!(
            "assigned combination: {} / {}",
            config.difficulty, config.game_type
        );
        records.push(run_game(config, args.policy)?);
    } else {
        let mode = GameMode::from_str(&args.mode)?;
        let seeds = parse_seeds(&args.seeds)?;
        let difficulties = parse_difficulties(&args.difficulties)?;
        let game_types = parse_game_types(&args.game_types)?;
        for &seed in &seeds {
            for &difficulty in &difficulties {
                for &game_type in &game_types {
                    let config = GameConfig {
                        difficulty,
                        game_type,
                        mode,
                        seed: Some(seed),
                    };
                    records.push(run_game(config, args.policy)?);
                }
            }
        }
    }

    print_console_report(&records, args.verbose);
    if let Some(path) = args.output {
        write_json_report(&records, &path)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

/// Drive one full game to completion under a scripted policy.
fn run_game(config: GameConfig, policy: PolicyKind) -> Result<RunRecord> {
    let mut session = GameSession::new(config);
    session.release_timer();

    let mut traps = 0u32;
    let mut timeouts = 0u32;
    let mut guard = 0u32;
    while !session.state().game_over {
        guard += 1;
        if guard > 5_000 {
            bail!("run failed to terminate (seed {})", config.seed());
        }
        match session.state().phase {
            RoundPhase::Predicting => {
                let prediction = policy.predict(session.state());
                if policy.times_out(session.state().round) {
                    session.set_slider(prediction);
                    while session.tick_timer().is_none() {}
                    timeouts += 1;
                } else {
                    session.submit_prediction(prediction)?;
                }
            }
            RoundPhase::Deciding => {
                let prediction = session
                    .state()
                    .prediction
                    .unwrap_or(session.slider_value());
                session.submit_decision(policy.decide(prediction))?;
            }
            RoundPhase::Resolved => {
                if session.state().train_trapped {
                    traps += 1;
                    session.advance_episode()?;
                } else if session.state().round >= 10 {
                    session.advance_episode()?;
                } else {
                    session.advance_round()?;
                }
            }
        }
    }

    Ok(RunRecord {
        seed: config.seed(),
        difficulty: config.difficulty,
        game_type: config.game_type,
        policy,
        episode_scores: session.episode_scores().to_vec(),
        total_score: session.episode_scores().iter().sum(),
        traps,
        timeouts,
        state_changes: session.journal().len(),
    })
}

fn split_csv(input: &str) -> Vec<&str> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_seeds(input: &str) -> Result<Vec<u64>> {
    split_csv(input)
        .into_iter()
        .map(|part| {
            part.parse::<u64>()
                .with_context(|| format!("invalid seed {part:?}"))
        })
        .collect()
}

fn parse_difficulties(input: &str) -> Result<Vec<Difficulty>> {
    if input.eq_ignore_ascii_case("all") {
        return Ok(vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]);
    }
    split_csv(input)
        .into_iter()
        .map(|part| Difficulty::from_str(part).map_err(Into::into))
        .collect()
}

fn parse_game_types(input: &str) -> Result<Vec<GameType>> {
    if input.eq_ignore_ascii_case("all") {
        return Ok(vec![GameType::Punishment, GameType::Reward]);
    }
    split_csv(input)
        .into_iter()
        .map(|part| GameType::from_str(part).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(split_csv(" 1, 2 ,,3 "), vec!["1", "2", "3"]);
    }

    #[test]
    fn parse_all_expands_sweeps() {
        assert_eq!(parse_difficulties("all").unwrap().len(), 3);
        assert_eq!(parse_game_types("ALL").unwrap().len(), 2);
        assert_eq!(
            parse_difficulties("easy,hard").unwrap(),
            vec![Difficulty::Easy, Difficulty::Hard]
        );
    }

    #[test]
    fn every_policy_completes_a_fixed_run() {
        for policy in [
            PolicyKind::Threshold,
            PolicyKind::Cautious,
            PolicyKind::Bold,
            PolicyKind::TimeoutProne,
        ] {
            let config = GameConfig {
                difficulty: Difficulty::Medium,
                game_type: GameType::Reward,
                mode: GameMode::Fixed,
                seed: Some(1337),
            };
            let record = run_game(config, policy).unwrap();
            assert_eq!(record.completed_episodes(), 10);
            if policy == PolicyKind::TimeoutProne {
                assert!(record.timeouts > 0);
            }
        }
    }
}
