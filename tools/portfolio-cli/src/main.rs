//! Portfolio CLI
//!
//! Generates a lineup portfolio from a scored player pool:
//! - players: JSON array of scored players (from the scoring pipeline)
//! - config: TOML run configuration (cap, counts, stacking, relaxation)
//! - output: human-readable report, or JSON with `--json`

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_engine::PortfolioController;
use serde::Deserialize;
use slate_model::{Player, PlayerId, Position, RunConfig};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portfolio-cli")]
#[command(about = "Generate a DFS lineup portfolio from a scored player pool")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the scored player pool (JSON array)
    #[arg(short, long)]
    players: PathBuf,

    /// Path to the run configuration (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Override the configured lineup count
    #[arg(short = 'n', long)]
    lineups: Option<u32>,

    /// Emit the full report as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// One player row as the scoring pipeline exports it. Rows without an
/// explicit id get the NAME@TEAM composite key.
#[derive(Debug, Deserialize)]
struct PlayerRecord {
    #[serde(default)]
    id: Option<String>,
    name: String,
    team: String,
    #[serde(default)]
    opponent: String,
    position: Position,
    salary: u32,
    projection: f64,
    smart_value: f64,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    excluded: bool,
}

impl From<PlayerRecord> for Player {
    fn from(r: PlayerRecord) -> Self {
        let id = match r.id {
            Some(id) => PlayerId::new(id),
            None => PlayerId::from_name_team(&r.name, &r.team),
        };
        Player {
            id,
            name: r.name,
            team: r.team,
            opponent: r.opponent,
            position: r.position,
            salary: r.salary,
            projection: r.projection,
            smart_value: r.smart_value,
            locked: r.locked,
            excluded: r.excluded,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_text = fs::read_to_string(&cli.config)
        .with_context(|| format!("reading config {}", cli.config.display()))?;
    let mut config: RunConfig = toml::from_str(&config_text)
        .with_context(|| format!("parsing config {}", cli.config.display()))?;
    if let Some(n) = cli.lineups {
        config.lineup_count = n;
    }

    let players_text = fs::read_to_string(&cli.players)
        .with_context(|| format!("reading players {}", cli.players.display()))?;
    let records: Vec<PlayerRecord> = serde_json::from_str(&players_text)
        .with_context(|| format!("parsing players {}", cli.players.display()))?;
    let players: Vec<Player> = records.into_iter().map(Player::from).collect();
    info!(players = players.len(), lineups = config.lineup_count, "starting run");

    let report = PortfolioController::new(config, players)?.run()?;
    if report.is_partial() {
        info!(
            generated = report.generated,
            requested = report.requested,
            "run ended with a partial portfolio"
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_id_gets_composite_key() {
        let json = r#"{
            "name": "Josh Jacobs", "team": "GB", "position": "RB",
            "salary": 7500, "projection": 18.2, "smart_value": 61.4
        }"#;
        let record: PlayerRecord = serde_json::from_str(json).unwrap();
        let player: Player = record.into();
        assert_eq!(player.id.as_str(), "JOSH_JACOBS@GB");
        assert!(!player.locked);
    }

    #[test]
    fn record_with_explicit_id_keeps_it() {
        let json = r#"{
            "id": "nfl-12345", "name": "Josh Jacobs", "team": "GB",
            "position": "D/ST", "salary": 7500,
            "projection": 18.2, "smart_value": 61.4, "locked": true
        }"#;
        let record: PlayerRecord = serde_json::from_str(json).unwrap();
        let player: Player = record.into();
        assert_eq!(player.id.as_str(), "nfl-12345");
        assert_eq!(player.position, Position::Dst);
        assert!(player.locked);
    }

    #[test]
    fn run_config_parses_from_toml() {
        let toml_text = r#"
            lineup_count = 5
            salary_cap = 50000
            uniqueness_pct = 0.5
            max_exposure_pct = 0.6
            qb_stack = true
        "#;
        let config: RunConfig = toml::from_str(toml_text).unwrap();
        assert_eq!(config.lineup_count, 5);
        assert!(config.qb_stack);
        assert_eq!(config.max_players_per_team, 3);
        assert!(config.validate().is_ok());
    }
}
