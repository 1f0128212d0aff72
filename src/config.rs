use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pitchlab::geometry::{Position, PITCH_LENGTH, PITCH_WIDTH};

/// Football match analytics: xG simulation, passing networks and match statistics
#[derive(Parser, Debug, Clone)]
#[command(name = "pitchlab", version, about)]
pub struct Config {
    /// Directory holding matches.json and events/<match_id>.json
    #[arg(long, env = "PITCHLAB_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// JSON file with the shot model's scaler and weights
    #[arg(long, env = "PITCHLAB_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Use every completed pass when a team never substitutes, instead of failing
    #[arg(long, env = "PITCHLAB_FULL_MATCH_FALLBACK", default_value = "true", action = clap::ArgAction::Set)]
    pub full_match_fallback: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the analytics JSON API
    Serve {
        /// API listen address
        #[arg(long, env = "PITCHLAB_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,
    },
    /// Print the full report for one match as JSON
    Report {
        #[arg(long)]
        match_id: u64,
    },
    /// Compute features and xG for a hypothetical shot
    Simulate {
        #[arg(long, default_value = "89.0")]
        shooter_x: f64,
        #[arg(long, default_value = "34.0")]
        shooter_y: f64,
        /// "Foot" or "Head"
        #[arg(long, default_value = "Foot")]
        body_part: String,
        #[arg(long, default_value = "102.0")]
        keeper_x: f64,
        #[arg(long, default_value = "34.0")]
        keeper_y: f64,
        /// Outfield defender as "x,y"; repeat for several
        #[arg(long = "defender", value_parser = parse_position)]
        defenders: Vec<Position>,
    },
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{}\"", s))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in \"{}\": {}", s, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in \"{}\": {}", s, e))?;
    Ok(Position::new(x, y))
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(path) = &self.model_path {
            if !path.is_file() {
                anyhow::bail!("model file {} does not exist", path.display());
            }
        }
        match &self.command {
            Command::Serve { addr } => {
                if addr.parse::<std::net::SocketAddr>().is_err() {
                    anyhow::bail!("invalid listen address: {}", addr);
                }
            }
            Command::Report { .. } => {
                if !self.data_dir.is_dir() {
                    anyhow::bail!("data directory {} does not exist", self.data_dir.display());
                }
            }
            Command::Simulate {
                shooter_x,
                shooter_y,
                keeper_x,
                keeper_y,
                defenders,
                ..
            } => {
                let points = [
                    ("shooter", Position::new(*shooter_x, *shooter_y)),
                    ("goalkeeper", Position::new(*keeper_x, *keeper_y)),
                ];
                for (who, p) in points
                    .into_iter()
                    .chain(defenders.iter().map(|d| ("defender", *d)))
                {
                    if !p.is_on_pitch() {
                        anyhow::bail!(
                            "{} position ({}, {}) is off the {}x{} pitch",
                            who,
                            p.x,
                            p.y,
                            PITCH_LENGTH,
                            PITCH_WIDTH
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
