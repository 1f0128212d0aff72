use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod config;

use config::{Command, Config};
use pitchlab::analysis::{MatchReport, PassingNetworkBuilder, WindowFallback};
use pitchlab::dashboard::{self, AppState};
use pitchlab::events::{JsonDirectorySource, MatchSource};
use pitchlab::geometry::Position;
use pitchlab::xg::{
    extract_features, BodyPart, DefenderTrack, ModelArtifacts, ShotQualityScorer, ShotSituation,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let scorer = match &config.model_path {
        Some(path) => ModelArtifacts::load(path)
            .with_context(|| format!("loading shot model from {}", path.display()))?
            .into_scorer(),
        None => {
            warn!("No shot model configured – xG scoring is unavailable");
            ShotQualityScorer::unavailable()
        }
    };

    let networks = PassingNetworkBuilder::new().fallback(if config.full_match_fallback {
        WindowFallback::FullMatch
    } else {
        WindowFallback::Reject
    });
    let source = Arc::new(JsonDirectorySource::new(&config.data_dir));

    match &config.command {
        Command::Serve { addr } => {
            let app = dashboard::router(AppState {
                source,
                scorer,
                networks,
            });
            let addr: SocketAddr = addr.parse()?;
            info!(
                "Serving matches from {} on http://{}",
                config.data_dir.display(),
                addr
            );
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            axum::serve(listener, app).await?;
        }
        Command::Report { match_id } => {
            let view = source
                .load_events(*match_id)
                .await
                .with_context(|| format!("loading match {}", match_id))?;
            info!(
                "Loaded {} events for match {} via {}",
                view.len(),
                match_id,
                source.name()
            );
            let report = MatchReport::build(&view, &networks)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Simulate {
            shooter_x,
            shooter_y,
            body_part,
            keeper_x,
            keeper_y,
            defenders,
        } => {
            let situation = ShotSituation::new(
                Position::new(*shooter_x, *shooter_y),
                BodyPart::from_name(body_part),
            );
            let track =
                DefenderTrack::with_goalkeeper(Position::new(*keeper_x, *keeper_y), defenders);
            let features = extract_features(&situation, &track)?;
            let xg = scorer.score(&features)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "features": features,
                    "xg": xg,
                }))?
            );
        }
    }

    Ok(())
}
