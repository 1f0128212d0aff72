//! JSON API consumed by the match-analysis and xG-simulator pages.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::analysis::{
    aggregate_statistics, event_locations, MatchReport, MatchStatistics, PassingNetwork,
    PassingNetworkBuilder, ShotMap, XgTimeline,
};
use crate::error::AnalyticsError;
use crate::events::{EventLogView, MatchSource};
use crate::fixtures::{filter_by_stage, stages, MatchSummary};
use crate::geometry::Position;
use crate::xg::{
    extract_features, BodyPart, DefenderTrack, OpponentRole, ShotFeatureVector, ShotQualityScorer,
    ShotSituation, TrackedOpponent,
};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MatchSource>,
    pub scorer: ShotQualityScorer,
    pub networks: PassingNetworkBuilder,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Build the Axum router for the analytics API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stages", get(stages_handler))
        .route("/api/matches", get(matches_handler))
        .route("/api/matches/:id/report", get(report_handler))
        .route("/api/matches/:id/statistics", get(statistics_handler))
        .route("/api/matches/:id/passing-network", get(passing_network_handler))
        .route("/api/matches/:id/xg-timeline", get(xg_timeline_handler))
        .route("/api/matches/:id/shots", get(shots_handler))
        .route("/api/matches/:id/events", get(events_handler))
        .route("/api/xg/simulate", post(simulate_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn status_for(err: &AnalyticsError) -> StatusCode {
    match err {
        AnalyticsError::NotFound(_) => StatusCode::NOT_FOUND,
        AnalyticsError::Configuration(_) | AnalyticsError::DegenerateGeometry(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalyticsError::ScoringUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AnalyticsError::Io(_) | AnalyticsError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: AnalyticsError) -> (StatusCode, String) {
    let status = status_for(&err);
    if status.is_server_error() {
        warn!("API request failed: {}", err);
    }
    (status, err.to_string())
}

async fn load(state: &AppState, match_id: u64) -> Result<EventLogView, (StatusCode, String)> {
    state.source.load_events(match_id).await.map_err(reject)
}

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    pub stage: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchListItem {
    #[serde(flatten)]
    pub summary: MatchSummary,
    pub label: String,
    pub scoreline: String,
}

/// GET /api/stages
async fn stages_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<String>> {
    let matches = state.source.list_matches().await.map_err(reject)?;
    Ok(Json(stages(&matches).into_iter().map(str::to_string).collect()))
}

/// GET /api/matches?stage=Final
async fn matches_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MatchesQuery>,
) -> ApiResult<Vec<MatchListItem>> {
    let matches = state.source.list_matches().await.map_err(reject)?;
    let selected: Vec<&MatchSummary> = match query.stage.as_deref() {
        Some(stage) => filter_by_stage(&matches, stage),
        None => matches.iter().collect(),
    };
    Ok(Json(
        selected
            .into_iter()
            .map(|m| MatchListItem {
                label: m.label(),
                scoreline: m.scoreline(),
                summary: m.clone(),
            })
            .collect(),
    ))
}

/// GET /api/matches/:id/report
async fn report_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<u64>,
) -> ApiResult<MatchReport> {
    let view = load(&state, match_id).await?;
    MatchReport::build(&view, &state.networks)
        .map(Json)
        .map_err(reject)
}

/// GET /api/matches/:id/statistics
async fn statistics_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<u64>,
) -> ApiResult<MatchStatistics> {
    let view = load(&state, match_id).await?;
    aggregate_statistics(&view).map(Json).map_err(reject)
}

/// GET /api/matches/:id/passing-network
async fn passing_network_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<u64>,
) -> ApiResult<[PassingNetwork; 2]> {
    let view = load(&state, match_id).await?;
    state.networks.build_all(&view).map(Json).map_err(reject)
}

/// GET /api/matches/:id/xg-timeline
async fn xg_timeline_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<u64>,
) -> ApiResult<XgTimeline> {
    let view = load(&state, match_id).await?;
    XgTimeline::build(&view).map(Json).map_err(reject)
}

/// GET /api/matches/:id/shots
async fn shots_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<u64>,
) -> ApiResult<ShotMap> {
    let view = load(&state, match_id).await?;
    ShotMap::build(&view).map(Json).map_err(reject)
}

#[derive(Debug, Serialize)]
pub struct TeamLocations {
    pub team: String,
    pub locations: Vec<Position>,
}

/// GET /api/matches/:id/events
async fn events_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<u64>,
) -> ApiResult<Vec<TeamLocations>> {
    let view = load(&state, match_id).await?;
    let teams = view.two_teams().map_err(reject)?;
    let locations = event_locations(&view).map_err(reject)?;
    Ok(Json(
        teams
            .into_iter()
            .zip(locations)
            .map(|(team, locations)| TeamLocations {
                team: team.to_string(),
                locations,
            })
            .collect(),
    ))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShotInput {
    pub x: f64,
    pub y: f64,
    pub body_part_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpponentInput {
    pub x: f64,
    pub y: f64,
    pub position_name: OpponentRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    pub shot: ShotInput,
    pub opponents: Vec<OpponentInput>,
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub features: ShotFeatureVector,
    pub xg: f64,
}

/// POST /api/xg/simulate
async fn simulate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimulateRequest>,
) -> ApiResult<SimulateResponse> {
    let situation = ShotSituation::new(
        Position::new(req.shot.x, req.shot.y),
        BodyPart::from_name(&req.shot.body_part_name),
    );
    let track = DefenderTrack::new(
        req.opponents
            .iter()
            .map(|o| TrackedOpponent {
                position: Position::new(o.x, o.y),
                role: o.position_name,
            })
            .collect(),
    );
    let features = extract_features(&situation, &track).map_err(reject)?;
    let xg = state.scorer.score(&features).map_err(reject)?;
    Ok(Json(SimulateResponse { features, xg }))
}
