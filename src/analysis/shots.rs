//! Per-team shot and event location projections.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::models::event_type;
use crate::events::view::EventLogView;
use crate::geometry::Position;

pub const GOAL_OUTCOME: &str = "Goal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub sequence_index: u32,
    pub player: String,
    pub location: Option<Position>,
    pub end_location: Option<Position>,
    pub outcome: Option<String>,
    pub xg: f64,
}

impl ShotRecord {
    pub fn is_goal(&self) -> bool {
        self.outcome.as_deref() == Some(GOAL_OUTCOME)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotMap {
    pub teams: [String; 2],
    /// Shots in log order, indexed like `teams`.
    pub shots: [Vec<ShotRecord>; 2],
}

impl ShotMap {
    pub fn build(view: &EventLogView) -> Result<Self> {
        let teams = view.two_teams()?;
        let shots = teams.map(|team| {
            view.select()
                .of_type(event_type::SHOT)
                .for_team(team)
                .iter()
                .map(|ev| ShotRecord {
                    sequence_index: ev.sequence_index,
                    player: ev.player_name.clone().unwrap_or_default(),
                    location: ev.location,
                    end_location: ev.end_location,
                    outcome: ev.outcome_name.clone(),
                    xg: ev.shot_xg_value.unwrap_or(0.0),
                })
                .collect()
        });
        Ok(ShotMap {
            teams: teams.map(str::to_string),
            shots,
        })
    }

    pub fn goals(&self) -> [usize; 2] {
        [0, 1].map(|side| self.shots[side].iter().filter(|s| s.is_goal()).count())
    }
}

/// Locations of every located event, per team in first-appearance order.
pub fn event_locations(view: &EventLogView) -> Result<[Vec<Position>; 2]> {
    let teams = view.two_teams()?;
    Ok(teams.map(|team| {
        view.select()
            .for_team(team)
            .iter()
            .filter_map(|ev| ev.location)
            .collect()
    }))
}
