pub mod passing_network;
pub mod shots;
pub mod statistics;
pub mod xg_timeline;

pub use passing_network::{
    PassEdge, PassWindow, PassingNetwork, PassingNetworkBuilder, PlayerNode, WindowFallback,
};
pub use shots::{event_locations, ShotMap, ShotRecord};
pub use statistics::{aggregate_statistics, ActionRow, MatchStatistics, ACTION_TAXONOMY};
pub use xg_timeline::{XgTimeline, XgTimelinePoint};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::view::EventLogView;
use crate::geometry::Position;

/// Everything the match page shows, derived from one event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub teams: [String; 2],
    pub statistics: MatchStatistics,
    pub xg_timeline: XgTimeline,
    pub passing_networks: [PassingNetwork; 2],
    pub shots: ShotMap,
    /// Located events per team, indexed like `teams`; feeds the touch heatmaps.
    pub event_locations: [Vec<Position>; 2],
}

impl MatchReport {
    pub fn build(view: &EventLogView, networks: &PassingNetworkBuilder) -> Result<Self> {
        let teams = view.two_teams()?.map(str::to_string);
        Ok(MatchReport {
            teams,
            statistics: aggregate_statistics(view)?,
            xg_timeline: XgTimeline::build(view)?,
            passing_networks: networks.build_all(view)?,
            shots: ShotMap::build(view)?,
            event_locations: event_locations(view)?,
        })
    }
}
