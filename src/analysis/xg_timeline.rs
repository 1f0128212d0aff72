use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::events::models::event_type;
use crate::events::view::EventLogView;

/// Player/result label carried by the kickoff anchors.
pub const ANCHOR_LABEL: &str = "start";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XgTimelinePoint {
    pub team: String,
    pub player: String,
    pub period: u8,
    pub minute: f64,
    pub xg: f64,
    pub cumulative_xg: f64,
    pub result: String,
}

/// Running xG per team, anchors first, then shots by team, period and minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XgTimeline {
    pub points: Vec<XgTimelinePoint>,
}

impl XgTimeline {
    pub fn build(view: &EventLogView) -> Result<Self> {
        let teams = view.two_teams()?;

        let mut shots = view
            .select()
            .of_type(event_type::SHOT)
            .iter()
            .map(|ev| {
                let xg = ev.shot_xg_value.ok_or_else(|| {
                    AnalyticsError::config(format!(
                        "shot {} has no xG value",
                        ev.sequence_index
                    ))
                })?;
                Ok(XgTimelinePoint {
                    team: ev.team_name.clone(),
                    player: ev.player_name.clone().unwrap_or_default(),
                    period: ev.period,
                    minute: ev.minute,
                    xg,
                    cumulative_xg: 0.0,
                    result: ev.outcome_name.clone().unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Vec::sort_by is stable: shots in the same minute keep log order.
        shots.sort_by(|a, b| {
            a.team
                .cmp(&b.team)
                .then(a.period.cmp(&b.period))
                .then(a.minute.total_cmp(&b.minute))
        });

        let mut running = [0.0_f64; 2];
        for shot in &mut shots {
            let side = usize::from(shot.team != teams[0]);
            running[side] += shot.xg;
            shot.cumulative_xg = running[side];
        }

        let mut points: Vec<XgTimelinePoint> = teams
            .iter()
            .map(|team| XgTimelinePoint {
                team: team.to_string(),
                player: ANCHOR_LABEL.to_string(),
                period: 1,
                minute: 0.0,
                xg: 0.0,
                cumulative_xg: 0.0,
                result: ANCHOR_LABEL.to_string(),
            })
            .collect();
        points.extend(shots);
        Ok(XgTimeline { points })
    }

    pub fn for_team<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a XgTimelinePoint> {
        self.points.iter().filter(move |p| p.team == team)
    }

    pub fn total_for(&self, team: &str) -> f64 {
        self.for_team(team)
            .map(|p| p.cumulative_xg)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::models::MatchEvent;
    use approx::assert_relative_eq;

    fn shot(index: u32, team: &str, period: u8, minute: f64, xg: f64) -> MatchEvent {
        MatchEvent {
            sequence_index: index,
            period,
            minute,
            type_name: "Shot".into(),
            sub_type_name: Some("Open Play".into()),
            team_name: team.into(),
            player_name: Some(format!("Player {}", index)),
            location: None,
            end_location: None,
            outcome_name: Some(if xg > 0.5 { "Goal" } else { "Saved" }.into()),
            pass_recipient_name: None,
            shot_xg_value: Some(xg),
        }
    }

    fn pass(index: u32, team: &str) -> MatchEvent {
        MatchEvent {
            type_name: "Pass".into(),
            shot_xg_value: None,
            ..shot(index, team, 1, 0.5, 0.0)
        }
    }

    fn log() -> EventLogView {
        EventLogView::new(vec![
            pass(1, "Morocco"),
            pass(2, "Portugal"),
            shot(3, "Portugal", 1, 20.0, 0.1),
            shot(4, "Morocco", 1, 42.0, 0.78),
            shot(5, "Portugal", 2, 51.0, 0.3),
            shot(6, "Portugal", 1, 20.0, 0.05),
            shot(7, "Morocco", 2, 47.0, 0.04),
        ])
    }

    #[test]
    fn anchors_come_first_in_team_order() {
        let tl = XgTimeline::build(&log()).unwrap();
        assert_eq!(tl.points.len(), 7);
        assert_eq!(tl.points[0].team, "Morocco");
        assert_eq!(tl.points[1].team, "Portugal");
        for anchor in &tl.points[..2] {
            assert_eq!(anchor.period, 1);
            assert_eq!(anchor.minute, 0.0);
            assert_eq!(anchor.cumulative_xg, 0.0);
            assert_eq!(anchor.result, ANCHOR_LABEL);
        }
    }

    #[test]
    fn cumulative_runs_across_periods_without_reset() {
        let tl = XgTimeline::build(&log()).unwrap();
        let portugal: Vec<f64> = tl.for_team("Portugal").map(|p| p.cumulative_xg).collect();
        assert_eq!(portugal.len(), 4);
        assert_relative_eq!(portugal[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(portugal[2], 0.15, epsilon = 1e-12);
        assert_relative_eq!(portugal[3], 0.45, epsilon = 1e-12);
        assert_relative_eq!(tl.total_for("Morocco"), 0.82, epsilon = 1e-12);
    }

    #[test]
    fn ties_keep_log_order() {
        let tl = XgTimeline::build(&log()).unwrap();
        let players: Vec<&str> = tl
            .for_team("Portugal")
            .skip(1)
            .map(|p| p.player.as_str())
            .collect();
        assert_eq!(players, vec!["Player 3", "Player 6", "Player 5"]);
    }

    #[test]
    fn cumulative_is_non_decreasing_and_starts_at_zero() {
        let tl = XgTimeline::build(&log()).unwrap();
        for team in ["Morocco", "Portugal"] {
            let series: Vec<f64> = tl.for_team(team).map(|p| p.cumulative_xg).collect();
            assert_eq!(series[0], 0.0);
            assert!(series.windows(2).all(|w| w[1] >= w[0]), "{}: {:?}", team, series);
        }
    }

    #[test]
    fn match_without_shots_has_only_anchors() {
        let view = EventLogView::new(vec![pass(1, "Morocco"), pass(2, "Portugal")]);
        let tl = XgTimeline::build(&view).unwrap();
        assert_eq!(tl.points.len(), 2);
        assert_eq!(tl.total_for("Portugal"), 0.0);
    }
}
