use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::models::event_type;
use crate::events::view::EventLogView;

/// Actions compared between the two sides, in display order.
pub const ACTION_TAXONOMY: [&str; 6] = [
    event_type::SHOT,
    event_type::PASS,
    event_type::DUEL,
    event_type::FOUL_COMMITTED,
    event_type::DRIBBLE,
    event_type::INTERCEPTION,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRow {
    pub action: String,
    /// Counts in the same order as [`MatchStatistics::teams`].
    pub counts: [u32; 2],
    pub cumul: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub teams: [String; 2],
    pub rows: Vec<ActionRow>,
}

impl MatchStatistics {
    pub fn row(&self, action: &str) -> Option<&ActionRow> {
        self.rows.iter().find(|r| r.action == action)
    }

    pub fn count(&self, action: &str, team: &str) -> Option<u32> {
        let side = self.teams.iter().position(|t| t == team)?;
        self.row(action).map(|r| r.counts[side])
    }
}

/// Count every taxonomy action for both teams.
pub fn aggregate_statistics(view: &EventLogView) -> Result<MatchStatistics> {
    let teams = view.two_teams()?;
    let rows = ACTION_TAXONOMY
        .iter()
        .map(|&action| {
            let counts = teams.map(|team| {
                view.select().of_type(action).for_team(team).count() as u32
            });
            ActionRow {
                action: action.to_string(),
                counts,
                cumul: counts[0] + counts[1],
            }
        })
        .collect();
    Ok(MatchStatistics {
        teams: teams.map(str::to_string),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use crate::events::models::MatchEvent;

    fn ev(index: u32, type_name: &str, team: &str) -> MatchEvent {
        MatchEvent {
            sequence_index: index,
            period: 1,
            minute: 1.0,
            type_name: type_name.into(),
            sub_type_name: None,
            team_name: team.into(),
            player_name: None,
            location: None,
            end_location: None,
            outcome_name: None,
            pass_recipient_name: None,
            shot_xg_value: if type_name == "Shot" { Some(0.1) } else { None },
        }
    }

    fn log() -> EventLogView {
        EventLogView::new(vec![
            ev(1, "Pass", "A"),
            ev(2, "Pass", "B"),
            ev(3, "Foul Committed", "B"),
            ev(4, "Foul Committed", "B"),
            ev(5, "Shot", "A"),
            ev(6, "Foul Committed", "B"),
            ev(7, "Pass", "A"),
            ev(8, "Ball Receipt*", "A"),
        ])
    }

    #[test]
    fn zero_fouls_are_reported_not_omitted() {
        let stats = aggregate_statistics(&log()).unwrap();
        let fouls = stats.row("Foul Committed").unwrap();
        assert_eq!(fouls.counts, [0, 3]);
        assert_eq!(fouls.cumul, 3);
        assert_eq!(stats.count("Foul Committed", "A"), Some(0));
    }

    #[test]
    fn rows_follow_taxonomy_order() {
        let stats = aggregate_statistics(&log()).unwrap();
        let actions: Vec<&str> = stats.rows.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, ACTION_TAXONOMY.to_vec());
        assert_eq!(stats.teams, ["A".to_string(), "B".to_string()]);
        assert_eq!(stats.row("Pass").unwrap().counts, [2, 1]);
        assert_eq!(stats.row("Dribble").unwrap().cumul, 0);
    }

    #[test]
    fn three_teams_are_rejected() {
        let mut events = log().events().to_vec();
        events.push(ev(9, "Pass", "C"));
        assert!(matches!(
            aggregate_statistics(&EventLogView::new(events)),
            Err(AnalyticsError::Configuration(_))
        ));
    }
}
