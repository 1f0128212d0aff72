use std::ops::Range;

use crate::error::{AnalyticsError, Result};
use crate::events::models::{event_type, MatchEvent};

/// Read-only view over one match's event log.
#[derive(Debug, Clone, Default)]
pub struct EventLogView {
    events: Vec<MatchEvent>,
}

impl EventLogView {
    pub fn new(events: Vec<MatchEvent>) -> Self {
        EventLogView { events }
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Start a lazy selection over every event.
    pub fn select<'f>(&self) -> EventSelection<'_, 'f> {
        EventSelection::new(&self.events)
    }

    /// Team names in order of first appearance.
    pub fn teams(&self) -> Vec<&str> {
        let mut teams: Vec<&str> = Vec::new();
        for ev in &self.events {
            if !teams.contains(&ev.team_name.as_str()) {
                teams.push(&ev.team_name);
            }
        }
        teams
    }

    /// The two sides of the match, in order of first appearance.
    pub fn two_teams(&self) -> Result<[&str; 2]> {
        match self.teams().as_slice() {
            [a, b] => Ok([*a, *b]),
            other => Err(AnalyticsError::config(format!(
                "event log must contain exactly two teams, found {}",
                other.len()
            ))),
        }
    }

    /// The team's first substitution by sequence index.
    pub fn first_substitution(&self, team: &str) -> Result<&MatchEvent> {
        self.select()
            .of_type(event_type::SUBSTITUTION)
            .for_team(team)
            .iter()
            .min_by_key(|ev| ev.sequence_index)
            .ok_or_else(|| AnalyticsError::not_found(format!("no substitution for team {}", team)))
    }
}

/// A filter chain over an event slice. Nothing is evaluated until
/// [`EventSelection::iter`] is called.
#[derive(Debug, Clone, Copy)]
pub struct EventSelection<'e, 'f> {
    events: &'e [MatchEvent],
    type_name: Option<&'f str>,
    team: Option<&'f str>,
    from_index: Option<u32>,
    before_index: Option<u32>,
    sub_type: Option<&'f str>,
    excluded_sub_type: Option<&'f str>,
    has_outcome: Option<bool>,
}

impl<'e, 'f> EventSelection<'e, 'f> {
    fn new(events: &'e [MatchEvent]) -> Self {
        EventSelection {
            events,
            type_name: None,
            team: None,
            from_index: None,
            before_index: None,
            sub_type: None,
            excluded_sub_type: None,
            has_outcome: None,
        }
    }

    pub fn of_type(mut self, type_name: &'f str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    pub fn for_team(mut self, team: &'f str) -> Self {
        self.team = Some(team);
        self
    }

    /// Keep events with `sequence_index >= index`.
    pub fn from_index(mut self, index: u32) -> Self {
        self.from_index = Some(index);
        self
    }

    /// Keep events with `sequence_index < index`.
    pub fn before(mut self, index: u32) -> Self {
        self.before_index = Some(index);
        self
    }

    pub fn in_range(self, range: Range<u32>) -> Self {
        self.from_index(range.start).before(range.end)
    }

    pub fn with_sub_type(mut self, sub_type: &'f str) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    /// Drop events of this sub-type; events without a sub-type are kept.
    pub fn excluding_sub_type(mut self, sub_type: &'f str) -> Self {
        self.excluded_sub_type = Some(sub_type);
        self
    }

    pub fn with_outcome(mut self) -> Self {
        self.has_outcome = Some(true);
        self
    }

    pub fn without_outcome(mut self) -> Self {
        self.has_outcome = Some(false);
        self
    }

    fn matches(&self, ev: &MatchEvent) -> bool {
        if self.type_name.is_some_and(|t| ev.type_name != t) {
            return false;
        }
        if self.team.is_some_and(|t| ev.team_name != t) {
            return false;
        }
        if self.from_index.is_some_and(|i| ev.sequence_index < i) {
            return false;
        }
        if self.before_index.is_some_and(|i| ev.sequence_index >= i) {
            return false;
        }
        let sub_type = ev.sub_type_name.as_deref();
        if self.sub_type.is_some_and(|s| sub_type != Some(s)) {
            return false;
        }
        if self.excluded_sub_type.is_some_and(|s| sub_type == Some(s)) {
            return false;
        }
        if self
            .has_outcome
            .is_some_and(|want| ev.outcome_name.is_some() != want)
        {
            return false;
        }
        true
    }

    pub fn iter(self) -> SelectionIter<'e, 'f> {
        SelectionIter {
            inner: self.events.iter(),
            selection: self,
        }
    }

    pub fn count(self) -> usize {
        self.iter().count()
    }

    pub fn first(self) -> Option<&'e MatchEvent> {
        self.iter().next()
    }
}

pub struct SelectionIter<'e, 'f> {
    inner: std::slice::Iter<'e, MatchEvent>,
    selection: EventSelection<'e, 'f>,
}

impl<'e, 'f> Iterator for SelectionIter<'e, 'f> {
    type Item = &'e MatchEvent;

    fn next(&mut self) -> Option<&'e MatchEvent> {
        let selection = &self.selection;
        self.inner.by_ref().find(|ev| selection.matches(ev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn ev(index: u32, type_name: &str, team: &str) -> MatchEvent {
        MatchEvent {
            sequence_index: index,
            period: 1,
            minute: index as f64 / 2.0,
            type_name: type_name.into(),
            sub_type_name: None,
            team_name: team.into(),
            player_name: Some("Luka Modrić".into()),
            location: Some(Position::new(50.0, 34.0)),
            end_location: None,
            outcome_name: None,
            pass_recipient_name: None,
            shot_xg_value: None,
        }
    }

    fn log() -> EventLogView {
        let mut throw_in = ev(4, "Pass", "Croatia");
        throw_in.sub_type_name = Some("Throw-in".into());
        let mut incomplete = ev(5, "Pass", "France");
        incomplete.outcome_name = Some("Incomplete".into());
        EventLogView::new(vec![
            ev(1, "Pass", "France"),
            ev(2, "Duel", "Croatia"),
            ev(3, "Pass", "Croatia"),
            throw_in,
            incomplete,
            ev(6, "Substitution", "France"),
            ev(7, "Pass", "France"),
            ev(8, "Substitution", "France"),
        ])
    }

    #[test]
    fn teams_in_first_seen_order() {
        let view = log();
        assert_eq!(view.teams(), vec!["France", "Croatia"]);
        assert_eq!(view.two_teams().unwrap(), ["France", "Croatia"]);
    }

    #[test]
    fn one_team_is_a_configuration_error() {
        let view = EventLogView::new(vec![ev(1, "Pass", "France")]);
        assert!(matches!(view.two_teams(), Err(AnalyticsError::Configuration(_))));
    }

    #[test]
    fn filters_compose() {
        let view = log();
        assert_eq!(view.select().of_type("Pass").count(), 5);
        assert_eq!(view.select().of_type("Pass").for_team("France").count(), 3);
        assert_eq!(
            view.select().of_type("Pass").for_team("France").without_outcome().count(),
            2
        );
        assert_eq!(view.select().of_type("Pass").with_outcome().count(), 1);
        assert_eq!(
            view.select()
                .of_type("Pass")
                .for_team("Croatia")
                .excluding_sub_type("Throw-in")
                .count(),
            1
        );
        assert_eq!(view.select().with_sub_type("Throw-in").count(), 1);
        assert_eq!(view.select().in_range(3..6).count(), 3);
        assert_eq!(view.select().before(3).first().map(|e| e.sequence_index), Some(1));
    }

    #[test]
    fn first_substitution_found_and_missing() {
        let view = log();
        assert_eq!(view.first_substitution("France").unwrap().sequence_index, 6);
        assert!(matches!(
            view.first_substitution("Croatia"),
            Err(AnalyticsError::NotFound(_))
        ));
    }

    #[test]
    fn selecting_never_mutates_the_log() {
        let view = log();
        let before = view.events().to_vec();
        let _ = view.select().of_type("Pass").for_team("France").count();
        assert_eq!(view.events(), before.as_slice());
        assert_eq!(view.len(), 8);
    }
}
