use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata for one match of a competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: u64,
    pub match_date: NaiveDate,
    pub home_score: u32,
    pub away_score: u32,
    pub home_team_name: String,
    pub away_team_name: String,
    /// e.g. "Group Stage", "Quarter-finals", "Final"
    pub competition_stage_name: String,
    pub stadium_name: Option<String>,
    pub referee_name: Option<String>,
}

impl MatchSummary {
    /// "Argentina vs France"
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team_name, self.away_team_name)
    }

    /// "Argentina 3 - 3 France"
    pub fn scoreline(&self) -> String {
        format!(
            "{} {} - {} {}",
            self.home_team_name, self.home_score, self.away_score, self.away_team_name
        )
    }
}

/// Distinct competition stages in order of first appearance.
pub fn stages(matches: &[MatchSummary]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for m in matches {
        if !out.contains(&m.competition_stage_name.as_str()) {
            out.push(&m.competition_stage_name);
        }
    }
    out
}

pub fn filter_by_stage<'a>(matches: &'a [MatchSummary], stage: &str) -> Vec<&'a MatchSummary> {
    matches
        .iter()
        .filter(|m| m.competition_stage_name == stage)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u64, home: &str, away: &str, stage: &str) -> MatchSummary {
        MatchSummary {
            match_id: id,
            match_date: NaiveDate::from_ymd_opt(2022, 12, 18).unwrap(),
            home_score: 3,
            away_score: 3,
            home_team_name: home.into(),
            away_team_name: away.into(),
            competition_stage_name: stage.into(),
            stadium_name: Some("Lusail Stadium".into()),
            referee_name: None,
        }
    }

    #[test]
    fn labels() {
        let m = summary(1, "Argentina", "France", "Final");
        assert_eq!(m.label(), "Argentina vs France");
        assert_eq!(m.scoreline(), "Argentina 3 - 3 France");
    }

    #[test]
    fn stages_and_filtering() {
        let matches = vec![
            summary(1, "Qatar", "Ecuador", "Group Stage"),
            summary(2, "Croatia", "Brazil", "Quarter-finals"),
            summary(3, "England", "Iran", "Group Stage"),
        ];
        assert_eq!(stages(&matches), vec!["Group Stage", "Quarter-finals"]);
        let group: Vec<u64> = filter_by_stage(&matches, "Group Stage")
            .iter()
            .map(|m| m.match_id)
            .collect();
        assert_eq!(group, vec![1, 3]);
        assert!(filter_by_stage(&matches, "Final").is_empty());
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let json = r#"{"match_id": 3869685, "match_date": "2022-12-18", "home_score": 3,
            "away_score": 3, "home_team_name": "Argentina", "away_team_name": "France",
            "competition_stage_name": "Final"}"#;
        let m: MatchSummary = serde_json::from_str(json).unwrap();
        assert_eq!(m.match_id, 3869685);
        assert_eq!(m.stadium_name, None);
    }
}
