use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::geometry::Position;

/// Event type names used by the analytics.
pub mod event_type {
    pub const SHOT: &str = "Shot";
    pub const PASS: &str = "Pass";
    pub const DUEL: &str = "Duel";
    pub const FOUL_COMMITTED: &str = "Foul Committed";
    pub const DRIBBLE: &str = "Dribble";
    pub const INTERCEPTION: &str = "Interception";
    pub const SUBSTITUTION: &str = "Substitution";
}

/// Pass sub-type excluded from passing networks.
pub const THROW_IN: &str = "Throw-in";

/// One row of a provider's flat event export. Empty strings are read as
/// absent values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEventRecord {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sequence_index: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub period: Option<u8>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub minute: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub type_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sub_type_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub team_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub player_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub y: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_x: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_y: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub outcome_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pass_recipient_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub shot_xg_value: Option<f64>,
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

/// Numeric column that may be exported as `""` or as a quoted number.
fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(v)) => Ok(Some(v)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid number {:?}: {}", s, e))),
    }
}

/// A validated match event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Authoritative temporal order within the match.
    pub sequence_index: u32,
    pub period: u8,
    pub minute: f64,
    pub type_name: String,
    pub sub_type_name: Option<String>,
    pub team_name: String,
    pub player_name: Option<String>,
    pub location: Option<Position>,
    pub end_location: Option<Position>,
    /// Absent for successful actions (e.g. a completed pass).
    pub outcome_name: Option<String>,
    pub pass_recipient_name: Option<String>,
    /// Present on every shot.
    pub shot_xg_value: Option<f64>,
}

impl TryFrom<RawEventRecord> for MatchEvent {
    type Error = AnalyticsError;

    fn try_from(raw: RawEventRecord) -> Result<Self> {
        let sequence_index = raw
            .sequence_index
            .ok_or_else(|| AnalyticsError::config("event record without sequence_index"))?;
        let missing = |field: &str| {
            AnalyticsError::config(format!("event {} is missing {}", sequence_index, field))
        };

        let period = raw.period.ok_or_else(|| missing("period"))?;
        let minute = raw
            .minute
            .filter(|m| m.is_finite() && *m >= 0.0)
            .ok_or_else(|| missing("a valid minute"))?;
        let type_name = raw.type_name.ok_or_else(|| missing("type_name"))?;
        let team_name = raw.team_name.ok_or_else(|| missing("team_name"))?;

        let location = pair(sequence_index, "x/y", raw.x, raw.y)?;
        let end_location = pair(sequence_index, "end_x/end_y", raw.end_x, raw.end_y)?;

        let shot_xg_value = match raw.shot_xg_value {
            Some(v) if !v.is_finite() || v < 0.0 => {
                return Err(AnalyticsError::config(format!(
                    "event {} has invalid shot_xg_value {}",
                    sequence_index, v
                )))
            }
            other => other,
        };
        if type_name == event_type::SHOT && shot_xg_value.is_none() {
            return Err(missing("shot_xg_value"));
        }

        Ok(MatchEvent {
            sequence_index,
            period,
            minute,
            type_name,
            sub_type_name: raw.sub_type_name,
            team_name,
            player_name: raw.player_name,
            location,
            end_location,
            outcome_name: raw.outcome_name,
            pass_recipient_name: raw.pass_recipient_name,
            shot_xg_value,
        })
    }
}

fn pair(index: u32, what: &str, x: Option<f64>, y: Option<f64>) -> Result<Option<Position>> {
    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Some(Position::new(x, y))),
        (None, None) => Ok(None),
        _ => Err(AnalyticsError::config(format!(
            "event {} has an incomplete or non-finite {}",
            index, what
        ))),
    }
}

/// Validate a provider export into structured events.
pub fn parse_events(raw: Vec<RawEventRecord>) -> Result<Vec<MatchEvent>> {
    raw.into_iter().map(MatchEvent::try_from).collect()
}
