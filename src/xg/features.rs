//! Geometric feature extraction for a single shot situation.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::geometry::{
    distance, goal_posts, point_in_triangle, subtended_goal_angle, Position, GOAL_CENTER, GOAL_WIDTH,
};

/// Opponents within this radius of the shooter count as pressing the shot.
pub const CLOSE_PLAYER_RADIUS: f64 = 3.0;

/// Slack when deciding whether a shooter on the goal line stands on a post.
const POST_TOLERANCE: f64 = 1e-9;

/// Column order the scoring model was trained on.
pub const MODEL_INPUT_ORDER: [&str; 9] = [
    "x0",
    "is_closer",
    "angle",
    "distance",
    "gk_distance",
    "gk_distance_y",
    "triangle",
    "close_players",
    "header",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPart {
    Foot,
    Head,
}

impl BodyPart {
    /// Anything other than `Head` is struck with the foot.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("head") {
            BodyPart::Head
        } else {
            BodyPart::Foot
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotSituation {
    pub shooter: Position,
    pub body_part: BodyPart,
}

impl ShotSituation {
    pub fn new(shooter: Position, body_part: BodyPart) -> Self {
        ShotSituation { shooter, body_part }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentRole {
    Goalkeeper,
    Defender,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedOpponent {
    pub position: Position,
    pub role: OpponentRole,
}

/// Opponents tracked at the moment of the shot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefenderTrack {
    entries: Vec<TrackedOpponent>,
}

impl DefenderTrack {
    pub fn new(entries: Vec<TrackedOpponent>) -> Self {
        DefenderTrack { entries }
    }

    /// Goalkeeper first, then outfield defenders.
    pub fn with_goalkeeper(goalkeeper: Position, defenders: &[Position]) -> Self {
        let mut entries = Vec::with_capacity(defenders.len() + 1);
        entries.push(TrackedOpponent {
            position: goalkeeper,
            role: OpponentRole::Goalkeeper,
        });
        entries.extend(defenders.iter().map(|&position| TrackedOpponent {
            position,
            role: OpponentRole::Defender,
        }));
        DefenderTrack { entries }
    }

    pub fn entries(&self) -> &[TrackedOpponent] {
        &self.entries
    }

    /// The single goalkeeper, or a configuration error when there is none or
    /// more than one.
    pub fn goalkeeper(&self) -> Result<&TrackedOpponent> {
        let mut keepers = self
            .entries
            .iter()
            .filter(|e| e.role == OpponentRole::Goalkeeper);
        match (keepers.next(), keepers.next()) {
            (Some(gk), None) => Ok(gk),
            (None, _) => Err(AnalyticsError::config(
                "defender track has no goalkeeper",
            )),
            (Some(_), Some(_)) => Err(AnalyticsError::config(format!(
                "defender track has {} goalkeepers, expected exactly one",
                self.entries
                    .iter()
                    .filter(|e| e.role == OpponentRole::Goalkeeper)
                    .count()
            ))),
        }
    }

    pub fn defenders(&self) -> impl Iterator<Item = &TrackedOpponent> + '_ {
        self.entries
            .iter()
            .filter(|e| e.role == OpponentRole::Defender)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotFeatureVector {
    /// Raw shooter x.
    pub x0: f64,
    /// Distance from the goal line.
    pub x: f64,
    /// Lateral offset from the goal's centre line.
    pub c: f64,
    /// Subtended goal angle, degrees.
    pub angle: f64,
    pub distance: f64,
    pub gk_distance: f64,
    pub gk_distance_y: f64,
    pub gk_dist_to_goal: f64,
    pub close_players: u32,
    pub triangle: u32,
    pub is_closer: bool,
    pub header: bool,
}

impl ShotFeatureVector {
    /// Row in [`MODEL_INPUT_ORDER`].
    pub fn model_input(&self) -> [f64; 9] {
        [
            self.x0,
            flag(self.is_closer),
            self.angle,
            self.distance,
            self.gk_distance,
            self.gk_distance_y,
            self.triangle as f64,
            self.close_players as f64,
            flag(self.header),
        ]
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Build the feature vector for one shot.
pub fn extract_features(shot: &ShotSituation, track: &DefenderTrack) -> Result<ShotFeatureVector> {
    let shooter = shot.shooter;
    if !shooter.is_finite() {
        return Err(AnalyticsError::config("shooter position is not finite"));
    }
    if let Some(bad) = track.entries().iter().find(|e| !e.position.is_finite()) {
        return Err(AnalyticsError::config(format!(
            "{:?} position is not finite",
            bad.role
        )));
    }
    if !shooter.is_on_pitch() {
        return Err(AnalyticsError::config(format!(
            "shooter at ({}, {}) is off the pitch",
            shooter.x, shooter.y
        )));
    }
    if let Some(off) = track.entries().iter().find(|e| !e.position.is_on_pitch()) {
        return Err(AnalyticsError::config(format!(
            "{:?} at ({}, {}) is off the pitch",
            off.role, off.position.x, off.position.y
        )));
    }
    let keeper = track.goalkeeper()?.position;

    let x = GOAL_CENTER.x - shooter.x;
    let c = (GOAL_CENTER.y - shooter.y).abs();
    // On the goal line between or at the posts the goal mouth has no angle.
    if x <= 0.0 && c <= GOAL_WIDTH / 2.0 + POST_TOLERANCE {
        return Err(AnalyticsError::config(format!(
            "shooter at ({}, {}) is in the goal mouth",
            shooter.x, shooter.y
        )));
    }
    let angle = subtended_goal_angle(x, c);
    if !angle.is_finite() {
        return Err(AnalyticsError::config(format!(
            "no goal angle from ({}, {})",
            shooter.x, shooter.y
        )));
    }
    let dist = distance(Position::new(x, c), Position::new(0.0, 0.0));

    let gk_distance = distance(shooter, keeper);
    let gk_distance_y = (shooter.y - keeper.y).abs();
    let gk_dist_to_goal = distance(keeper, GOAL_CENTER);

    let close_players = track
        .defenders()
        .filter(|d| distance(shooter, d.position) < CLOSE_PLAYER_RADIUS)
        .count() as u32;

    let (near_post, far_post) = goal_posts();
    let triangle = track
        .defenders()
        .filter(|d| point_in_triangle(d.position, near_post, far_post, shooter))
        .count() as u32;

    Ok(ShotFeatureVector {
        x0: shooter.x,
        x,
        c,
        angle,
        distance: dist,
        gk_distance,
        gk_distance_y,
        gk_dist_to_goal,
        close_players,
        triangle,
        is_closer: gk_dist_to_goal > dist,
        header: shot.body_part == BodyPart::Head,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn central_shot() -> ShotSituation {
        ShotSituation::new(Position::new(89.0, 34.0), BodyPart::Foot)
    }

    #[test]
    fn penalty_spot_scenario_with_keeper_on_line() {
        let track = DefenderTrack::with_goalkeeper(Position::new(102.0, 34.0), &[]);
        let f = extract_features(&central_shot(), &track).unwrap();

        assert_relative_eq!(f.x0, 89.0);
        assert_relative_eq!(f.x, 16.0);
        assert_relative_eq!(f.c, 0.0);
        assert_relative_eq!(f.distance, 16.0);
        assert_relative_eq!(f.gk_dist_to_goal, 3.0);
        assert_relative_eq!(f.gk_distance, 13.0);
        assert_relative_eq!(f.gk_distance_y, 0.0);
        assert!(!f.is_closer);
        assert!(!f.header);
        assert_eq!(f.close_players, 0);
        assert_eq!(f.triangle, 0);

        let expected = (7.32_f64 * 16.0 / (16.0 * 16.0 - 3.66 * 3.66))
            .atan()
            .to_degrees();
        assert_relative_eq!(f.angle, expected, epsilon = 1e-12);
    }

    #[test]
    fn keeper_far_off_line_sets_is_closer() {
        let shot = ShotSituation::new(Position::new(100.0, 34.0), BodyPart::Head);
        let track = DefenderTrack::with_goalkeeper(Position::new(90.0, 34.0), &[]);
        let f = extract_features(&shot, &track).unwrap();
        assert!(f.is_closer);
        assert!(f.header);
    }

    #[test]
    fn defenders_counted_but_keeper_excluded() {
        // Keeper stands inside both the 3 m radius and the shooting triangle.
        let track = DefenderTrack::with_goalkeeper(
            Position::new(91.0, 34.0),
            &[
                Position::new(90.5, 34.1), // close, inside triangle
                Position::new(89.0, 36.5), // close, behind the shooter
                Position::new(100.0, 34.5), // in triangle only
                Position::new(70.0, 10.0), // nowhere near
            ],
        );
        let f = extract_features(&central_shot(), &track).unwrap();
        assert_eq!(f.close_players, 2);
        assert_eq!(f.triangle, 2);
        assert!(f.close_players as usize <= track.defenders().count());
    }

    #[test]
    fn missing_goalkeeper_is_configuration_error() {
        let track = DefenderTrack::new(vec![TrackedOpponent {
            position: Position::new(95.0, 34.0),
            role: OpponentRole::Defender,
        }]);
        assert!(matches!(
            extract_features(&central_shot(), &track),
            Err(AnalyticsError::Configuration(_))
        ));
    }

    #[test]
    fn duplicate_goalkeeper_is_configuration_error() {
        let keeper = TrackedOpponent {
            position: Position::new(104.0, 34.0),
            role: OpponentRole::Goalkeeper,
        };
        let track = DefenderTrack::new(vec![keeper, keeper]);
        let err = extract_features(&central_shot(), &track).unwrap_err();
        assert!(err.to_string().contains("2 goalkeepers"), "{}", err);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let shot = ShotSituation::new(Position::new(f64::NAN, 34.0), BodyPart::Foot);
        let track = DefenderTrack::with_goalkeeper(Position::new(102.0, 34.0), &[]);
        assert!(matches!(
            extract_features(&shot, &track),
            Err(AnalyticsError::Configuration(_))
        ));
    }

    #[test]
    fn shooter_off_the_pitch_is_rejected() {
        let track = DefenderTrack::with_goalkeeper(Position::new(104.0, 34.0), &[]);
        for shooter in [Position::new(112.0, 34.0), Position::new(90.0, -1.0)] {
            let shot = ShotSituation::new(shooter, BodyPart::Foot);
            assert!(matches!(
                extract_features(&shot, &track),
                Err(AnalyticsError::Configuration(_))
            ));
        }
    }

    #[test]
    fn opponent_off_the_pitch_is_rejected() {
        let track = DefenderTrack::with_goalkeeper(
            Position::new(104.0, 34.0),
            &[Position::new(95.0, 70.0)],
        );
        let err = extract_features(&central_shot(), &track).unwrap_err();
        assert!(err.to_string().contains("off the pitch"), "{}", err);
    }

    #[test]
    fn shooter_on_post_or_goal_line_is_rejected() {
        let track = DefenderTrack::with_goalkeeper(Position::new(104.0, 34.0), &[]);
        let (near_post, far_post) = goal_posts();
        for shooter in [near_post, far_post, Position::new(105.0, 34.0)] {
            let shot = ShotSituation::new(shooter, BodyPart::Foot);
            let err = extract_features(&shot, &track).unwrap_err();
            assert!(err.to_string().contains("goal mouth"), "{}", err);
        }
    }

    #[test]
    fn goal_line_wide_of_the_posts_has_zero_angle() {
        let shot = ShotSituation::new(Position::new(105.0, 20.0), BodyPart::Foot);
        let track = DefenderTrack::with_goalkeeper(Position::new(104.0, 34.0), &[]);
        let f = extract_features(&shot, &track).unwrap();
        assert_relative_eq!(f.angle, 0.0);
    }

    #[test]
    fn extraction_is_bit_identical_on_repeat() {
        let shot = ShotSituation::new(Position::new(93.7, 21.4), BodyPart::Foot);
        let track = DefenderTrack::with_goalkeeper(
            Position::new(103.1, 31.9),
            &[Position::new(95.0, 25.0), Position::new(99.2, 29.3)],
        );
        let a = extract_features(&shot, &track).unwrap().model_input();
        let b = extract_features(&shot, &track).unwrap().model_input();
        for (l, r) in a.iter().zip(b.iter()) {
            assert_eq!(l.to_bits(), r.to_bits());
        }
    }

    #[test]
    fn model_input_follows_declared_order() {
        let track = DefenderTrack::with_goalkeeper(
            Position::new(102.0, 34.0),
            &[Position::new(95.0, 34.0)],
        );
        let shot = ShotSituation::new(Position::new(89.0, 34.0), BodyPart::Head);
        let f = extract_features(&shot, &track).unwrap();
        let row = f.model_input();
        assert_eq!(row.len(), MODEL_INPUT_ORDER.len());
        assert_relative_eq!(row[0], f.x0);
        assert_relative_eq!(row[2], f.angle);
        assert_relative_eq!(row[3], f.distance);
        assert_relative_eq!(row[6], 1.0); // triangle
        assert_relative_eq!(row[7], 0.0); // close_players
        assert_relative_eq!(row[8], 1.0); // header
    }

    #[test]
    fn body_part_names() {
        assert_eq!(BodyPart::from_name("Head"), BodyPart::Head);
        assert_eq!(BodyPart::from_name("Right Foot"), BodyPart::Foot);
        assert_eq!(BodyPart::from_name("Foot"), BodyPart::Foot);
    }
}
