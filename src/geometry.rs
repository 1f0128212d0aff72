//! Pitch geometry primitives.
//!
//! Coordinates are metres on a 105 × 68 pitch with the origin at one corner.
//! The attacked goal sits on the line `x = 105`, centred at `y = 34`.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

pub const PITCH_LENGTH: f64 = 105.0;
pub const PITCH_WIDTH: f64 = 68.0;
/// Distance between the posts.
pub const GOAL_WIDTH: f64 = 7.32;
pub const GOAL_CENTER: Position = Position {
    x: PITCH_LENGTH,
    y: PITCH_WIDTH / 2.0,
};

/// Below this absolute doubled area a triangle is treated as collinear.
const DEGENERATE_AREA_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn is_on_pitch(&self) -> bool {
        (0.0..=PITCH_LENGTH).contains(&self.x) && (0.0..=PITCH_WIDTH).contains(&self.y)
    }
}

/// The two posts of the attacked goal, lower `y` first.
pub fn goal_posts() -> (Position, Position) {
    let half = GOAL_WIDTH / 2.0;
    (
        Position::new(GOAL_CENTER.x, GOAL_CENTER.y - half),
        Position::new(GOAL_CENTER.x, GOAL_CENTER.y + half),
    )
}

/// Euclidean distance between two points.
pub fn distance(a: Position, b: Position) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Angle in degrees subtended by the goal mouth from a point `x` metres off
/// the goal line and `c` metres off the goal's centre line.
///
/// The arctangent folds negative for points inside the circle through both
/// posts; adding π there keeps the result in [0°, 180°].
pub fn subtended_goal_angle(x: f64, c: f64) -> f64 {
    let half = GOAL_WIDTH / 2.0;
    let raw = (GOAL_WIDTH * x / (x * x + c * c - half * half)).atan();
    let radians = if raw < 0.0 {
        raw + std::f64::consts::PI
    } else {
        raw
    };
    radians.to_degrees()
}

/// Sign-of-cross-product membership test.
///
/// Strict: a point exactly on an edge is outside. A collinear triangle
/// contains nothing, since the three cross products then sum to zero.
pub fn point_in_triangle(p: Position, t1: Position, t2: Position, t3: Position) -> bool {
    let c1 = cross(t1, t2, p);
    let c2 = cross(t2, t3, p);
    let c3 = cross(t3, t1, p);
    (c1 < 0.0 && c2 < 0.0 && c3 < 0.0) || (c1 > 0.0 && c2 > 0.0 && c3 > 0.0)
}

/// Like [`point_in_triangle`], but rejects collinear reference points.
pub fn point_in_triangle_strict(
    p: Position,
    t1: Position,
    t2: Position,
    t3: Position,
) -> Result<bool> {
    if cross(t1, t2, t3).abs() < DEGENERATE_AREA_EPS {
        return Err(AnalyticsError::DegenerateGeometry(format!(
            "triangle ({:.2}, {:.2}), ({:.2}, {:.2}), ({:.2}, {:.2}) is collinear",
            t1.x, t1.y, t2.x, t2.y, t3.x, t3.y
        )));
    }
    Ok(point_in_triangle(p, t1, t2, t3))
}

// (b − a) × (p − a)
fn cross(a: Position, b: Position, p: Position) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
