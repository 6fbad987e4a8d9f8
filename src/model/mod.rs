// src/model/mod.rs

use serde::Serialize;
use std::fmt;

pub mod corner;
pub mod heading;

pub use corner::{GoalCorner, ParseCornerError};
pub use heading::Heading;

/// A relative turn-then-move request. Distance is signed, forward positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MotionCommand {
    pub turn: f64,
    pub distance: f64,
}

impl MotionCommand {
    pub fn new(turn: f64, distance: f64) -> Self {
        Self { turn, distance }
    }

    pub fn reverse(distance: f64) -> Self {
        Self::new(0.0, -distance.abs())
    }

    pub fn turn_only(turn: f64) -> Self {
        Self::new(turn, 0.0)
    }

    pub fn forward(distance: f64) -> Self {
        Self::new(0.0, distance)
    }

    pub fn stop() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.turn.is_finite() && self.distance.is_finite()
    }
}

/// A snapshot of the simulator's collision counter.
///
/// `Unknown` stands for a failed read. It is kept apart from `Count(0)` so it
/// can never end up in a sum or an average.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionReading {
    Count(u32),
    Unknown,
}

impl CollisionReading {
    pub const SENTINEL: i64 = -1;

    pub fn count(self) -> Option<u32> {
        match self {
            CollisionReading::Count(n) => Some(n),
            CollisionReading::Unknown => None,
        }
    }

    /// Integer form used at the orchestration boundary: `-1` when unknown.
    pub fn to_sentinel(self) -> i64 {
        self.count().map_or(Self::SENTINEL, i64::from)
    }

    pub fn from_sentinel(value: i64) -> Self {
        u32::try_from(value).map_or(CollisionReading::Unknown, CollisionReading::Count)
    }
}

impl fmt::Display for CollisionReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionReading::Count(n) => write!(f, "{n}"),
            CollisionReading::Unknown => f.write_str("unknown"),
        }
    }
}

/// Outcome of one finished mission. Built once when the loop exits.
#[derive(Clone, Debug, PartialEq)]
pub struct MissionResult {
    pub corner: GoalCorner,
    pub collisions: CollisionReading,
    pub escapes: u32,
    pub seeks: u32,
}

impl MissionResult {
    /// Final collision count, or `-1` when the last read failed.
    pub fn final_collision_count(&self) -> i64 {
        self.collisions.to_sentinel()
    }

    pub fn summary(&self) -> String {
        format!(
            "Goal: {}\nCollisions: {}\nCycles: {} seeking, {} escaping",
            self.corner, self.collisions, self.seeks, self.escapes
        )
    }
}
