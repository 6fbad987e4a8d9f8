// src/model/corner.rs

use crate::model::Heading;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the four arena corners a goal can be placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCorner {
    NE,
    NW,
    SE,
    SW,
}

impl GoalCorner {
    /// Corners in the order a full level visits them.
    pub const ALL: [GoalCorner; 4] = [
        GoalCorner::NE,
        GoalCorner::NW,
        GoalCorner::SE,
        GoalCorner::SW,
    ];

    /// Label understood by the simulator's `/goal` endpoint.
    pub fn label(self) -> &'static str {
        match self {
            GoalCorner::NE => "NE",
            GoalCorner::NW => "NW",
            GoalCorner::SE => "SE",
            GoalCorner::SW => "SW",
        }
    }

    /// Fixed heading from the arena start pose toward this corner.
    pub fn target_heading(self) -> Heading {
        let degrees = match self {
            GoalCorner::NE => 45.0,
            GoalCorner::NW => 315.0,
            GoalCorner::SE => 135.0,
            GoalCorner::SW => 225.0,
        };
        Heading::new(degrees)
    }
}

impl fmt::Display for GoalCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown goal corner '{0}', expected one of NE, NW, SE, SW")]
pub struct ParseCornerError(pub String);

impl FromStr for GoalCorner {
    type Err = ParseCornerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NE" => Ok(GoalCorner::NE),
            "NW" => Ok(GoalCorner::NW),
            "SE" => Ok(GoalCorner::SE),
            "SW" => Ok(GoalCorner::SW),
            _ => Err(ParseCornerError(s.to_string())),
        }
    }
}
