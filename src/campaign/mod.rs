// src/campaign/mod.rs

use crate::mission::{Clock, MissionController, TurnSource};
use crate::model::{GoalCorner, MissionResult};
use crate::simulator::{CallOutcome, Simulator};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Obstacle speed used when motion is off or not otherwise given.
pub const DEFAULT_OBSTACLE_SPEED: f64 = 0.05;
pub const SWEEP_SPEEDS: [f64; 5] = [0.02, 0.04, 0.06, 0.08, 0.10];

/// A challenge level: which obstacle settings to run all four corners under.
#[derive(Clone, Debug, PartialEq)]
pub enum Level {
    Static,
    Moving { speed: f64 },
    SpeedSweep { speeds: Vec<f64> },
}

impl Level {
    pub fn moving() -> Self {
        Level::Moving {
            speed: DEFAULT_OBSTACLE_SPEED,
        }
    }

    pub fn sweep() -> Self {
        Level::SpeedSweep {
            speeds: SWEEP_SPEEDS.to_vec(),
        }
    }

    /// `(enabled, speed)` settings, one batch of corner runs each.
    fn batches(&self) -> Vec<(bool, f64)> {
        match self {
            Level::Static => vec![(false, DEFAULT_OBSTACLE_SPEED)],
            Level::Moving { speed } => vec![(true, *speed)],
            Level::SpeedSweep { speeds } => speeds.iter().map(|s| (true, *s)).collect(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Static => f.write_str("level 1: static obstacles"),
            Level::Moving { speed } => write!(f, "level 2: moving obstacles at {speed:.2}"),
            Level::SpeedSweep { speeds } => {
                write!(f, "level 3: speed sweep over {} speeds", speeds.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level '{0}', expected level1, level2 or level3")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "1" | "level1" => Ok(Level::Static),
            "2" | "level2" => Ok(Level::moving()),
            "3" | "level3" => Ok(Level::sweep()),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Sentinel-safe aggregate of several missions.
///
/// Runs whose final count is unknown are left out of the total and the
/// average; they are only counted in `unknown_runs`.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionSummary {
    pub runs: usize,
    pub unknown_runs: usize,
    pub total: u64,
    pub average: Option<f64>,
}

impl CollisionSummary {
    pub fn from_results(results: &[MissionResult]) -> Self {
        let counts: Vec<u32> = results.iter().filter_map(|r| r.collisions.count()).collect();
        let total: u64 = counts.iter().map(|&c| u64::from(c)).sum();
        let average = (!counts.is_empty()).then(|| total as f64 / counts.len() as f64);

        Self {
            runs: results.len(),
            unknown_runs: results.len() - counts.len(),
            total,
            average,
        }
    }
}

/// All corner runs under one obstacle setting.
#[derive(Clone, Debug)]
pub struct Batch {
    pub obstacles_moving: bool,
    pub obstacle_speed: f64,
    pub results: Vec<MissionResult>,
    pub summary: CollisionSummary,
}

#[derive(Clone, Debug)]
pub struct LevelReport {
    pub level: Level,
    pub batches: Vec<Batch>,
}

impl LevelReport {
    /// Summary over every run of every batch.
    pub fn overall(&self) -> CollisionSummary {
        let all: Vec<MissionResult> = self
            .batches
            .iter()
            .flat_map(|b| b.results.iter().cloned())
            .collect();
        CollisionSummary::from_results(&all)
    }
}

/// Runs every corner, one after another, for each obstacle setting of `level`.
pub fn run_level<S, C, R>(controller: &mut MissionController<S, C, R>, level: &Level) -> LevelReport
where
    S: Simulator,
    C: Clock,
    R: TurnSource,
{
    info!(%level, "starting level");
    let batches = level
        .batches()
        .into_iter()
        .map(|(enabled, speed)| run_batch(controller, enabled, speed, &GoalCorner::ALL))
        .collect();

    LevelReport {
        level: level.clone(),
        batches,
    }
}

/// Runs `corners` in order with the given obstacle setting.
pub fn run_batch<S, C, R>(
    controller: &mut MissionController<S, C, R>,
    obstacles_moving: bool,
    obstacle_speed: f64,
    corners: &[GoalCorner],
) -> Batch
where
    S: Simulator,
    C: Clock,
    R: TurnSource,
{
    let outcome = controller.set_obstacle_motion(obstacles_moving, obstacle_speed);
    if let CallOutcome::SoftFailure(err) = outcome {
        warn!(%err, "could not set obstacle motion, running anyway");
    }

    let mut results = Vec::with_capacity(corners.len());
    for (i, corner) in corners.iter().enumerate() {
        info!(run = i + 1, of = corners.len(), %corner, "starting run");
        results.push(controller.run(*corner));
    }

    let summary = CollisionSummary::from_results(&results);
    info!(
        obstacles_moving,
        obstacle_speed,
        average = ?summary.average,
        unknown_runs = summary.unknown_runs,
        "batch complete"
    );

    Batch {
        obstacles_moving,
        obstacle_speed,
        results,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CollisionReading;

    fn result(corner: GoalCorner, collisions: CollisionReading) -> MissionResult {
        MissionResult {
            corner,
            collisions,
            escapes: 0,
            seeks: 0,
        }
    }

    #[test]
    fn test_summary_skips_unknown_runs() {
        let results = [
            result(GoalCorner::NE, CollisionReading::Count(2)),
            result(GoalCorner::NW, CollisionReading::Unknown),
            result(GoalCorner::SE, CollisionReading::Count(4)),
            result(GoalCorner::SW, CollisionReading::Count(0)),
        ];
        let summary = CollisionSummary::from_results(&results);
        assert_eq!(summary.runs, 4);
        assert_eq!(summary.unknown_runs, 1);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.average, Some(2.0));
    }

    #[test]
    fn test_summary_all_unknown_has_no_average() {
        let results = [result(GoalCorner::NE, CollisionReading::Unknown)];
        let summary = CollisionSummary::from_results(&results);
        assert_eq!(summary.average, None);
        assert_eq!(summary.total, 0);
        assert_eq!(CollisionSummary::from_results(&[]).average, None);
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("level1".parse::<Level>(), Ok(Level::Static));
        assert_eq!("LEVEL_2".parse::<Level>(), Ok(Level::moving()));
        assert_eq!("3".parse::<Level>(), Ok(Level::sweep()));
        assert!("level4".parse::<Level>().is_err());
    }

    #[test]
    fn test_batches_per_level() {
        assert_eq!(Level::Static.batches(), vec![(false, DEFAULT_OBSTACLE_SPEED)]);
        assert_eq!(Level::moving().batches(), vec![(true, 0.05)]);
        assert_eq!(Level::sweep().batches().len(), 5);
    }
}
