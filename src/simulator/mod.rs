// src/simulator/mod.rs

use crate::model::{CollisionReading, GoalCorner, MotionCommand};
use thiserror::Error;

pub mod dry_run;
pub mod http;

pub use dry_run::{DryRunSimulator, SimCall};
pub use http::HttpSimulator;

/// Why a best-effort simulator call did not go through.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("request to {path} timed out")]
    Timeout { path: &'static str },
    #[error("request to {path} failed: {reason}")]
    Transport { path: &'static str, reason: String },
    #[error("{path} answered with HTTP {status}")]
    Status { path: &'static str, status: u16 },
    #[error("malformed response from {path}: {reason}")]
    Decode { path: &'static str, reason: String },
}

/// Result of a fire-and-forget simulator call.
///
/// A `SoftFailure` never aborts a mission; callers decide whether to log it
/// and then carry on as if the call had no effect.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Delivered,
    SoftFailure(SimError),
}

impl CallOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, CallOutcome::Delivered)
    }

    pub fn error(&self) -> Option<&SimError> {
        match self {
            CallOutcome::Delivered => None,
            CallOutcome::SoftFailure(err) => Some(err),
        }
    }
}

impl From<Result<(), SimError>> for CallOutcome {
    fn from(result: Result<(), SimError>) -> Self {
        match result {
            Ok(()) => CallOutcome::Delivered,
            Err(err) => CallOutcome::SoftFailure(err),
        }
    }
}

/// The remote arena simulator, seen as five best-effort operations.
///
/// None of these may block the control loop for long or fail hard: the
/// simulator is an unreliable peer and the loop's liveness comes first.
pub trait Simulator {
    fn place_goal(&mut self, corner: GoalCorner) -> CallOutcome;
    fn reset(&mut self) -> CallOutcome;
    fn move_relative(&mut self, command: MotionCommand) -> CallOutcome;
    /// Current collision counter, or `Unknown` on any failure.
    fn collision_count(&mut self) -> CollisionReading;
    fn set_obstacle_motion(&mut self, enabled: bool, speed: f64) -> CallOutcome;
}

impl<S: Simulator + ?Sized> Simulator for &mut S {
    fn place_goal(&mut self, corner: GoalCorner) -> CallOutcome {
        (**self).place_goal(corner)
    }

    fn reset(&mut self) -> CallOutcome {
        (**self).reset()
    }

    fn move_relative(&mut self, command: MotionCommand) -> CallOutcome {
        (**self).move_relative(command)
    }

    fn collision_count(&mut self) -> CollisionReading {
        (**self).collision_count()
    }

    fn set_obstacle_motion(&mut self, enabled: bool, speed: f64) -> CallOutcome {
        (**self).set_obstacle_motion(enabled, speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_result() {
        assert!(CallOutcome::from(Ok(())).is_delivered());

        let outcome = CallOutcome::from(Err(SimError::Timeout { path: "/move_rel" }));
        assert!(!outcome.is_delivered());
        assert_eq!(
            outcome.error().map(ToString::to_string),
            Some("request to /move_rel timed out".to_string())
        );
    }
}
