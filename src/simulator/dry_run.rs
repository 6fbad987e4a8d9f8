// src/simulator/dry_run.rs

use crate::model::{CollisionReading, GoalCorner, MotionCommand};
use crate::simulator::{CallOutcome, SimError, Simulator};
use std::collections::VecDeque;

/// A call the dry-run simulator received.
#[derive(Clone, Debug, PartialEq)]
pub enum SimCall {
    Reset,
    PlaceGoal(GoalCorner),
    Move(MotionCommand),
    ReadCollisions,
    ObstacleMotion { enabled: bool, speed: f64 },
}

/// In-process stand-in for the arena simulator.
///
/// Accepts every command, records it, and answers collision reads from a
/// script. Once the script runs out the last answer repeats.
#[derive(Debug, Clone)]
pub struct DryRunSimulator {
    readings: VecDeque<CollisionReading>,
    last: CollisionReading,
    calls: Vec<SimCall>,
    reject_commands: bool,
}

impl DryRunSimulator {
    pub fn new() -> Self {
        Self {
            readings: VecDeque::new(),
            last: CollisionReading::Count(0),
            calls: Vec::new(),
            reject_commands: false,
        }
    }

    pub fn with_readings<I: IntoIterator<Item = CollisionReading>>(readings: I) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Answers every command call with a soft failure, as an unreachable
    /// simulator would.
    pub fn rejecting_commands(mut self) -> Self {
        self.reject_commands = true;
        self
    }

    pub fn calls(&self) -> &[SimCall] {
        &self.calls
    }

    pub fn moves(&self) -> Vec<MotionCommand> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SimCall::Move(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    fn command(&mut self, call: SimCall, path: &'static str) -> CallOutcome {
        self.calls.push(call);
        if self.reject_commands {
            CallOutcome::SoftFailure(SimError::Transport {
                path,
                reason: "dry run rejecting commands".into(),
            })
        } else {
            CallOutcome::Delivered
        }
    }
}

impl Default for DryRunSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator for DryRunSimulator {
    fn place_goal(&mut self, corner: GoalCorner) -> CallOutcome {
        self.command(SimCall::PlaceGoal(corner), "/goal")
    }

    fn reset(&mut self) -> CallOutcome {
        self.command(SimCall::Reset, "/reset")
    }

    fn move_relative(&mut self, command: MotionCommand) -> CallOutcome {
        self.command(SimCall::Move(command), "/move_rel")
    }

    fn collision_count(&mut self) -> CollisionReading {
        self.calls.push(SimCall::ReadCollisions);
        if let Some(reading) = self.readings.pop_front() {
            self.last = reading;
        }
        self.last
    }

    fn set_obstacle_motion(&mut self, enabled: bool, speed: f64) -> CallOutcome {
        self.command(SimCall::ObstacleMotion { enabled, speed }, "/obstacles/motion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_repeat_last() {
        let mut sim = DryRunSimulator::with_readings([
            CollisionReading::Count(1),
            CollisionReading::Unknown,
        ]);
        assert_eq!(sim.collision_count(), CollisionReading::Count(1));
        assert_eq!(sim.collision_count(), CollisionReading::Unknown);
        assert_eq!(sim.collision_count(), CollisionReading::Unknown);
        assert_eq!(sim.calls().len(), 3);
    }

    #[test]
    fn test_rejecting_still_records() {
        let mut sim = DryRunSimulator::new().rejecting_commands();
        let outcome = sim.move_relative(MotionCommand::forward(25.0));
        assert!(!outcome.is_delivered());
        assert_eq!(sim.moves(), vec![MotionCommand::forward(25.0)]);
    }
}
