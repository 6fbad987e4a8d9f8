// src/mission/controller.rs

use crate::config::{ConfigError, MissionConfig};
use crate::mission::{Clock, FastrandTurns, SystemClock, TurnSource};
use crate::mission::{Mode, decide_mode, refresh_baseline, seek_command};
use crate::model::{
    CollisionReading, GoalCorner, Heading, MissionResult, MotionCommand, ParseCornerError,
};
use crate::simulator::{CallOutcome, Simulator};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Drives one mission at a time against a simulator.
///
/// All tuning comes from the `MissionConfig` given at construction; the
/// heading estimate and collision baseline live only for the duration of
/// a single `run`.
pub struct MissionController<S, C = SystemClock, R = FastrandTurns> {
    config: MissionConfig,
    simulator: S,
    clock: C,
    turns: R,
    stop: Option<Arc<AtomicBool>>,
}

/// Per-run bookkeeping, dropped when the run returns.
struct RunState {
    target: Heading,
    heading: Heading,
    baseline: Option<u32>,
    escapes: u32,
    seeks: u32,
}

impl<S: Simulator> MissionController<S> {
    /// Controller on the wall clock with an unseeded escape-turn source.
    pub fn with_system_clock(config: MissionConfig, simulator: S) -> Result<Self, ConfigError> {
        Self::new(config, simulator, SystemClock::new(), FastrandTurns::new())
    }
}

impl<S, C, R> MissionController<S, C, R>
where
    S: Simulator,
    C: Clock,
    R: TurnSource,
{
    pub fn new(
        config: MissionConfig,
        simulator: S,
        clock: C,
        turns: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            simulator,
            clock,
            turns,
            stop: None,
        })
    }

    /// Lets another thread end the current mission early. The stop command
    /// and final read are still issued.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Passthrough for the orchestration layer.
    pub fn set_obstacle_motion(&mut self, enabled: bool, speed: f64) -> CallOutcome {
        self.simulator.set_obstacle_motion(enabled, speed)
    }

    /// Parses `label` first so a bad corner is rejected before the simulator
    /// is touched.
    pub fn run_label(&mut self, label: &str) -> Result<MissionResult, ParseCornerError> {
        let corner: GoalCorner = label.parse()?;
        Ok(self.run(corner))
    }

    /// Runs one timed mission toward `corner` and returns the final count.
    pub fn run(&mut self, corner: GoalCorner) -> MissionResult {
        note_soft_failure(self.simulator.reset(), "reset");
        note_soft_failure(self.simulator.place_goal(corner), "place goal");
        self.clock.sleep(self.config.goal_settle());

        let mut state = RunState {
            target: corner.target_heading(),
            heading: Heading::ZERO,
            baseline: self.simulator.collision_count().count(),
            escapes: 0,
            seeks: 0,
        };
        info!(%corner, target = %state.target, baseline = ?state.baseline, "mission started");

        let start = self.clock.now();
        let run_duration = self.config.run_duration();
        while self.clock.now().saturating_sub(start) < run_duration && !self.stop_requested() {
            self.cycle(&mut state);
        }

        self.issue(MotionCommand::stop());
        let collisions = self.simulator.collision_count();
        if collisions == CollisionReading::Unknown {
            warn!(%corner, "final collision count unavailable");
        }
        info!(%corner, %collisions, escapes = state.escapes, "mission finished");

        MissionResult {
            corner,
            collisions,
            escapes: state.escapes,
            seeks: state.seeks,
        }
    }

    fn cycle(&mut self, state: &mut RunState) {
        let current = self.simulator.collision_count();

        match decide_mode(current, state.baseline) {
            Mode::Escaping => {
                info!(count = %current, baseline = ?state.baseline, "collision, escaping");
                self.escape(state);
                state.escapes += 1;
            }
            Mode::Seeking => {
                let command = seek_command(state.heading, state.target, &self.config);
                debug!(
                    heading = %state.heading,
                    target = %state.target,
                    turn = command.turn,
                    "seeking"
                );
                self.issue(command);
                state.heading = state.heading.turned_by(command.turn);
                state.seeks += 1;
            }
        }

        // Second read so a hit during this cycle shows up as a delta next cycle.
        state.baseline = refresh_baseline(state.baseline, self.simulator.collision_count());
        self.clock.sleep(self.config.poll_period());
    }

    fn escape(&mut self, state: &mut RunState) {
        let settle = self.config.settle();

        self.issue(MotionCommand::reverse(self.config.backup_distance));
        self.clock.sleep(settle);

        let turn = self
            .turns
            .uniform(self.config.escape_turn_min, self.config.escape_turn_max);
        debug!(turn, "random escape turn");
        self.issue(MotionCommand::turn_only(turn));
        state.heading = state.heading.turned_by(turn);
        self.clock.sleep(settle);

        self.issue(MotionCommand::forward(self.config.forward_speed));
        self.clock.sleep(settle);
    }

    /// Sends a move. The heading estimate is advanced by the caller whether or
    /// not delivery succeeded. Non-finite commands are never sent.
    fn issue(&mut self, command: MotionCommand) {
        if !command.is_finite() {
            warn!(turn = command.turn, distance = command.distance, "skipping non-finite move");
            return;
        }
        match self.simulator.move_relative(command) {
            CallOutcome::Delivered => {}
            CallOutcome::SoftFailure(err) => {
                debug!(
                    %err,
                    turn = command.turn,
                    distance = command.distance,
                    "move not confirmed, proceeding"
                );
            }
        }
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

fn note_soft_failure(outcome: CallOutcome, what: &str) {
    if let CallOutcome::SoftFailure(err) = outcome {
        warn!(%err, "{what} failed, continuing mission");
    }
}
