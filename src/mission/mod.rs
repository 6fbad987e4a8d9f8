// src/mission/mod.rs

use crate::config::MissionConfig;
use crate::model::{CollisionReading, Heading, MotionCommand};

pub mod clock;
pub mod controller;
pub mod random;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::MissionController;
pub use random::{FastrandTurns, FixedTurns, TurnSource};

/// What the controller does during one poll cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Seeking,
    Escaping,
}

/// Escapes only when a real reading is strictly above a real baseline.
/// An unknown reading, or no baseline yet, always means keep seeking.
pub fn decide_mode(current: CollisionReading, baseline: Option<u32>) -> Mode {
    match (current, baseline) {
        (CollisionReading::Count(now), Some(before)) if now > before => Mode::Escaping,
        _ => Mode::Seeking,
    }
}

/// New baseline after the end-of-cycle read. Failed reads keep the last
/// valid baseline.
pub fn refresh_baseline(baseline: Option<u32>, reading: CollisionReading) -> Option<u32> {
    reading.count().or(baseline)
}

/// The one move a seek cycle issues: the shortest rotation toward `target`,
/// limited to `config.turn_speed`, at the standard forward speed.
pub fn seek_command(heading: Heading, target: Heading, config: &MissionConfig) -> MotionCommand {
    let limit = config.turn_speed.abs();
    let turn = heading.error_to(target).clamp(-limit, limit);
    MotionCommand::new(turn, config.forward_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GoalCorner;

    #[test]
    fn test_rising_count_escapes() {
        assert_eq!(decide_mode(CollisionReading::Count(3), Some(2)), Mode::Escaping);
        assert_eq!(decide_mode(CollisionReading::Count(2), Some(2)), Mode::Seeking);
        assert_eq!(decide_mode(CollisionReading::Count(1), Some(2)), Mode::Seeking);
    }

    #[test]
    fn test_unknown_never_escapes() {
        assert_eq!(decide_mode(CollisionReading::Unknown, Some(0)), Mode::Seeking);
        assert_eq!(decide_mode(CollisionReading::Unknown, None), Mode::Seeking);
        assert_eq!(decide_mode(CollisionReading::Count(9), None), Mode::Seeking);
    }

    #[test]
    fn test_failed_refresh_keeps_baseline() {
        assert_eq!(refresh_baseline(Some(4), CollisionReading::Unknown), Some(4));
        assert_eq!(refresh_baseline(Some(4), CollisionReading::Count(5)), Some(5));
        assert_eq!(refresh_baseline(None, CollisionReading::Unknown), None);
    }

    #[test]
    fn test_first_seek_toward_ne() {
        let cfg = MissionConfig::default();
        let cmd = seek_command(Heading::ZERO, GoalCorner::NE.target_heading(), &cfg);
        assert_eq!(cmd, MotionCommand::new(25.0, 25.0));
    }

    #[test]
    fn test_small_error_is_not_clamped() {
        let cfg = MissionConfig::default();
        let cmd = seek_command(Heading::new(40.0), Heading::new(45.0), &cfg);
        assert_eq!(cmd.turn, 5.0);

        let cmd = seek_command(Heading::ZERO, GoalCorner::NW.target_heading(), &cfg);
        assert_eq!(cmd.turn, -25.0);
    }

    #[test]
    fn test_clamp_never_grows_error() {
        let cfg = MissionConfig::default();
        for current in (0..360).step_by(5) {
            for corner in GoalCorner::ALL {
                let heading = Heading::new(current as f64);
                let target = corner.target_heading();
                let error = heading.error_to(target);
                let cmd = seek_command(heading, target, &cfg);
                assert!(cmd.turn.abs() <= error.abs());
                assert!(cmd.turn.abs() <= cfg.turn_speed);
                assert!(cmd.turn > -180.0 && cmd.turn <= 180.0);
            }
        }
    }
}
