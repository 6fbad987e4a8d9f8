// src/config/mod.rs

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// File looked up (without extension) next to the working directory.
pub const SETTINGS_FILE: &str = "cornerbot";
/// Prefix for environment overrides, e.g. `CORNERBOT__SIMULATOR__BASE_URL`.
pub const ENV_PREFIX: &str = "CORNERBOT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid mission tuning: {0}")]
    Invalid(String),
    #[error("could not load settings: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Where the simulator lives and how long calls may take.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub base_url: String,
    pub move_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            move_timeout_ms: 100,
            request_timeout_ms: 2000,
        }
    }
}

impl SimulatorConfig {
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn move_timeout(&self) -> Duration {
        Duration::from_millis(self.move_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Immutable tuning of one mission. Times are in seconds, angles in degrees.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub forward_speed: f64,
    /// Largest turn a single seek cycle may issue.
    pub turn_speed: f64,
    /// Distance reversed at the start of an escape; applied as a negative move.
    pub backup_distance: f64,
    pub escape_turn_min: f64,
    pub escape_turn_max: f64,
    pub run_duration_secs: f64,
    pub poll_period_secs: f64,
    pub settle_secs: f64,
    pub goal_settle_secs: f64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            forward_speed: 25.0,
            turn_speed: 25.0,
            backup_distance: -25.0,
            escape_turn_min: 120.0,
            escape_turn_max: 180.0,
            run_duration_secs: 90.0,
            poll_period_secs: 0.3,
            settle_secs: 0.4,
            goal_settle_secs: 1.0,
        }
    }
}

impl MissionConfig {
    pub fn with_run_duration(mut self, secs: f64) -> Self {
        self.run_duration_secs = secs;
        self
    }

    pub fn with_poll_period(mut self, secs: f64) -> Self {
        self.poll_period_secs = secs;
        self
    }

    pub fn with_settle(mut self, secs: f64) -> Self {
        self.settle_secs = secs;
        self
    }

    pub fn with_goal_settle(mut self, secs: f64) -> Self {
        self.goal_settle_secs = secs;
        self
    }

    pub fn with_speeds(mut self, forward: f64, turn: f64) -> Self {
        self.forward_speed = forward;
        self.turn_speed = turn;
        self
    }

    pub fn with_escape_turn(mut self, min: f64, max: f64) -> Self {
        self.escape_turn_min = min;
        self.escape_turn_max = max;
        self
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_secs_f64(self.run_duration_secs)
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_secs_f64(self.poll_period_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs_f64(self.settle_secs)
    }

    pub fn goal_settle(&self) -> Duration {
        Duration::from_secs_f64(self.goal_settle_secs)
    }

    /// Rejects tunings the controller cannot run with. Must pass before any
    /// of the `Duration` accessors are used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("forward_speed", self.forward_speed),
            ("turn_speed", self.turn_speed),
            ("backup_distance", self.backup_distance),
            ("escape_turn_min", self.escape_turn_min),
            ("escape_turn_max", self.escape_turn_max),
            ("run_duration_secs", self.run_duration_secs),
            ("poll_period_secs", self.poll_period_secs),
            ("settle_secs", self.settle_secs),
            ("goal_settle_secs", self.goal_settle_secs),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }
        if self.turn_speed < 0.0 {
            return Err(ConfigError::Invalid("turn_speed must not be negative".into()));
        }
        if self.escape_turn_min >= self.escape_turn_max {
            return Err(ConfigError::Invalid(format!(
                "escape turn range [{}, {}) is empty",
                self.escape_turn_min, self.escape_turn_max
            )));
        }
        if self.run_duration_secs <= 0.0 || self.poll_period_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "run_duration_secs and poll_period_secs must be positive".into(),
            ));
        }
        if self.settle_secs < 0.0 || self.goal_settle_secs < 0.0 {
            return Err(ConfigError::Invalid("settle delays must not be negative".into()));
        }
        let durations = [
            ("run_duration_secs", self.run_duration_secs),
            ("poll_period_secs", self.poll_period_secs),
            ("settle_secs", self.settle_secs),
            ("goal_settle_secs", self.goal_settle_secs),
        ];
        for (name, secs) in durations {
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::Invalid(format!("{name} is out of range: {secs}")));
            }
        }
        Ok(())
    }
}

/// Everything the binary needs, loaded from `cornerbot.toml` and the environment.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulator: SimulatorConfig,
    pub mission: MissionConfig,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = ::config::Config::builder()
            .add_source(::config::File::with_name(SETTINGS_FILE).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.mission.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_tuning() {
        let cfg = MissionConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.run_duration(), Duration::from_secs(90));
        assert_eq!(cfg.poll_period(), Duration::from_millis(300));
        assert_eq!(cfg.settle(), Duration::from_millis(400));
        assert_eq!(SimulatorConfig::default().move_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_rejects_bad_tunings() {
        let empty_range = MissionConfig::default().with_escape_turn(180.0, 120.0);
        assert!(matches!(empty_range.validate(), Err(ConfigError::Invalid(_))));

        let no_period = MissionConfig::default().with_poll_period(0.0);
        assert!(no_period.validate().is_err());

        let nan_speed = MissionConfig::default().with_speeds(f64::NAN, 25.0);
        assert!(nan_speed.validate().is_err());

        let negative_turn = MissionConfig::default().with_speeds(25.0, -1.0);
        assert!(negative_turn.validate().is_err());
    }

    #[test]
    fn test_rejects_durations_too_large_for_duration() {
        let huge_run = MissionConfig::default().with_run_duration(1e30);
        assert!(matches!(
            huge_run.validate(),
            Err(ConfigError::Invalid(msg)) if msg.contains("run_duration_secs")
        ));

        let huge_settle = MissionConfig::default().with_settle(1e25);
        assert!(huge_settle.validate().is_err());

        let long_but_valid = MissionConfig::default().with_run_duration(86_400.0);
        assert!(long_but_valid.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "simulator": { "base_url": "http://sim:8080" },
                "mission": { "run_duration_secs": 30 }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.simulator.base_url, "http://sim:8080");
        assert_eq!(settings.simulator.move_timeout_ms, 100);
        assert_eq!(settings.mission.run_duration_secs, 30.0);
        assert_eq!(settings.mission.forward_speed, 25.0);
    }
}
