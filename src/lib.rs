// src/lib.rs

pub mod campaign;
pub mod config;
pub mod mission;
pub mod model;
pub mod simulator;

pub use mission::MissionController;
pub use model::{CollisionReading, GoalCorner, MissionResult, MotionCommand};
pub use simulator::{CallOutcome, Simulator};
