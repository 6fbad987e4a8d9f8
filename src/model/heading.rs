// src/model/heading.rs

use std::fmt;

const FULL_TURN: f64 = 360.0;
const HALF_TURN: f64 = 180.0;

/// Dead-reckoned robot heading in degrees, clockwise, always in `[0, 360)`.
///
/// The value is never read back from the simulator. It drifts from the
/// simulator's real pose whenever a move command is dropped or the robot is
/// pushed by an obstacle; the controller accepts that drift.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Heading(f64);

impl Heading {
    pub const ZERO: Heading = Heading(0.0);

    /// Builds a heading from any finite angle, wrapping it into `[0, 360)`.
    /// Non-finite input collapses to zero.
    pub fn new(degrees: f64) -> Self {
        Heading(wrap(degrees))
    }

    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Heading after turning by `delta` degrees (positive is clockwise).
    pub fn turned_by(self, delta: f64) -> Self {
        if !delta.is_finite() {
            return self;
        }
        Heading(wrap(self.0 + delta))
    }

    /// Shortest signed rotation from `self` to `target`, in `(-180, 180]`.
    pub fn error_to(self, target: Heading) -> f64 {
        let error = (target.0 - self.0 + HALF_TURN).rem_euclid(FULL_TURN) - HALF_TURN;
        if error <= -HALF_TURN { HALF_TURN } else { error }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

fn wrap(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}
