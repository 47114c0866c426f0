//! Core simulation types and constants.
//!
//! All quantities are in game units rather than SI: distances and masses are
//! tuned for on-screen play, and simulated time is measured in ticks.

use bevy::math::DVec2;
use bevy::prelude::*;

/// System sets ordering one frame of the simulation.
///
/// Input must land before physics integrates, and the forecast and
/// telemetry read the state physics just produced.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Keyboard controls (heading, thrust, warp, toggles)
    Input,
    /// Scene spawning and reset handling
    Scene,
    /// Live integration of bodies and craft
    Physics,
    /// Trajectory forecast
    Prediction,
    /// Telemetry read-out
    Telemetry,
}

/// Gravitational scale applied to body mass in the force law.
///
/// Game-tuned, not SI: acceleration toward a body is `mass / d² * GRAVITY_SCALE`.
pub const GRAVITY_SCALE: f64 = 0.01;

/// Simulation ticks per wall-clock second at 1x time warp.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// Period reported when no body can anchor an orbit (path is a straight line).
pub const NO_ORBIT_PERIOD: f64 = 50_000.0;

/// Lowest opacity a forecast sample fades to.
pub const MIN_FORECAST_OPACITY: f64 = 0.2;

/// Sphere-of-influence radius as a multiple of body radius, when not configured.
pub const DEFAULT_SOI_MULTIPLIER: f64 = 10.0;

/// Slowest allowed time warp.
pub const MIN_TIME_WARP: f64 = 0.25;

/// Fastest allowed time warp.
pub const MAX_TIME_WARP: f64 = 16.0;

/// Position and velocity of a point mass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitalState {
    /// Position in game units
    pub pos: DVec2,
    /// Velocity in game units per tick
    pub vel: DVec2,
}

impl OrbitalState {
    /// Create a new state
    pub fn new(pos: DVec2, vel: DVec2) -> Self {
        Self { pos, vel }
    }

    /// Speed in game units per tick
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}

/// Simulation clock: time warp, pause state, and elapsed simulated ticks.
#[derive(Resource, Clone, Debug)]
pub struct SimulationTime {
    /// Multiplier on simulated time per wall-clock second
    pub warp: f64,
    /// Whether simulation is paused
    pub paused: bool,
    /// Simulated ticks since the scene started
    pub elapsed: f64,
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self {
            warp: 1.0,
            paused: false,
            elapsed: 0.0,
        }
    }
}

impl SimulationTime {
    /// Simulated ticks covered by a wall-clock frame of `delta_secs`.
    pub fn ticks_for(&self, delta_secs: f64) -> f64 {
        if self.paused {
            0.0
        } else {
            delta_secs * TICKS_PER_SECOND * self.warp
        }
    }

    /// Double the time warp, up to [`MAX_TIME_WARP`]. Returns true if it changed.
    pub fn speed_up(&mut self) -> bool {
        self.set_warp(self.warp * 2.0)
    }

    /// Halve the time warp, down to [`MIN_TIME_WARP`]. Returns true if it changed.
    pub fn slow_down(&mut self) -> bool {
        self.set_warp(self.warp * 0.5)
    }

    /// Set the time warp, clamped to the allowed range. Returns true if it changed.
    pub fn set_warp(&mut self, warp: f64) -> bool {
        let clamped = warp.clamp(MIN_TIME_WARP, MAX_TIME_WARP);
        let changed = clamped != self.warp;
        self.warp = clamped;
        changed
    }

    /// Reset to the start of a scene
    pub fn reset(&mut self) {
        self.warp = 1.0;
        self.elapsed = 0.0;
    }
}
