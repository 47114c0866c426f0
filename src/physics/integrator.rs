//! Semi-implicit Euler integration of the craft.
//!
//! Velocity is updated from the gravity impulse before position is moved with
//! the new velocity. The same step drives the live craft and the forecast.

use bevy::prelude::Resource;

use super::gravity::{Collision, gravity_impulse};
use crate::bodies::GravitySource;
use crate::types::OrbitalState;

/// Advance `state` by `dt` ticks against fixed `sources`.
///
/// A zero step returns the state unchanged. Fails if the starting position is
/// at or inside a body.
#[inline]
pub fn step(state: OrbitalState, sources: &[GravitySource], dt: f64) -> Result<OrbitalState, Collision> {
    let vel = state.vel + gravity_impulse(state.pos, sources, dt)?;
    Ok(OrbitalState {
        pos: state.pos + vel * dt,
        vel,
    })
}

// =============================================================================
// Live sub-stepping
// =============================================================================

/// How a wall-clock frame is split into integration steps.
#[derive(Resource, Clone, Debug)]
pub struct LiveStepConfig {
    /// Most sub-steps run in one frame. Default: 64.
    pub max_substeps: usize,
}

impl Default for LiveStepConfig {
    fn default() -> Self {
        Self { max_substeps: 64 }
    }
}

/// Sub-steps covering one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubstepPlan {
    /// Number of steps to run
    pub count: usize,
    /// Size of each step in ticks
    pub step: f64,
    /// Ticks not simulated because the step cap was reached
    pub dropped: f64,
}

impl SubstepPlan {
    pub const EMPTY: Self = Self {
        count: 0,
        step: 0.0,
        dropped: 0.0,
    };

    /// Ticks actually simulated.
    pub fn simulated(&self) -> f64 {
        self.count as f64 * self.step
    }
}

impl LiveStepConfig {
    /// Split `dt_ticks` into equal steps no larger than `warp`.
    ///
    /// At 60 fps a frame is one tick of wall time, so this yields exactly one
    /// step of size `warp`, the same step the forecast takes.
    pub fn plan(&self, dt_ticks: f64, warp: f64) -> SubstepPlan {
        let runnable = dt_ticks > 0.0 && warp > 0.0;
        if !runnable {
            return SubstepPlan::EMPTY;
        }

        // Absorb rounding in secs × 60 × warp so 1/60 s stays one step
        let wanted = ((dt_ticks / warp) - 1e-9).ceil().max(1.0) as usize;
        let step = dt_ticks / wanted as f64;
        let count = wanted.min(self.max_substeps.max(1));

        SubstepPlan {
            count,
            step,
            dropped: (wanted - count) as f64 * step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyId;
    use crate::test_utils::fixtures;
    use approx::assert_relative_eq;
    use bevy::math::DVec2;

    #[test]
    fn test_zero_step_is_identity() {
        let sources = fixtures::single_planet_sources();
        let state = OrbitalState::new(DVec2::new(0.0, -200.0), DVec2::new(0.3, 0.1));
        assert_eq!(step(state, &sources, 0.0), Ok(state));
    }

    #[test]
    fn test_velocity_updated_before_position() {
        let sources = [GravitySource {
            id: BodyId(0),
            position: DVec2::ZERO,
            mass: 1000.0,
            radius: 10.0,
            sphere_of_influence: 100.0,
            depth: 0,
        }];
        let state = OrbitalState::new(DVec2::new(100.0, 0.0), DVec2::ZERO);
        let next = step(state, &sources, 2.0).unwrap();

        // impulse = 1000/100² · 0.01 · 2 = 0.002 toward the origin
        assert_relative_eq!(next.vel.x, -0.002, epsilon = 1e-15);
        // position moved with the new velocity, not the old one
        assert_relative_eq!(next.pos.x, 100.0 - 0.004, epsilon = 1e-12);
    }

    #[test]
    fn test_free_flight_without_bodies() {
        let state = OrbitalState::new(DVec2::ZERO, DVec2::new(1.0, -2.0));
        let next = step(state, &[], 3.0).unwrap();
        assert_eq!(next.pos, DVec2::new(3.0, -6.0));
        assert_eq!(next.vel, state.vel);
    }

    #[test]
    fn test_collision_leaves_no_state() {
        let sources = fixtures::single_planet_sources();
        let inside = OrbitalState::new(DVec2::new(0.0, -30.0), DVec2::ZERO);
        let collision = step(inside, &sources, 1.0).unwrap_err();
        assert_eq!(collision.body, BodyId(0));
        assert_eq!(collision.point, inside.pos);
    }

    #[test]
    fn test_plan_one_step_per_frame_at_60fps() {
        let config = LiveStepConfig::default();
        for warp in [0.25, 1.0, 4.0, 16.0] {
            let plan = config.plan(1.0 / 60.0 * 60.0 * warp, warp);
            assert_eq!(plan.count, 1, "warp {}", warp);
            assert_relative_eq!(plan.step, warp, epsilon = 1e-9);
            assert_eq!(plan.dropped, 0.0);
        }
    }

    #[test]
    fn test_plan_splits_long_frames() {
        let config = LiveStepConfig::default();
        // 30 fps at warp 2: 4 ticks, two steps of 2
        let plan = config.plan(4.0, 2.0);
        assert_eq!(plan.count, 2);
        assert_relative_eq!(plan.step, 2.0);

        // Partial frame still runs one (smaller) step
        let plan = config.plan(0.5, 2.0);
        assert_eq!(plan.count, 1);
        assert_relative_eq!(plan.step, 0.5);
    }

    #[test]
    fn test_plan_caps_substeps() {
        let config = LiveStepConfig { max_substeps: 8 };
        let plan = config.plan(100.0, 1.0);
        assert_eq!(plan.count, 8);
        assert_relative_eq!(plan.step, 1.0);
        assert_relative_eq!(plan.dropped, 92.0);
        assert_relative_eq!(plan.simulated(), 8.0);
    }

    #[test]
    fn test_plan_empty_frame() {
        let config = LiveStepConfig::default();
        assert_eq!(config.plan(0.0, 1.0), SubstepPlan::EMPTY);
        assert_eq!(config.plan(1.0, 0.0), SubstepPlan::EMPTY);
    }
}
