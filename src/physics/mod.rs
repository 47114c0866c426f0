//! Live simulation of the bodies and the craft.
//!
//! Each frame's warped time is split into sub-steps no larger than the time
//! warp. Every sub-step integrates the craft against the current body
//! positions and then moves the bodies along their paths. Bodies keep moving
//! after the craft crashes.

mod gravity;
mod integrator;
mod period;

#[cfg(test)]
mod proptest_physics;

use bevy::math::DVec2;
use bevy::prelude::*;

pub use gravity::{Collision, check_collision, gravity_impulse};
pub use integrator::{LiveStepConfig, SubstepPlan, step};
pub use period::{kepler_period, orbital_period, strongest_pull};

use crate::bodies::{BodyId, BodySet, GravitySource};
use crate::craft::Craft;
use crate::types::{OrbitalState, SimulationSet, SimulationTime};

/// Plugin running the live simulation in [`SimulationSet::Physics`].
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LiveStepConfig>()
            .init_resource::<CrashState>()
            .init_resource::<SimulationTime>()
            .init_resource::<BodySet>()
            .add_systems(Update, physics_step.in_set(SimulationSet::Physics));
    }
}

/// Details of the craft's crash.
#[derive(Clone, Debug, PartialEq)]
pub struct CrashReport {
    pub body: BodyId,
    pub body_name: String,
    pub position: DVec2,
    /// Speed at impact, units per tick
    pub impact_speed: f64,
}

/// Crash status of the current scene. Cleared on reset.
#[derive(Resource, Default, Debug)]
pub struct CrashState {
    pub report: Option<CrashReport>,
}

impl CrashState {
    pub fn crashed(&self) -> bool {
        self.report.is_some()
    }
}

/// Run one frame's sub-steps over the bodies and, if present, the craft.
///
/// The craft stops at the first collision, which is returned; the bodies
/// still cover the whole plan. `scratch` is reused for the source snapshots.
pub fn advance_scene(
    bodies: &mut BodySet,
    mut craft: Option<&mut OrbitalState>,
    plan: SubstepPlan,
    scratch: &mut Vec<GravitySource>,
) -> Option<Collision> {
    let mut collision = None;

    for _ in 0..plan.count {
        if let Some(state) = craft.as_deref_mut() {
            bodies.fill_sources(scratch);
            match step(*state, scratch, plan.step) {
                Ok(next) => *state = next,
                Err(hit) => {
                    collision = Some(hit);
                    craft = None;
                }
            }
        }
        bodies.advance(plan.step);
    }

    collision
}

/// Advance the live simulation by one frame.
fn physics_step(
    time: Res<Time>,
    mut sim_time: ResMut<SimulationTime>,
    config: Res<LiveStepConfig>,
    mut bodies: ResMut<BodySet>,
    mut crafts: Query<&mut Craft>,
    mut crash: ResMut<CrashState>,
    mut scratch: Local<Vec<GravitySource>>,
) {
    let dt_ticks = sim_time.ticks_for(time.delta_secs_f64());
    let plan = config.plan(dt_ticks, sim_time.warp);
    if plan.count == 0 {
        return;
    }

    if plan.dropped > 0.0 {
        warn!(
            "Frame needed more than {} sub-steps, dropping {:.1} ticks",
            config.max_substeps, plan.dropped
        );
    }

    let mut craft = crafts.single_mut().ok();
    let state = craft
        .as_mut()
        .filter(|c| !c.crashed)
        .map(|c| &mut c.state);

    let collision = advance_scene(&mut bodies, state, plan, &mut scratch);
    sim_time.elapsed += plan.simulated();

    let (Some(hit), Some(craft)) = (collision, craft.as_mut()) else {
        return;
    };

    let impact_speed = craft.state.speed();
    craft.crash(&hit);

    let body_name = bodies
        .get(hit.body)
        .map(|b| b.name.clone())
        .unwrap_or_default();
    info!(
        "Craft crashed into {} at ({:.1}, {:.1}), impact speed {:.3}",
        body_name, hit.point.x, hit.point.y, impact_speed
    );

    crash.report = Some(CrashReport {
        body: hit.body,
        body_name,
        position: hit.point,
        impact_speed,
    });
}
