//! Live flight read-out: speed, altitude, period estimate and status.

use bevy::prelude::*;

use crate::bodies::{BodyId, BodySet, dominant_body};
use crate::craft::Craft;
use crate::physics::orbital_period;
use crate::types::{NO_ORBIT_PERIOD, SimulationSet};

/// Plugin refreshing [`Telemetry`] after physics each frame.
pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Telemetry>()
            .add_systems(Update, update_telemetry.in_set(SimulationSet::Telemetry));
    }
}

/// Plain values describing the craft's current flight.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct Telemetry {
    /// Velocity magnitude, units per tick
    pub speed: f64,
    /// Distance to the nearest body surface
    pub altitude: Option<f64>,
    /// Kepler period estimate around the strongest-pulling body, ticks
    pub period: f64,
    pub crashed: bool,
    pub dominant_body: Option<BodyId>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            speed: 0.0,
            altitude: None,
            period: NO_ORBIT_PERIOD,
            crashed: false,
            dominant_body: None,
        }
    }
}

impl Telemetry {
    /// Read-out for `craft` among `bodies`.
    pub fn measure(craft: &Craft, bodies: &BodySet) -> Self {
        let pos = craft.position();
        let sources = bodies.sources();
        Self {
            speed: craft.state.speed(),
            altitude: bodies.nearest_surface(pos).map(|(_, altitude)| altitude),
            period: orbital_period(pos, &sources),
            crashed: craft.crashed,
            dominant_body: dominant_body(pos, &sources),
        }
    }
}

fn update_telemetry(crafts: Query<&Craft>, bodies: Res<BodySet>, mut telemetry: ResMut<Telemetry>) {
    let next = match crafts.single() {
        Ok(craft) => Telemetry::measure(craft, &bodies),
        Err(_) => Telemetry::default(),
    };
    // Avoid change detection churn while paused
    if *telemetry != next {
        *telemetry = next;
    }
}
