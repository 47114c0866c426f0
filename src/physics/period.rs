//! Kepler-law estimate of the orbital period.
//!
//! Advisory only: drives the telemetry read-out and is reported with each
//! forecast. It never gates or corrects the integrator.

use std::f64::consts::TAU;

use bevy::math::DVec2;

use crate::bodies::GravitySource;
use crate::types::{GRAVITY_SCALE, NO_ORBIT_PERIOD};

/// Body with the strongest instantaneous pull (`mass / d²`) on `pos`.
///
/// Bodies at zero distance are skipped. Ties keep the earliest body.
pub fn strongest_pull(pos: DVec2, sources: &[GravitySource]) -> Option<&GravitySource> {
    let mut best: Option<(&GravitySource, f64)> = None;
    for source in sources {
        let r_squared = source.position.distance_squared(pos);
        if r_squared == 0.0 {
            continue;
        }
        let pull = source.mass / r_squared;
        if pull > best.map_or(0.0, |(_, p)| p) {
            best = Some((source, pull));
        }
    }
    best.map(|(source, _)| source)
}

/// Period of a circular orbit of radius `distance` around `mass`, in ticks.
///
/// `T = 2π·√(d³ / (mass · GRAVITY_SCALE))`.
pub fn kepler_period(distance: f64, mass: f64) -> f64 {
    TAU * (distance.powi(3) / (mass * GRAVITY_SCALE)).sqrt()
}

/// Estimated period of the orbit at `pos` around the strongest-pulling body.
///
/// Returns [`NO_ORBIT_PERIOD`] when no body can anchor an orbit.
pub fn orbital_period(pos: DVec2, sources: &[GravitySource]) -> f64 {
    strongest_pull(pos, sources)
        .map(|s| kepler_period(s.distance_to(pos), s.mass))
        .unwrap_or(NO_ORBIT_PERIOD)
}
