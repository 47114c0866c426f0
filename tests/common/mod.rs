//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use gravwell::SimulationPlugin;
use gravwell::bodies::{Body, BodyId, BodySet, OrbitPath};
use gravwell::types::{GRAVITY_SCALE, OrbitalState};

/// Speed of a circular orbit of radius `distance` around `mass`.
pub fn circular_speed(mass: f64, distance: f64) -> f64 {
    (mass * GRAVITY_SCALE / distance).sqrt()
}

/// Lone stationary planet: mass 1000, radius 60, at the origin.
pub fn single_planet() -> BodySet {
    let mut bodies = BodySet::new();
    bodies
        .push(Body::fixed("planet", 1000.0, 60.0, DVec2::ZERO))
        .unwrap();
    bodies
}

/// Planet (mass 8000, radius 120, SOI 1200) at the origin with a moon
/// (mass 2000, radius 40, SOI 400) orbiting at `moon_distance`.
pub fn planet_and_moon(moon_distance: f64, angular_speed: f64) -> (BodySet, BodyId, BodyId) {
    let mut bodies = BodySet::new();
    let planet = bodies
        .push(Body::fixed("planet", 8000.0, 120.0, DVec2::ZERO))
        .unwrap();
    let moon = bodies
        .push(Body::orbiting(
            "moon",
            2000.0,
            40.0,
            planet,
            OrbitPath::circular(moon_distance, angular_speed, 0.0),
        ))
        .unwrap();
    (bodies, planet, moon)
}

/// Counter-clockwise circular orbit at `(0, -distance)` around a body of `mass` at the origin.
pub fn circular_orbit(mass: f64, distance: f64) -> OrbitalState {
    OrbitalState::new(
        DVec2::new(0.0, -distance),
        DVec2::new(circular_speed(mass, distance), 0.0),
    )
}

/// Specific orbital energy around a single body at the origin.
pub fn orbital_energy(state: &OrbitalState, mass: f64) -> f64 {
    0.5 * state.vel.length_squared() - mass * GRAVITY_SCALE / state.pos.length()
}

/// One frame at 60 fps.
pub const FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Headless app running the simulation at a fixed 60 fps.
pub fn simulation_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .add_plugins(SimulationPlugin);
    app
}
