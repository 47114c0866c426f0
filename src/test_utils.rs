//! Test utilities for the simulation tests.
//!
//! Provides fixture scenes and craft states, and assertions for orbital
//! invariants under the game's gravity law.

use bevy::math::DVec2;

use crate::bodies::{Body, BodyId, BodySet, GravitySource, OrbitPath};
use crate::types::{GRAVITY_SCALE, OrbitalState};

/// Fixtures for building test scenes.
pub mod fixtures {
    use super::*;

    /// Speed of a circular orbit of radius `distance` around `mass`.
    pub fn circular_speed(mass: f64, distance: f64) -> f64 {
        (mass * GRAVITY_SCALE / distance).sqrt()
    }

    /// A single stationary planet (mass 1000, radius 60) at the origin.
    pub fn single_planet() -> BodySet {
        let mut bodies = BodySet::new();
        bodies
            .push(Body::fixed("planet", 1000.0, 60.0, DVec2::ZERO))
            .unwrap();
        bodies
    }

    /// Sources for [`single_planet`].
    pub fn single_planet_sources() -> Vec<GravitySource> {
        single_planet().sources()
    }

    /// Planet (mass 8000, radius 120) at the origin with a moon (mass 2000,
    /// radius 40) on a circular orbit of radius 1600 starting on +x.
    pub fn planet_and_moon() -> BodySet {
        let mut bodies = BodySet::new();
        let planet = bodies
            .push(Body::fixed("planet", 8000.0, 120.0, DVec2::ZERO))
            .unwrap();
        bodies
            .push(Body::orbiting(
                "moon",
                2000.0,
                40.0,
                planet,
                OrbitPath::circular(1600.0, 0.001, 0.0),
            ))
            .unwrap();
        bodies
    }

    /// Counter-clockwise circular orbit of `distance` below a body of `mass` at the origin.
    pub fn circular_orbit(mass: f64, distance: f64) -> OrbitalState {
        OrbitalState::new(
            DVec2::new(0.0, -distance),
            DVec2::new(circular_speed(mass, distance), 0.0),
        )
    }

    /// A stationary source for hand-built snapshots.
    pub fn source(id: usize, position: DVec2, mass: f64, radius: f64) -> GravitySource {
        GravitySource {
            id: BodyId(id),
            position,
            mass,
            radius,
            sphere_of_influence: radius * 10.0,
            depth: 0,
        }
    }
}

/// Assertions for verifying orbital invariants.
pub mod assertions {
    use super::*;

    /// Specific orbital energy around a single body at the origin.
    ///
    /// E = v²/2 - mass·C/r
    pub fn orbital_energy(state: &OrbitalState, mass: f64) -> f64 {
        0.5 * state.vel.length_squared() - mass * GRAVITY_SCALE / state.pos.length()
    }

    /// Specific angular momentum (2D scalar) about the origin.
    pub fn angular_momentum(state: &OrbitalState) -> f64 {
        state.pos.perp_dot(state.vel)
    }

    /// Assert that a relative drift stays within tolerance.
    ///
    /// # Panics
    /// Panics if the relative change from `initial` to `current` exceeds `tolerance`.
    pub fn assert_conserved(what: &str, initial: f64, current: f64, tolerance: f64) {
        let drift = if initial.abs() > 1e-12 {
            ((current - initial) / initial).abs()
        } else {
            (current - initial).abs()
        };
        assert!(
            drift <= tolerance,
            "{what} not conserved: initial={initial:.6e}, current={current:.6e}, drift={drift:.6e}, tolerance={tolerance:.6e}"
        );
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circular_orbit_speed() {
        let state = fixtures::circular_orbit(1000.0, 200.0);
        assert_relative_eq!(state.speed(), 0.05f64.sqrt());
        assert_relative_eq!(state.pos.dot(state.vel), 0.0);
    }

    #[test]
    fn test_circular_orbit_is_bound() {
        let state = fixtures::circular_orbit(1000.0, 200.0);
        // Circular: E = -mass·C / 2r
        assert_relative_eq!(
            assertions::orbital_energy(&state, 1000.0),
            -10.0 / 400.0,
            epsilon = 1e-12
        );
        assert!(assertions::angular_momentum(&state) > 0.0);
    }

    #[test]
    fn test_planet_and_moon_fixture() {
        let bodies = fixtures::planet_and_moon();
        assert_eq!(bodies.len(), 2);
        assert_relative_eq!(bodies.get(BodyId(1)).unwrap().position().x, 1600.0);
    }
}
