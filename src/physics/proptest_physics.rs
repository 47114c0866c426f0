//! Property-based tests for the gravity integrator.

use bevy::math::DVec2;
use proptest::prelude::*;

use super::{gravity_impulse, orbital_period, step};
use crate::bodies::{BodyId, GravitySource};
use crate::test_utils::{assertions, fixtures};
use crate::types::OrbitalState;

fn planet(mass: f64) -> [GravitySource; 1] {
    [GravitySource {
        id: BodyId(0),
        position: DVec2::ZERO,
        mass,
        radius: 10.0,
        sphere_of_influence: 100.0,
        depth: 0,
    }]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A zero step never changes the state.
    #[test]
    fn prop_zero_step_identity(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        vx in -5.0f64..5.0,
        vy in -5.0f64..5.0,
    ) {
        let sources = fixtures::single_planet_sources();
        let state = OrbitalState::new(DVec2::new(x, y), DVec2::new(vx, vy));
        prop_assume!(state.pos.length() > 60.0);
        prop_assert_eq!(step(state, &sources, 0.0), Ok(state));
    }

    /// N steps of dt/N approximate one step of dt for small dt.
    #[test]
    fn prop_subdivision_consistency(
        distance in 150.0f64..1000.0,
        angle in 0.0f64..std::f64::consts::TAU,
        speed_factor in 0.5f64..1.5,
        dt in 0.01f64..0.5,
        n in 2usize..16,
    ) {
        let sources = fixtures::single_planet_sources();
        let pos = DVec2::from_angle(angle) * distance;
        let v_circ = fixtures::circular_speed(1000.0, distance);
        let vel = pos.perp().normalize() * v_circ * speed_factor;
        let start = OrbitalState::new(pos, vel);

        let once = step(start, &sources, dt).unwrap();
        let mut split = start;
        for _ in 0..n {
            split = step(split, &sources, dt / n as f64).unwrap();
        }

        // Local error of semi-implicit Euler is O(dt²·|a|); |a| < 1e-3 here
        let tolerance = dt * dt * 1e-2 + 1e-12;
        prop_assert!(
            (once.pos - split.pos).length() < tolerance,
            "positions differ by {} (tolerance {})",
            (once.pos - split.pos).length(),
            tolerance
        );
        prop_assert!((once.vel - split.vel).length() < tolerance);
    }

    /// The impulse always points toward a lone body and follows the inverse square.
    #[test]
    fn prop_impulse_attractive(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        mass in 1.0f64..10_000.0,
        dt in 0.1f64..16.0,
    ) {
        let pos = DVec2::new(x, y);
        prop_assume!(pos.length() > 10.0);
        let impulse = gravity_impulse(pos, &planet(mass), dt).unwrap();
        prop_assert!(impulse.dot(-pos) > 0.0);

        let expected = mass / pos.length_squared() * 0.01 * dt;
        prop_assert!((impulse.length() - expected).abs() <= expected * 1e-9);
    }

    /// A circular orbit stays near its radius over one period at small steps.
    #[test]
    fn prop_circular_orbit_bounded(
        distance in 100.0f64..600.0,
        mass in 500.0f64..5000.0,
    ) {
        let sources = planet(mass);
        let pos = DVec2::new(distance, 0.0);
        let v = fixtures::circular_speed(mass, distance);
        let mut state = OrbitalState::new(pos, DVec2::new(0.0, v));
        let initial_energy = assertions::orbital_energy(&state, mass);

        let period = orbital_period(pos, &sources);
        let dt = period / 4000.0;
        for _ in 0..4000 {
            state = step(state, &sources, dt).unwrap();
        }

        let drift = (state.pos.length() - distance).abs() / distance;
        prop_assert!(drift < 0.01, "radius drift {:.4}%", drift * 100.0);

        let energy = assertions::orbital_energy(&state, mass);
        prop_assert!(((energy - initial_energy) / initial_energy).abs() < 0.01);
    }
}
