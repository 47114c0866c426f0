//! Gravity law for the craft.
//!
//! Inverse-square attraction scaled by [`GRAVITY_SCALE`]. Bodies act on the
//! craft only; there is no body-on-body gravity.

use bevy::math::DVec2;
use thiserror::Error;

use crate::bodies::{BodyId, GravitySource};
use crate::types::GRAVITY_SCALE;

/// The point mass reached a body's surface.
///
/// Not a failure of the simulation: the live craft crashes, a forecast ends.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("collision with body {} at distance {distance:.2}", body.0)]
pub struct Collision {
    /// Body that was hit
    pub body: BodyId,
    /// Position of the point mass when the collision was detected
    pub point: DVec2,
    /// Distance from the body's center (at most its radius)
    pub distance: f64,
}

/// First body whose surface contains `pos`, if any.
///
/// Zero distance always counts as a collision, even for a zero-radius body.
pub fn check_collision(pos: DVec2, sources: &[GravitySource]) -> Option<Collision> {
    sources.iter().find_map(|s| {
        let distance = s.distance_to(pos);
        (distance <= s.radius || distance == 0.0).then_some(Collision {
            body: s.id,
            point: pos,
            distance,
        })
    })
}

/// Velocity change over a step of `dt` ticks from every source.
///
/// Each body contributes `mass / d² · GRAVITY_SCALE · dt` along the direction
/// toward it. Fails with the first [`Collision`] if `pos` is at or inside any
/// body's surface.
#[inline]
pub fn gravity_impulse(pos: DVec2, sources: &[GravitySource], dt: f64) -> Result<DVec2, Collision> {
    let mut impulse = DVec2::ZERO;

    for source in sources {
        let delta = source.position - pos;
        let distance = delta.length();

        if distance <= source.radius || distance == 0.0 {
            return Err(Collision {
                body: source.id,
                point: pos,
                distance,
            });
        }

        let magnitude = source.mass / (distance * distance) * GRAVITY_SCALE * dt;
        impulse += delta / distance * magnitude;
    }

    Ok(impulse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn source(id: usize, position: DVec2, mass: f64, radius: f64) -> GravitySource {
        GravitySource {
            id: BodyId(id),
            position,
            mass,
            radius,
            sphere_of_influence: radius * 10.0,
            depth: 0,
        }
    }

    #[test]
    fn test_impulse_inverse_square() {
        let sources = [source(0, DVec2::ZERO, 1000.0, 10.0)];
        let near = gravity_impulse(DVec2::new(100.0, 0.0), &sources, 1.0).unwrap();
        let far = gravity_impulse(DVec2::new(200.0, 0.0), &sources, 1.0).unwrap();

        // 1000 / 100² · 0.01, pointing back toward the origin
        assert_relative_eq!(near.x, -0.001, epsilon = 1e-15);
        assert_relative_eq!(near.y, 0.0);
        assert_relative_eq!(near.x / far.x, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_impulse_scales_with_dt() {
        let sources = [source(0, DVec2::new(0.0, 50.0), 500.0, 5.0)];
        let one = gravity_impulse(DVec2::ZERO, &sources, 1.0).unwrap();
        let four = gravity_impulse(DVec2::ZERO, &sources, 4.0).unwrap();
        assert_relative_eq!(four.y, one.y * 4.0, epsilon = 1e-15);
        assert!(one.y > 0.0);
    }

    #[test]
    fn test_impulse_sums_sources() {
        let sources = [
            source(0, DVec2::new(-100.0, 0.0), 1000.0, 1.0),
            source(1, DVec2::new(100.0, 0.0), 1000.0, 1.0),
        ];
        let impulse = gravity_impulse(DVec2::ZERO, &sources, 1.0).unwrap();
        assert_relative_eq!(impulse.length(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_collision_at_surface() {
        let sources = [source(7, DVec2::ZERO, 1000.0, 60.0)];
        let err = gravity_impulse(DVec2::new(0.0, -60.0), &sources, 1.0).unwrap_err();
        assert_eq!(err.body, BodyId(7));
        assert_relative_eq!(err.distance, 60.0);
        assert!(gravity_impulse(DVec2::new(0.0, -60.001), &sources, 1.0).is_ok());
    }

    #[test]
    fn test_zero_distance_is_collision_even_without_radius() {
        let sources = [source(0, DVec2::new(5.0, 5.0), 10.0, 0.0)];
        assert!(gravity_impulse(DVec2::new(5.0, 5.0), &sources, 1.0).is_err());
        assert!(check_collision(DVec2::new(5.0, 5.0), &sources).is_some());
        assert!(check_collision(DVec2::new(5.0, 6.0), &sources).is_none());
    }

    #[test]
    fn test_empty_sources_no_force() {
        assert_eq!(gravity_impulse(DVec2::ONE, &[], 3.0), Ok(DVec2::ZERO));
    }
}
