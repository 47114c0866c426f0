//! Which body's gravity field owns a point.
//!
//! A body whose sphere of influence contains the point wins over any body
//! ranked below it, regardless of mass: a moon's local well overrides the
//! distant planet it orbits. Outside every sphere of influence, the nearest
//! body wins. Near a boundary the result can flip from one sample to the next;
//! there is no hysteresis.

use std::cmp::Ordering;

use bevy::math::DVec2;

use super::{BodyId, GravitySource};

/// Total priority order for the dominance rule.
///
/// `Less` means `a` takes precedence over `b`: deeper in the hierarchy first
/// (moons before planets), then smaller mass, then lower id.
pub fn priority_order(a: &GravitySource, b: &GravitySource) -> Ordering {
    b.depth
        .cmp(&a.depth)
        .then_with(|| a.mass.total_cmp(&b.mass))
        .then_with(|| a.id.cmp(&b.id))
}

/// Resolve the dominant body at `point`.
///
/// Returns `None` only for an empty source list.
pub fn dominant_body(point: DVec2, sources: &[GravitySource]) -> Option<BodyId> {
    let in_soi = sources
        .iter()
        .filter(|s| s.distance_to(point) <= s.sphere_of_influence)
        .min_by(|a, b| priority_order(a, b));

    if let Some(source) = in_soi {
        return Some(source.id);
    }

    sources
        .iter()
        .min_by(|a, b| {
            a.position
                .distance_squared(point)
                .total_cmp(&b.position.distance_squared(point))
        })
        .map(|s| s.id)
}
