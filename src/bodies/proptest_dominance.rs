//! Property-based tests for dominant-body resolution.

use bevy::math::DVec2;
use proptest::prelude::*;

use super::{BodyId, GravitySource, dominant_body};

fn arb_source() -> impl Strategy<Value = (f64, f64, f64, f64, u32)> {
    (
        -5000.0f64..5000.0,
        -5000.0f64..5000.0,
        1.0f64..10_000.0,
        1.0f64..100.0,
        0u32..3,
    )
}

fn build(raw: &[(f64, f64, f64, f64, u32)]) -> Vec<GravitySource> {
    raw.iter()
        .enumerate()
        .map(|(i, &(x, y, mass, radius, depth))| GravitySource {
            id: BodyId(i),
            position: DVec2::new(x, y),
            mass,
            radius,
            sphere_of_influence: radius * 10.0,
            depth,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Outside every SOI the resolver picks a body no farther than any other.
    #[test]
    fn prop_nearest_body_outside_all_sois(
        raw in prop::collection::vec(arb_source(), 1..8),
        px in -20_000.0f64..20_000.0,
        py in -20_000.0f64..20_000.0,
    ) {
        let sources = build(&raw);
        let point = DVec2::new(px, py);
        prop_assume!(sources.iter().all(|s| s.distance_to(point) > s.sphere_of_influence));

        let winner = dominant_body(point, &sources).unwrap();
        let winner_distance = sources[winner.0].distance_to(point);
        for s in &sources {
            prop_assert!(winner_distance <= s.distance_to(point));
        }
    }

    /// The winner always contains the point in its SOI when any body does.
    #[test]
    fn prop_soi_member_wins_when_present(
        raw in prop::collection::vec(arb_source(), 1..8),
        pick in 0usize..8,
        dx in -0.99f64..0.99,
        dy in -0.99f64..0.99,
    ) {
        let sources = build(&raw);
        let host = &sources[pick % sources.len()];
        let offset = DVec2::new(dx, dy) * host.sphere_of_influence / 2.0_f64.sqrt();
        let point = host.position + offset;

        let winner = dominant_body(point, &sources).unwrap();
        let winner = &sources[winner.0];
        prop_assert!(winner.distance_to(point) <= winner.sphere_of_influence);
        prop_assert!(winner.depth >= host.depth);
    }

    /// A non-empty body list always resolves.
    #[test]
    fn prop_always_resolves(
        raw in prop::collection::vec(arb_source(), 1..8),
        px in -1e6f64..1e6,
        py in -1e6f64..1e6,
    ) {
        let sources = build(&raw);
        prop_assert!(dominant_body(DVec2::new(px, py), &sources).is_some());
    }
}
