//! Bodies, spheres of influence and parent orbits.

use bevy::prelude::*;

use super::{RenderSettings, to_render};
use crate::bodies::{BodyMotion, BodySet};

const SOI_ALPHA: f32 = 0.25;
const ORBIT_ALPHA: f32 = 0.2;

pub(super) fn draw_bodies(
    mut gizmos: Gizmos,
    bodies: Res<BodySet>,
    settings: Res<RenderSettings>,
) {
    for (_, body) in bodies.iter() {
        let center = Isometry2d::from_translation(to_render(body.position()));
        gizmos
            .circle_2d(center, body.radius as f32, body.color)
            .resolution(settings.resolution);

        if settings.show_soi && body.sphere_of_influence > body.radius {
            gizmos
                .circle_2d(
                    center,
                    body.sphere_of_influence as f32,
                    body.color.with_alpha(SOI_ALPHA),
                )
                .resolution(settings.resolution);
        }
    }
}

/// Outline of every orbiting body's path around its parent.
pub(super) fn draw_parent_orbits(
    mut gizmos: Gizmos,
    bodies: Res<BodySet>,
    settings: Res<RenderSettings>,
) {
    if !settings.show_soi {
        return;
    }

    for (_, body) in bodies.iter() {
        let BodyMotion::Orbiting { parent, orbit } = &body.motion else {
            continue;
        };
        let Some(parent) = bodies.get(*parent) else {
            continue;
        };

        let origin = parent.position();
        gizmos.linestrip_2d(
            orbit
                .outline(settings.resolution as usize)
                .map(|p| to_render(origin + p)),
            body.color.with_alpha(ORBIT_ALPHA),
        );
    }
}
