//! The craft and its exhaust.

use bevy::prelude::*;

use super::to_render;
use crate::craft::{Craft, CraftConfig};

/// Nose-to-center distance of the craft triangle.
const CRAFT_LENGTH: f32 = 10.0;
/// Angle of the rear corners off the tail direction.
const TAIL_SPREAD: f32 = 0.6;

const CRAFT_COLOR: Color = Color::WHITE;
const CRASHED_COLOR: Color = Color::srgb(1.0, 0.2, 0.2);
const EXHAUST_COLOR: Color = Color::srgb(1.0, 0.6, 0.2);

/// Closed triangle outline pointing along `heading`.
pub fn craft_outline(center: Vec2, heading: f32) -> [Vec2; 4] {
    let nose = center + Vec2::from_angle(heading) * CRAFT_LENGTH;
    let tail = heading + std::f32::consts::PI;
    let left = center + Vec2::from_angle(tail - TAIL_SPREAD) * CRAFT_LENGTH * 0.7;
    let right = center + Vec2::from_angle(tail + TAIL_SPREAD) * CRAFT_LENGTH * 0.7;
    [nose, left, right, nose]
}

pub(super) fn draw_craft(mut gizmos: Gizmos, crafts: Query<&Craft>) {
    for craft in &crafts {
        let color = if craft.crashed {
            CRASHED_COLOR
        } else {
            CRAFT_COLOR
        };
        gizmos.linestrip_2d(
            craft_outline(to_render(craft.position()), craft.heading as f32),
            color,
        );
    }
}

pub(super) fn draw_exhaust(mut gizmos: Gizmos, config: Res<CraftConfig>, crafts: Query<&Craft>) {
    let full_life = config.exhaust_life.max(f32::EPSILON);
    for craft in &crafts {
        for particle in &craft.exhaust {
            let alpha = (particle.life / full_life).clamp(0.0, 1.0);
            gizmos.circle_2d(
                Isometry2d::from_translation(to_render(particle.position)),
                particle.size,
                EXHAUST_COLOR.with_alpha(alpha),
            );
        }
    }
}
