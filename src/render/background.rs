//! Parallax starfield behind the scene.
//!
//! Stars live in screen space and drift at a tenth of the camera's motion,
//! wrapping around the edges of the view.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::camera::MainCamera;

const STAR_COUNT: usize = 800;
/// Fraction of camera motion the stars follow.
const PARALLAX: f32 = 0.1;
/// Share of stars drawn at double size.
const LARGE_STAR_CHANCE: f32 = 0.05;
const STAR_SEED: u64 = 0x5747_4156;
const STAR_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.8);

/// One background star. `anchor` is in `[0, 1)` of the view on each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub anchor: Vec2,
    /// Size in screen pixels
    pub size: f32,
}

/// Star layout, generated once from a fixed seed.
#[derive(Resource, Clone, Debug)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Default for Starfield {
    fn default() -> Self {
        Self::generate(STAR_COUNT, STAR_SEED)
    }
}

impl Starfield {
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let stars = (0..count)
            .map(|_| Star {
                anchor: Vec2::new(rng.f32(), rng.f32()),
                size: if rng.f32() < LARGE_STAR_CHANCE { 2.0 } else { 1.0 },
            })
            .collect();
        Self { stars }
    }
}

/// Screen-space position of `star` in a `screen`-sized view after the camera
/// has moved to `camera` (world units at zoom 1).
pub fn star_screen_position(star: &Star, camera: Vec2, screen: Vec2) -> Vec2 {
    let shifted = star.anchor * screen - camera * PARALLAX;
    Vec2::new(
        shifted.x.rem_euclid(screen.x.max(1.0)),
        shifted.y.rem_euclid(screen.y.max(1.0)),
    )
}

pub(super) fn draw_starfield(
    mut gizmos: Gizmos,
    starfield: Res<Starfield>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Transform, &Projection), With<MainCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((transform, projection)) = cameras.single() else {
        return;
    };
    let scale = match projection {
        Projection::Orthographic(ortho) => ortho.scale,
        _ => 1.0,
    };

    let screen = window.size();
    let center = transform.translation.truncate();
    let corner = center - screen * scale / 2.0;

    for star in &starfield.stars {
        let on_screen = star_screen_position(star, center, screen);
        gizmos.rect_2d(
            Isometry2d::from_translation(corner + on_screen * scale),
            Vec2::splat(star.size * scale),
            STAR_COLOR,
        );
    }
}
