//! Gizmo rendering of the scene.
//!
//! Everything is drawn in immediate mode from simulation state each frame;
//! there are no render entities to keep in sync.

mod background;
mod bodies;
mod craft;
mod forecast;

use bevy::prelude::*;

use crate::camera::update_camera;
use crate::types::SimulationSet;

pub use background::{Star, Starfield, star_screen_position};
pub use forecast::segment_color;

/// Display toggles.
#[derive(Resource, Clone, Debug)]
pub struct RenderSettings {
    /// Color the forecast by dominant body and draw SOI rings, parent orbits
    /// and transition markers. Off draws a plain white forecast.
    pub show_soi: bool,
    /// Segments used for circles and orbit outlines
    pub resolution: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_soi: true,
            resolution: 96,
        }
    }
}

/// Plugin drawing bodies, craft and forecast.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderSettings>()
            .init_resource::<background::Starfield>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(
                Update,
                (
                    background::draw_starfield,
                    bodies::draw_parent_orbits,
                    bodies::draw_bodies,
                    forecast::draw_forecast,
                    craft::draw_exhaust,
                    craft::draw_craft,
                )
                    .chain()
                    .after(SimulationSet::Telemetry)
                    .after(update_camera),
            );
    }
}

/// `DVec2` game position as a render position.
fn to_render(pos: bevy::math::DVec2) -> Vec2 {
    pos.as_vec2()
}
