//! Gravwell - 2D orbital flight with a trajectory forecast
//!
//! Usage: `gravwell [scene.json]`. Without an argument the built-in moon
//! orbit scene is loaded.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use gravwell::SimulationPlugin;
use gravwell::camera::CameraPlugin;
use gravwell::input::InputPlugin;
use gravwell::render::RenderPlugin;
use gravwell::scenarios::{InitialScene, SceneSource};
use gravwell::ui::UiPlugin;

fn main() {
    let initial = std::env::args_os()
        .nth(1)
        .map(|path| SceneSource::File(PathBuf::from(path)))
        .unwrap_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Gravwell".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        // Insert before the scene plugin reads it at startup
        .insert_resource(InitialScene(initial))
        .add_plugins((
            SimulationPlugin,
            InputPlugin,
            CameraPlugin,
            RenderPlugin,
            UiPlugin,
        ))
        .run();
}
