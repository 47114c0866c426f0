//! Gravwell - 2D orbital flight with a trajectory forecast
//!
//! A craft flies among bodies that pull on it with a game-tuned inverse-square
//! law. Bodies are fixed or follow prescribed orbits; the craft integrates
//! with semi-implicit Euler and crashes on contact. A forecast re-runs the
//! same physics ahead of time, colors each sample by the body dominating it,
//! and stops after a number of revolutions.
//!
//! [`SimulationPlugin`] adds everything except windowing, rendering and UI,
//! so it runs headless under `MinimalPlugins`.

pub mod bodies;
pub mod camera;
pub mod craft;
pub mod input;
pub mod physics;
pub mod prediction;
pub mod render;
pub mod scenarios;
pub mod telemetry;
pub mod types;
pub mod ui;
pub mod vector;

#[cfg(test)]
pub mod test_utils;

use bevy::prelude::*;

use craft::CraftPlugin;
use physics::PhysicsPlugin;
use prediction::PredictionPlugin;
use scenarios::ScenePlugin;
use telemetry::TelemetryPlugin;
use types::SimulationSet;

/// Core simulation: scenes, physics, forecast and telemetry.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SimulationSet::Input,
                SimulationSet::Scene,
                SimulationSet::Physics,
                SimulationSet::Prediction,
                SimulationSet::Telemetry,
            )
                .chain(),
        )
        .add_plugins((
            CraftPlugin,
            PhysicsPlugin,
            PredictionPlugin,
            ScenePlugin,
            TelemetryPlugin,
        ));
    }
}
