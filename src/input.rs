//! Keyboard controls for the craft, the simulation clock and the view.
//!
//! Keys are looked up through [`ActionMap`] so bindings can be changed
//! without touching the systems.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::camera::{CameraState, ZOOM_STEP};
use crate::craft::{Craft, CraftConfig};
use crate::prediction::{PredictionState, mark_prediction_dirty};
use crate::render::RenderSettings;
use crate::scenarios::SceneRequest;
use crate::types::{SimulationSet, SimulationTime, TICKS_PER_SECOND};

/// Something the player can do from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Thrust,
    RotateLeft,
    RotateRight,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    ZoomIn,
    ZoomOut,
    ToggleFollow,
    ResetCamera,
    ToggleSoi,
    SlowDown,
    SpeedUp,
    Pause,
    ResetScene,
}

/// Key bindings per action. An action fires if any of its keys does.
#[derive(Resource, Clone, Debug)]
pub struct ActionMap {
    bindings: HashMap<Action, Vec<KeyCode>>,
}

impl Default for ActionMap {
    fn default() -> Self {
        use Action as A;
        use KeyCode as K;

        let defaults: [(Action, &[KeyCode]); 16] = [
            (A::Thrust, &[K::ArrowUp, K::KeyW]),
            (A::RotateLeft, &[K::ArrowLeft, K::KeyA]),
            (A::RotateRight, &[K::ArrowRight, K::KeyD]),
            (A::PanUp, &[K::KeyI]),
            (A::PanDown, &[K::KeyK]),
            (A::PanLeft, &[K::KeyJ]),
            (A::PanRight, &[K::KeyL]),
            (A::ZoomIn, &[K::Equal, K::NumpadAdd]),
            (A::ZoomOut, &[K::Minus, K::NumpadSubtract]),
            (A::ToggleFollow, &[K::KeyF]),
            (A::ResetCamera, &[K::KeyC]),
            (A::ToggleSoi, &[K::KeyT]),
            (A::SlowDown, &[K::BracketLeft]),
            (A::SpeedUp, &[K::BracketRight]),
            (A::Pause, &[K::Space]),
            (A::ResetScene, &[K::KeyR]),
        ];

        let mut map = Self {
            bindings: HashMap::new(),
        };
        for (action, keys) in defaults {
            for &key in keys {
                map.bind(action, key);
            }
        }
        map
    }
}

impl ActionMap {
    /// Add `key` as a trigger for `action`.
    pub fn bind(&mut self, action: Action, key: KeyCode) {
        let keys = self.bindings.entry(action).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Remove every binding of `action`.
    pub fn clear(&mut self, action: Action) {
        self.bindings.remove(&action);
    }

    pub fn keys(&self, action: Action) -> &[KeyCode] {
        self.bindings.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Any key of `action` is held.
    pub fn pressed(&self, action: Action, input: &ButtonInput<KeyCode>) -> bool {
        input.any_pressed(self.keys(action).iter().copied())
    }

    /// Any key of `action` went down this frame.
    pub fn just_pressed(&self, action: Action, input: &ButtonInput<KeyCode>) -> bool {
        input.any_just_pressed(self.keys(action).iter().copied())
    }
}

/// Whether the UI currently owns the keyboard or pointer.
///
/// Written by the UI each frame; input systems stand down while it is set.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct UiCapture {
    pub keyboard: bool,
    pub pointer: bool,
}

/// Plugin providing keyboard controls.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionMap>()
            .init_resource::<UiCapture>()
            .init_resource::<CameraState>()
            .init_resource::<RenderSettings>()
            .init_resource::<SceneRequest>()
            .add_systems(
                Update,
                (craft_controls, simulation_shortcuts, view_controls)
                    .in_set(SimulationSet::Input),
            );
    }
}

/// Turn and fire the craft.
///
/// Turning runs on wall-clock time so it feels the same at any warp; thrust
/// runs on simulated time so a burn changes velocity by the same amount per
/// simulated tick.
fn craft_controls(
    keys: Res<ButtonInput<KeyCode>>,
    actions: Res<ActionMap>,
    capture: Res<UiCapture>,
    time: Res<Time>,
    sim_time: Res<SimulationTime>,
    config: Res<CraftConfig>,
    mut crafts: Query<&mut Craft>,
    mut prediction: ResMut<PredictionState>,
) {
    if capture.keyboard {
        return;
    }
    let Ok(mut craft) = crafts.single_mut() else {
        return;
    };
    if craft.crashed {
        return;
    }

    let delta = time.delta_secs_f64();

    let mut turn = 0.0;
    if actions.pressed(Action::RotateLeft, &keys) {
        turn += 1.0;
    }
    if actions.pressed(Action::RotateRight, &keys) {
        turn -= 1.0;
    }
    if turn != 0.0 {
        craft.rotate(turn * config.rotation_speed * delta * TICKS_PER_SECOND);
    }

    if actions.pressed(Action::Thrust, &keys) {
        let ticks = sim_time.ticks_for(delta);
        if ticks > 0.0 && craft.apply_thrust(&config, ticks) {
            mark_prediction_dirty(&mut prediction);
        }
    }
}

/// Pause, warp, reset and display toggles.
fn simulation_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    actions: Res<ActionMap>,
    capture: Res<UiCapture>,
    mut sim_time: ResMut<SimulationTime>,
    mut render_settings: ResMut<RenderSettings>,
    mut scene_request: ResMut<SceneRequest>,
) {
    if capture.keyboard {
        return;
    }

    if actions.just_pressed(Action::Pause, &keys) {
        sim_time.paused = !sim_time.paused;
        info!(
            "Simulation {}",
            if sim_time.paused { "paused" } else { "running" }
        );
    }

    if actions.just_pressed(Action::SlowDown, &keys) && sim_time.slow_down() {
        info!("Time warp: {}x", sim_time.warp);
    }
    if actions.just_pressed(Action::SpeedUp, &keys) && sim_time.speed_up() {
        info!("Time warp: {}x", sim_time.warp);
    }

    if actions.just_pressed(Action::ToggleSoi, &keys) {
        render_settings.show_soi = !render_settings.show_soi;
        info!(
            "Sphere of influence display {}",
            if render_settings.show_soi { "on" } else { "off" }
        );
    }

    if actions.just_pressed(Action::ResetScene, &keys) {
        info!("Scene reset requested");
        scene_request.reset();
    }
}

/// Camera pan, zoom, follow and reset.
fn view_controls(
    keys: Res<ButtonInput<KeyCode>>,
    actions: Res<ActionMap>,
    capture: Res<UiCapture>,
    mut camera: ResMut<CameraState>,
) {
    if capture.keyboard {
        return;
    }

    let mut pan = Vec2::ZERO;
    if actions.pressed(Action::PanUp, &keys) {
        pan.y += 1.0;
    }
    if actions.pressed(Action::PanDown, &keys) {
        pan.y -= 1.0;
    }
    if actions.pressed(Action::PanLeft, &keys) {
        pan.x -= 1.0;
    }
    if actions.pressed(Action::PanRight, &keys) {
        pan.x += 1.0;
    }
    if pan != Vec2::ZERO {
        camera.pan_by(pan);
    }

    if actions.just_pressed(Action::ZoomIn, &keys) {
        camera.zoom_by(ZOOM_STEP);
    }
    if actions.just_pressed(Action::ZoomOut, &keys) {
        camera.zoom_by(1.0 / ZOOM_STEP);
    }

    if actions.just_pressed(Action::ToggleFollow, &keys) {
        let follow = camera.toggle_follow();
        info!("Camera follow {}", if follow { "on" } else { "off" });
    }
    if actions.just_pressed(Action::ResetCamera, &keys) {
        camera.reset();
    }
}
