//! 2D camera: follows the craft, pans, and zooms smoothly.
//!
//! World units are game units; zoom is a magnification (2.0 shows half the
//! area of 1.0), applied as the inverse of the orthographic scale.

use bevy::input::mouse::AccumulatedMouseScroll;
use bevy::prelude::*;

use crate::craft::Craft;
use crate::input::UiCapture;
use crate::types::SimulationSet;

/// Closest zoom (most magnified).
pub const MAX_ZOOM: f32 = 5.0;

/// Farthest zoom.
pub const MIN_ZOOM: f32 = 0.1;

/// Fraction of the remaining zoom distance covered each frame.
pub const ZOOM_SMOOTHING: f32 = 0.05;

/// Target zoom multiplier per wheel notch or zoom key press.
pub const ZOOM_STEP: f32 = 1.1;

/// Pan distance per frame at zoom 1, game units.
pub const PAN_SPEED: f32 = 10.0;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Camera view state.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct CameraState {
    /// Track the craft's position
    pub follow: bool,
    /// Offset from the followed point (or the origin), game units
    pub pan: Vec2,
    /// Current magnification
    pub zoom: f32,
    /// Magnification `zoom` is easing toward
    pub target_zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            follow: true,
            pan: Vec2::ZERO,
            zoom: 1.0,
            target_zoom: 1.0,
        }
    }
}

impl CameraState {
    /// Multiply the target zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_by(&mut self, factor: f32) {
        self.target_zoom = (self.target_zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Move the view by `direction` screen-steps, scaled so panning feels the
    /// same at any zoom.
    pub fn pan_by(&mut self, direction: Vec2) {
        self.pan += direction * PAN_SPEED / self.zoom;
    }

    pub fn toggle_follow(&mut self) -> bool {
        self.follow = !self.follow;
        self.follow
    }

    /// Back to following the craft at zoom 1.
    pub fn reset(&mut self) {
        *self = Self {
            zoom: self.zoom,
            ..default()
        };
    }

    /// Ease the zoom one frame toward its target.
    pub fn smooth_zoom(&mut self) {
        self.zoom += (self.target_zoom - self.zoom) * ZOOM_SMOOTHING;
    }

    /// World point at the center of the view.
    pub fn focus(&self, craft: Option<Vec2>) -> Vec2 {
        match craft {
            Some(pos) if self.follow => pos + self.pan,
            _ => self.pan,
        }
    }
}

/// Plugin providing the camera.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraState>()
            .init_resource::<UiCapture>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, camera_zoom.in_set(SimulationSet::Input))
            .add_systems(Update, update_camera.after(SimulationSet::Physics));
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera));
}

/// Mouse wheel adjusts the zoom target.
fn camera_zoom(
    mouse_scroll: Res<AccumulatedMouseScroll>,
    capture: Res<UiCapture>,
    mut camera: ResMut<CameraState>,
) {
    if capture.pointer {
        return;
    }
    if mouse_scroll.delta.y > 0.0 {
        camera.zoom_by(ZOOM_STEP);
    } else if mouse_scroll.delta.y < 0.0 {
        camera.zoom_by(1.0 / ZOOM_STEP);
    }
}

/// Apply the view state to the camera after the craft has moved.
pub(crate) fn update_camera(
    mut camera: ResMut<CameraState>,
    crafts: Query<&Craft>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    camera.smooth_zoom();

    let Ok((mut transform, mut projection)) = camera_query.single_mut() else {
        return;
    };

    let craft = crafts.single().ok().map(|c| c.position().as_vec2());
    let focus = camera.focus(craft);
    transform.translation.x = focus.x;
    transform.translation.y = focus.y;

    if let Projection::Orthographic(ref mut ortho) = *projection {
        ortho.scale = 1.0 / camera.zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zoom_clamped() {
        let mut camera = CameraState::default();
        for _ in 0..100 {
            camera.zoom_by(ZOOM_STEP);
        }
        assert_eq!(camera.target_zoom, MAX_ZOOM);
        for _ in 0..100 {
            camera.zoom_by(1.0 / ZOOM_STEP);
        }
        assert_eq!(camera.target_zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_eases_toward_target() {
        let mut camera = CameraState {
            target_zoom: 2.0,
            ..default()
        };
        camera.smooth_zoom();
        assert_relative_eq!(camera.zoom, 1.05, epsilon = 1e-6);
        for _ in 0..500 {
            camera.smooth_zoom();
        }
        assert_relative_eq!(camera.zoom, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_pan_scales_with_zoom() {
        let mut camera = CameraState {
            zoom: 2.0,
            ..default()
        };
        camera.pan_by(Vec2::X);
        assert_eq!(camera.pan, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_focus_follow_and_free() {
        let mut camera = CameraState {
            pan: Vec2::new(1.0, 2.0),
            ..default()
        };
        let craft = Some(Vec2::new(100.0, 0.0));
        assert_eq!(camera.focus(craft), Vec2::new(101.0, 2.0));

        assert!(!camera.toggle_follow());
        assert_eq!(camera.focus(craft), Vec2::new(1.0, 2.0));

        camera.reset();
        assert!(camera.follow);
        assert_eq!(camera.pan, Vec2::ZERO);
        assert_eq!(camera.target_zoom, 1.0);
    }
}
