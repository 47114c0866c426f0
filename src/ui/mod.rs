//! egui overlay: telemetry window and the bottom control bar.

pub mod icons;
mod telemetry_panel;
mod time_controls;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass};

use crate::input::UiCapture;

pub use telemetry_panel::{format_altitude, format_period};
pub use time_controls::{WARP_LEVELS, format_warp};

/// Colors shared by the panels.
mod colors {
    use bevy_egui::egui::Color32;

    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(20, 20, 30, 220);
    pub const TEXT: Color32 = Color32::from_rgb(220, 220, 230);
    pub const OK: Color32 = Color32::from_rgb(85, 221, 136);
    pub const DANGER: Color32 = Color32::from_rgb(255, 80, 80);
}

/// Plugin adding the egui panels.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<icons::FontsInitialized>()
            .init_resource::<UiCapture>()
            .add_systems(EguiPrimaryContextPass, icons::setup_fonts)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    time_controls::time_controls_panel,
                    telemetry_panel::telemetry_panel,
                    track_ui_capture,
                )
                    .chain()
                    .after(icons::setup_fonts)
                    .run_if(|init: Res<icons::FontsInitialized>| init.0),
            );
    }
}

/// Record whether egui wants the keyboard or pointer, for the next frame's input.
fn track_ui_capture(mut contexts: EguiContexts, mut capture: ResMut<UiCapture>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let next = UiCapture {
        keyboard: ctx.wants_keyboard_input(),
        pointer: ctx.wants_pointer_input(),
    };
    if capture.keyboard != next.keyboard || capture.pointer != next.pointer {
        *capture = next;
    }
}
