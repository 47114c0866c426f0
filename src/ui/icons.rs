//! Phosphor icon font setup and the icons the UI uses.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Whether the icon font has been installed into egui.
#[derive(Resource, Default)]
pub struct FontsInitialized(pub bool);

/// Install the Phosphor icon font. Runs in `EguiPrimaryContextPass`, where
/// the context is ready.
pub fn setup_fonts(mut contexts: EguiContexts, mut initialized: ResMut<FontsInitialized>) {
    if initialized.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
    initialized.0 = true;

    info!("Phosphor icon fonts initialized");
}

// Browse all icons at https://phosphoricons.com/

pub const PLAY: &str = egui_phosphor::regular::PLAY;
pub const PAUSE: &str = egui_phosphor::regular::PAUSE;
pub const RESET: &str = egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE;
pub const SCENES: &str = egui_phosphor::regular::LIST;
pub const WARP: &str = egui_phosphor::regular::FAST_FORWARD;

/// Sphere of influence display on / off
pub const SOI_ON: &str = egui_phosphor::regular::EYE;
pub const SOI_OFF: &str = egui_phosphor::regular::EYE_SLASH;

pub const CRAFT: &str = egui_phosphor::regular::ROCKET;
pub const SPEED: &str = egui_phosphor::regular::GAUGE;
pub const ALTITUDE: &str = egui_phosphor::regular::ARROW_UP;
pub const PERIOD: &str = egui_phosphor::regular::CLOCK;
pub const BODY: &str = egui_phosphor::regular::GLOBE;
pub const FORECAST: &str = egui_phosphor::regular::PATH;
pub const TRANSITION: &str = egui_phosphor::regular::CROSSHAIR;
pub const WARNING: &str = egui_phosphor::regular::WARNING;
pub const OK: &str = egui_phosphor::regular::CHECK_CIRCLE;
