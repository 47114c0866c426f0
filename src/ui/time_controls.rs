//! Bottom bar: pause, time warp, SOI display, scene selection and reset.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::{colors, icons};
use crate::render::RenderSettings;
use crate::scenarios::{ActiveScene, PRESETS, SceneRequest, SceneSource};
use crate::types::SimulationTime;

/// Warp levels offered in the selector.
pub const WARP_LEVELS: [f64; 7] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0];

pub fn time_controls_panel(
    mut contexts: EguiContexts,
    mut sim_time: ResMut<SimulationTime>,
    mut render_settings: ResMut<RenderSettings>,
    mut scene_request: ResMut<SceneRequest>,
    active: Res<ActiveScene>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::bottom("time_controls")
        .frame(
            egui::Frame::new()
                .fill(colors::PANEL_BG)
                .inner_margin(egui::Margin::symmetric(16, 8)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 12.0;

                let (icon, tooltip) = if sim_time.paused {
                    (icons::PLAY, "Play (Space)")
                } else {
                    (icons::PAUSE, "Pause (Space)")
                };
                if ui
                    .button(egui::RichText::new(icon).size(18.0))
                    .on_hover_text(tooltip)
                    .clicked()
                {
                    sim_time.paused = !sim_time.paused;
                    info!(
                        "Simulation {}",
                        if sim_time.paused { "paused" } else { "running" }
                    );
                }

                ui.separator();

                ui.label(icons::WARP).on_hover_text("Time warp ([ / ])");
                for warp in WARP_LEVELS {
                    let selected = (sim_time.warp - warp).abs() < 1e-9;
                    if ui
                        .selectable_label(selected, format_warp(warp))
                        .clicked()
                        && sim_time.set_warp(warp)
                    {
                        info!("Time warp: {}x", sim_time.warp);
                    }
                }

                ui.separator();

                ui.label(
                    egui::RichText::new(format!("T+{:.0}", sim_time.elapsed))
                        .monospace()
                        .color(colors::TEXT),
                )
                .on_hover_text("Simulated ticks since the scene started");

                ui.separator();

                let soi_icon = if render_settings.show_soi {
                    icons::SOI_ON
                } else {
                    icons::SOI_OFF
                };
                if ui
                    .selectable_label(render_settings.show_soi, format!("{soi_icon} SOI"))
                    .on_hover_text("Sphere of influence display (T)")
                    .clicked()
                {
                    render_settings.show_soi = !render_settings.show_soi;
                }

                ui.separator();

                ui.label(icons::SCENES);
                egui::ComboBox::from_id_salt("scene_selector")
                    .selected_text(active.name.as_str())
                    .show_ui(ui, |ui| {
                        for preset in PRESETS {
                            let current = matches!(
                                &active.source,
                                Some(SceneSource::Preset(id)) if id == preset.id
                            );
                            if ui.selectable_label(current, preset.name).clicked() && !current {
                                scene_request.load(SceneSource::Preset(preset.id.to_string()));
                            }
                        }
                    });

                if ui
                    .button(egui::RichText::new(icons::RESET).size(18.0))
                    .on_hover_text("Reset scene (R)")
                    .clicked()
                {
                    scene_request.reset();
                }
            });
        });
}

/// `0.25` → "¼x", whole numbers without decimals.
pub fn format_warp(warp: f64) -> String {
    if warp == 0.25 {
        "¼x".to_string()
    } else if warp == 0.5 {
        "½x".to_string()
    } else {
        format!("{warp}x")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MAX_TIME_WARP, MIN_TIME_WARP};

    #[test]
    fn test_warp_levels_within_limits() {
        assert_eq!(WARP_LEVELS[0], MIN_TIME_WARP);
        assert_eq!(WARP_LEVELS[WARP_LEVELS.len() - 1], MAX_TIME_WARP);
        for pair in WARP_LEVELS.windows(2) {
            assert_eq!(pair[1], pair[0] * 2.0);
        }
    }

    #[test]
    fn test_format_warp() {
        assert_eq!(format_warp(0.25), "¼x");
        assert_eq!(format_warp(1.0), "1x");
        assert_eq!(format_warp(16.0), "16x");
    }
}
