//! Flight read-out window in the top-left corner.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::{colors, icons};
use crate::bodies::{BodyId, BodySet};
use crate::physics::CrashState;
use crate::prediction::Forecast;
use crate::telemetry::Telemetry;
use crate::types::{NO_ORBIT_PERIOD, TICKS_PER_SECOND};

pub fn telemetry_panel(
    mut contexts: EguiContexts,
    telemetry: Res<Telemetry>,
    crash: Res<CrashState>,
    bodies: Res<BodySet>,
    forecasts: Query<&Forecast>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Window::new("Telemetry")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .frame(
            egui::Frame::new()
                .fill(colors::PANEL_BG)
                .inner_margin(egui::Margin::same(12)),
        )
        .show(ctx, |ui| {
            egui::Grid::new("telemetry_grid")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    row(ui, icons::SPEED, "Speed", format!("{:.3} u/tick", telemetry.speed));
                    row(ui, icons::ALTITUDE, "Altitude", format_altitude(telemetry.altitude));
                    row(ui, icons::PERIOD, "Period", format_period(telemetry.period));
                    row(
                        ui,
                        icons::BODY,
                        "Dominant",
                        body_name(&bodies, telemetry.dominant_body),
                    );

                    ui.label(icons::CRAFT);
                    match &crash.report {
                        Some(report) => ui.colored_label(
                            colors::DANGER,
                            format!("{} Crashed into {}", icons::WARNING, report.body_name),
                        ),
                        None => ui.colored_label(colors::OK, format!("{} Flying", icons::OK)),
                    };
                    ui.end_row();
                });

            let Ok(forecast) = forecasts.single() else {
                return;
            };

            ui.separator();
            ui.label(egui::RichText::new(format!("{} Forecast", icons::FORECAST)).strong());
            egui::Grid::new("forecast_grid")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    row(ui, "", "Revolutions", forecast.revolutions.to_string());
                    row(ui, "", "Points", forecast.len().to_string());
                    row(
                        ui,
                        icons::TRANSITION,
                        "Transitions",
                        forecast.transitions.len().to_string(),
                    );
                    if let Some(hit) = &forecast.collision {
                        row(
                            ui,
                            icons::WARNING,
                            "Impact",
                            body_name(&bodies, Some(hit.body)),
                        );
                    }
                });
        });
}

fn row(ui: &mut egui::Ui, icon: &str, label: &str, value: String) {
    ui.label(format!("{icon} {label}"));
    ui.label(egui::RichText::new(value).monospace());
    ui.end_row();
}

fn body_name(bodies: &BodySet, id: Option<BodyId>) -> String {
    id.and_then(|id| bodies.get(id))
        .map_or_else(|| "none".to_string(), |b| b.name.clone())
}

/// Distance to the nearest surface, or a dash with no bodies.
pub fn format_altitude(altitude: Option<f64>) -> String {
    match altitude {
        Some(altitude) => format!("{altitude:.1} u"),
        None => "-".to_string(),
    }
}

/// Period in ticks and seconds at 1x, or "no orbit" for the sentinel.
pub fn format_period(period: f64) -> String {
    if period >= NO_ORBIT_PERIOD || !period.is_finite() {
        "no orbit".to_string()
    } else {
        format!("{:.0} ticks ({:.1} s)", period, period / TICKS_PER_SECOND)
    }
}
