//! Forecast path and dominant-body transition markers.

use bevy::prelude::*;

use super::{RenderSettings, to_render};
use crate::bodies::BodySet;
use crate::prediction::{Forecast, PredictionPoint};

const TRANSITION_MARKER_RADIUS: f32 = 6.0;
const IMPACT_MARKER_RADIUS: f32 = 4.0;
const IMPACT_COLOR: Color = Color::srgb(1.0, 0.2, 0.2);

/// Color of the forecast segment ending at `point`.
///
/// With SOI display on, segments take the color of the body dominating them;
/// otherwise they are white. Either way alpha is the sample's opacity.
pub fn segment_color(point: &PredictionPoint, bodies: &BodySet, show_soi: bool) -> Color {
    let base = if show_soi {
        bodies
            .get(point.dominant_body)
            .map_or(Color::WHITE, |b| b.color)
    } else {
        Color::WHITE
    };
    base.with_alpha(point.opacity as f32)
}

pub(super) fn draw_forecast(
    mut gizmos: Gizmos,
    forecasts: Query<&Forecast>,
    bodies: Res<BodySet>,
    settings: Res<RenderSettings>,
) {
    for forecast in &forecasts {
        for pair in forecast.points.windows(2) {
            gizmos.line_2d(
                to_render(pair[0].position),
                to_render(pair[1].position),
                segment_color(&pair[1], &bodies, settings.show_soi),
            );
        }

        if settings.show_soi {
            for transition in &forecast.transitions {
                let color = bodies
                    .get(transition.entering)
                    .map_or(Color::WHITE, |b| b.color);
                gizmos.circle_2d(
                    Isometry2d::from_translation(to_render(transition.position)),
                    TRANSITION_MARKER_RADIUS,
                    color,
                );
            }
        }

        if let Some(hit) = &forecast.collision {
            gizmos.circle_2d(
                Isometry2d::from_translation(to_render(hit.point)),
                IMPACT_MARKER_RADIUS,
                IMPACT_COLOR,
            );
        }
    }
}
