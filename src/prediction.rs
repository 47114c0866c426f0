//! Trajectory forecast for the craft.
//!
//! A forecast is an independent forward simulation of the same physics the
//! live craft runs, starting from the craft's current state. Moving bodies are
//! placed at their closed-form predicted positions for every step. Each sample
//! records which body dominates it, and samples where that changes are marked
//! as transitions. The run stops after the target number of revolutions around
//! the dominant body, at the step budget, or at a predicted collision.

use std::f64::consts::TAU;

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::bodies::{BodyId, BodySet, dominant_body};
use crate::craft::Craft;
use crate::physics::{Collision, orbital_period, step};
use crate::types::{MIN_FORECAST_OPACITY, NO_ORBIT_PERIOD, OrbitalState, SimulationSet, SimulationTime};
use crate::vector::{Vector2Ext, wrap_angle};

/// Plugin keeping the craft's [`Forecast`] up to date.
pub struct PredictionPlugin;

impl Plugin for PredictionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PredictionSettings>()
            .init_resource::<PredictionState>()
            .add_systems(
                Update,
                (track_changes, predict_trajectory.run_if(should_run_prediction))
                    .chain()
                    .in_set(SimulationSet::Prediction),
            );
    }
}

/// Forecast sizing and scheduling.
#[derive(Resource, Clone, Debug)]
pub struct PredictionSettings {
    /// Samples per orbit. Default: 2000.
    pub quality: usize,
    /// Revolutions to forecast. Default: 5.
    pub target_orbits: u32,
    /// Re-run the forecast at least this often (frames). Default: 2.
    pub update_interval: u32,
    /// Hard cap on samples per run. Default: 40 000.
    pub max_samples_cap: usize,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            quality: 2000,
            target_orbits: 5,
            update_interval: 2,
            max_samples_cap: 40_000,
        }
    }
}

impl PredictionSettings {
    /// Most steps a single run may take.
    pub fn total_steps(&self) -> usize {
        self.quality
            .saturating_mul(self.target_orbits as usize)
            .min(self.max_samples_cap)
    }
}

/// One sample of the forecast path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionPoint {
    pub position: DVec2,
    /// Fades from 1 toward [`MIN_FORECAST_OPACITY`] as revolutions complete
    pub opacity: f64,
    pub dominant_body: BodyId,
}

/// A sample where the dominant body changed from the previous one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionPoint {
    pub position: DVec2,
    pub entering: BodyId,
}

/// The latest forecast for a craft. Replaced wholesale by every run.
#[derive(Component, Clone, Debug)]
pub struct Forecast {
    pub points: Vec<PredictionPoint>,
    pub transitions: Vec<TransitionPoint>,
    /// Full revolutions counted around the dominant body
    pub revolutions: u32,
    /// Period estimate around the latest dominant body, in ticks
    pub period: f64,
    /// Dominant body at the craft's starting position
    pub initial_body: Option<BodyId>,
    /// Set if the forecast ends by hitting a body
    pub collision: Option<Collision>,
}

impl Default for Forecast {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            transitions: Vec::new(),
            revolutions: 0,
            period: NO_ORBIT_PERIOD,
            initial_body: None,
            collision: None,
        }
    }
}

impl Forecast {
    /// Discard all results, keeping allocations.
    pub fn clear(&mut self) {
        self.points.clear();
        self.transitions.clear();
        self.revolutions = 0;
        self.period = NO_ORBIT_PERIOD;
        self.initial_body = None;
        self.collision = None;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the forecast was cut short by a predicted collision.
    pub fn ends_in_collision(&self) -> bool {
        self.collision.is_some()
    }

    /// Re-run the forecast from `state`.
    ///
    /// The step size is `warp` ticks, matching one live frame at 60 fps. An
    /// empty body set or a non-positive warp gives an empty forecast with the
    /// sentinel period.
    pub fn recompute(
        &mut self,
        state: OrbitalState,
        bodies: &BodySet,
        warp: f64,
        settings: &PredictionSettings,
    ) {
        self.clear();

        let runnable = warp > 0.0 && settings.target_orbits > 0;
        if !runnable {
            return;
        }

        let mut sources = bodies.sources_at(0.0);
        let Some(mut current) = dominant_body(state.pos, &sources) else {
            return;
        };
        self.initial_body = Some(current);
        self.period = orbital_period(state.pos, std::slice::from_ref(&sources[current.0]));

        let target = settings.target_orbits;
        let mut scratch = state;
        let mut last_angle = scratch.pos.bearing_from(sources[current.0].position);
        let mut accumulated = 0.0;

        self.points.reserve(settings.total_steps());

        for i in 0..settings.total_steps() {
            if self.revolutions >= target {
                break;
            }

            scratch = match step(scratch, &sources, warp) {
                Ok(next) => next,
                Err(hit) => {
                    self.collision = Some(hit);
                    break;
                }
            };

            // Bodies where they will be when the craft reaches its new position;
            // the next step integrates against the same snapshot
            bodies.fill_sources_at(warp * (i + 1) as f64, &mut sources);

            let Some(dominant) = dominant_body(scratch.pos, &sources) else {
                break;
            };
            let angle = scratch.pos.bearing_from(sources[dominant.0].position);

            if dominant == current {
                accumulated += wrap_angle(angle - last_angle);
                if accumulated.abs() >= TAU {
                    self.revolutions += 1;
                    accumulated = 0.0;
                }
            } else {
                self.transitions.push(TransitionPoint {
                    position: scratch.pos,
                    entering: dominant,
                });
                current = dominant;
                accumulated = 0.0;
                self.period =
                    orbital_period(scratch.pos, std::slice::from_ref(&sources[dominant.0]));
            }
            last_angle = angle;

            let progress = f64::from(self.revolutions) / f64::from(target);
            self.points.push(PredictionPoint {
                position: scratch.pos,
                opacity: (1.0 - progress).max(MIN_FORECAST_OPACITY),
                dominant_body: current,
            });
        }
    }
}

/// Forecast from `state` into a fresh [`Forecast`].
pub fn predict(
    state: OrbitalState,
    bodies: &BodySet,
    warp: f64,
    settings: &PredictionSettings,
) -> Forecast {
    let mut forecast = Forecast::default();
    forecast.recompute(state, bodies, warp, settings);
    forecast
}

// =============================================================================
// Scheduling
// =============================================================================

/// When the forecast needs re-running.
#[derive(Resource, Default)]
pub struct PredictionState {
    /// Set when the craft's trajectory changed (thrust, warp, reset).
    needs_update: bool,
    /// Frames since the last run.
    frame_counter: u32,
    /// Warp the last forecast used.
    last_warp: Option<f64>,
}

/// Mark the forecast as needing an update.
/// Call this when the craft's velocity changes outside physics.
pub fn mark_prediction_dirty(state: &mut PredictionState) {
    state.needs_update = true;
}

/// Count frames and notice warp changes.
fn track_changes(sim_time: Res<SimulationTime>, mut state: ResMut<PredictionState>) {
    state.frame_counter = state.frame_counter.saturating_add(1);
    if state.last_warp != Some(sim_time.warp) {
        state.needs_update = true;
        state.last_warp = Some(sim_time.warp);
    }
}

/// Run condition: should we run prediction this frame?
fn should_run_prediction(state: Res<PredictionState>, settings: Res<PredictionSettings>) -> bool {
    state.needs_update || state.frame_counter >= settings.update_interval
}

fn predict_trajectory(
    mut crafts: Query<(&Craft, &mut Forecast)>,
    bodies: Res<BodySet>,
    sim_time: Res<SimulationTime>,
    settings: Res<PredictionSettings>,
    mut state: ResMut<PredictionState>,
) {
    state.needs_update = false;
    state.frame_counter = 0;

    for (craft, mut forecast) in crafts.iter_mut() {
        if craft.crashed {
            if !forecast.is_empty() {
                forecast.clear();
            }
            continue;
        }
        forecast.recompute(craft.state, &bodies, sim_time.warp, &settings);
    }
}
