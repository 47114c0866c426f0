//! Scene definitions: bodies and the craft's starting state.
//!
//! Scenes are JSON documents. Each body is either fixed or orbiting a parent
//! by id; parents may be listed in any order. The craft is placed either at an
//! absolute state or on a circular orbit around a body:
//!
//! ```json
//! {
//!   "name": "Moon Orbit",
//!   "bodies": [
//!     { "id": "planet", "mass": 8000.0, "radius": 120.0,
//!       "fixed": { "position": [0.0, 0.0] } },
//!     { "id": "moon", "mass": 2000.0, "radius": 40.0, "color": "#4ecdc4",
//!       "orbiting": { "parent": "planet", "semi_major_axis": 1600.0,
//!                     "angular_speed": 0.00014 } }
//!   ],
//!   "craft": { "orbit": { "around": "moon", "offset": [0.0, -150.0] } }
//! }
//! ```

pub mod presets;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use bevy::color::Srgba;
use bevy::math::DVec2;
use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::bodies::{Body, BodySet, BodySetError, OrbitPath};
use crate::craft::Craft;
use crate::physics::{CrashState, check_collision};
use crate::prediction::{Forecast, PredictionState, mark_prediction_dirty};
use crate::types::{
    DEFAULT_SOI_MULTIPLIER, GRAVITY_SCALE, MAX_TIME_WARP, MIN_TIME_WARP, SimulationSet,
    SimulationTime,
};
use crate::vector::Vector2Ext;

pub use presets::{DEFAULT_PRESET, PRESETS, Preset};

// =============================================================================
// Errors
// =============================================================================

/// Problems loading or resolving a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scene has no bodies")]
    EmptyScene,

    #[error("body id '{0}' is defined more than once")]
    DuplicateId(String),

    #[error("body '{body}' orbits unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },

    #[error("body '{0}' is part of a parent cycle")]
    ParentCycle(String),

    #[error("body '{body}' has invalid mass {mass} (must be positive)")]
    InvalidMass { body: String, mass: f64 },

    #[error("body '{body}' has invalid radius {radius}")]
    InvalidRadius { body: String, radius: f64 },

    #[error("body '{body}' has sphere of influence {sphere_of_influence} inside its radius {radius}")]
    SoiInsideBody {
        body: String,
        sphere_of_influence: f64,
        radius: f64,
    },

    #[error("body '{body}' has an invalid orbit: {reason}")]
    InvalidOrbit { body: String, reason: &'static str },

    #[error("body '{body}' has invalid color '{color}'")]
    InvalidColor { body: String, color: String },

    #[error("craft is anchored to unknown body '{0}'")]
    UnknownAnchor(String),

    #[error("craft starts inside body '{0}'")]
    CraftInsideBody(String),

    #[error("time warp {0} is outside the allowed range [0.25, 16]")]
    InvalidWarp(f64),

    #[error("no built-in scene named '{0}'")]
    UnknownPreset(String),

    #[error(transparent)]
    Bodies(#[from] BodySetError),
}

// =============================================================================
// Definitions
// =============================================================================

/// A scene as written in JSON.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SceneDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Starting time warp
    #[serde(default = "default_time_warp")]
    pub time_warp: f64,
    pub bodies: Vec<BodyDefinition>,
    pub craft: CraftPlacement,
}

fn default_time_warp() -> f64 {
    1.0
}

/// One body as written in JSON.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub mass: f64,
    pub radius: f64,
    /// Defaults to ten radii
    #[serde(default)]
    pub sphere_of_influence: Option<f64>,
    /// `#rrggbb` hex color
    #[serde(default)]
    pub color: Option<String>,
    #[serde(flatten)]
    pub motion: MotionDefinition,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MotionDefinition {
    Fixed { position: [f64; 2] },
    Orbiting(OrbitDefinition),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OrbitDefinition {
    pub parent: String,
    pub semi_major_axis: f64,
    /// Radians per tick; negative for clockwise
    pub angular_speed: f64,
    /// Starting angle (mean anomaly), radians
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub argument_of_periapsis: f64,
}

/// Where the craft starts.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CraftPlacement {
    /// Explicit state
    Absolute {
        position: [f64; 2],
        #[serde(default)]
        velocity: [f64; 2],
        #[serde(default)]
        heading: f64,
    },
    /// Circular orbit around a body at `offset` from its center
    Orbit {
        around: String,
        offset: [f64; 2],
        #[serde(default)]
        clockwise: bool,
    },
}

/// A resolved scene, ready to simulate.
#[derive(Clone, Debug)]
pub struct Scene {
    pub name: String,
    pub bodies: BodySet,
    pub craft: Craft,
    pub time_warp: f64,
}

impl SceneDefinition {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Validate and resolve into bodies and a placed craft.
    pub fn build(&self) -> Result<Scene, SceneError> {
        let time_warp_ok = (MIN_TIME_WARP..=MAX_TIME_WARP).contains(&self.time_warp);
        if !time_warp_ok {
            return Err(SceneError::InvalidWarp(self.time_warp));
        }

        let bodies = self.resolve_bodies()?;
        let craft = self.craft.place(&bodies)?;

        Ok(Scene {
            name: self.name.clone(),
            bodies,
            craft,
            time_warp: self.time_warp,
        })
    }

    /// Build the body arena parent-first, whatever order the definitions use.
    fn resolve_bodies(&self) -> Result<BodySet, SceneError> {
        if self.bodies.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        let mut ids = HashSet::new();
        for def in &self.bodies {
            if !ids.insert(def.id.as_str()) {
                return Err(SceneError::DuplicateId(def.id.clone()));
            }
            def.validate()?;
        }
        for def in &self.bodies {
            if let MotionDefinition::Orbiting(orbit) = &def.motion
                && !ids.contains(orbit.parent.as_str())
            {
                return Err(SceneError::UnknownParent {
                    body: def.id.clone(),
                    parent: orbit.parent.clone(),
                });
            }
        }

        let mut set = BodySet::new();
        let mut pending: Vec<&BodyDefinition> = self.bodies.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::with_capacity(before);

            for def in pending {
                let body = match &def.motion {
                    MotionDefinition::Fixed { position } => Some(Body::fixed(
                        &def.id,
                        def.mass,
                        def.radius,
                        DVec2::from(*position),
                    )),
                    MotionDefinition::Orbiting(orbit) => set.find(&orbit.parent).map(|parent| {
                        Body::orbiting(&def.id, def.mass, def.radius, parent, orbit.path())
                    }),
                };
                match body {
                    Some(body) => {
                        set.push(def.decorate(body)?)?;
                    }
                    None => waiting.push(def),
                }
            }

            if waiting.len() == before {
                return Err(SceneError::ParentCycle(waiting[0].id.clone()));
            }
            pending = waiting;
        }

        Ok(set)
    }
}

impl BodyDefinition {
    fn validate(&self) -> Result<(), SceneError> {
        let body = || self.id.clone();

        let mass_ok = self.mass.is_finite() && self.mass > 0.0;
        if !mass_ok {
            return Err(SceneError::InvalidMass {
                body: body(),
                mass: self.mass,
            });
        }

        let radius_ok = self.radius.is_finite() && self.radius >= 0.0;
        if !radius_ok {
            return Err(SceneError::InvalidRadius {
                body: body(),
                radius: self.radius,
            });
        }

        if let Some(soi) = self.sphere_of_influence {
            let soi_ok = soi.is_finite() && soi >= self.radius;
            if !soi_ok {
                return Err(SceneError::SoiInsideBody {
                    body: body(),
                    sphere_of_influence: soi,
                    radius: self.radius,
                });
            }
        }

        if let MotionDefinition::Orbiting(orbit) = &self.motion {
            let reason = if orbit.parent == self.id {
                Some("orbits itself")
            } else if !(orbit.semi_major_axis.is_finite() && orbit.semi_major_axis > 0.0) {
                Some("semi-major axis must be positive")
            } else if !(0.0..1.0).contains(&orbit.eccentricity) {
                Some("eccentricity must be in [0, 1)")
            } else if !orbit.angular_speed.is_finite() {
                Some("angular speed must be finite")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(SceneError::InvalidOrbit {
                    body: body(),
                    reason,
                });
            }
        }

        Ok(())
    }

    /// Apply name, sphere of influence and color to a resolved body.
    fn decorate(&self, body: Body) -> Result<Body, SceneError> {
        let mut body = body
            .with_name(self.name.clone().unwrap_or_else(|| self.id.clone()))
            .with_soi(
                self.sphere_of_influence
                    .unwrap_or(self.radius * DEFAULT_SOI_MULTIPLIER),
            );
        if let Some(hex) = &self.color {
            let color = Srgba::hex(hex).map_err(|_| SceneError::InvalidColor {
                body: self.id.clone(),
                color: hex.clone(),
            })?;
            body = body.with_color(color.into());
        }
        Ok(body)
    }
}

impl OrbitDefinition {
    fn path(&self) -> OrbitPath {
        OrbitPath::circular(self.semi_major_axis, self.angular_speed, self.angle)
            .with_shape(self.eccentricity, self.argument_of_periapsis)
    }
}

impl CraftPlacement {
    /// Resolve the craft's starting state among `bodies`.
    pub fn place(&self, bodies: &BodySet) -> Result<Craft, SceneError> {
        match self {
            CraftPlacement::Absolute {
                position,
                velocity,
                heading,
            } => {
                let position = DVec2::from(*position);
                if let Some(hit) = check_collision(position, &bodies.sources()) {
                    let key = bodies.get(hit.body).map_or_else(String::new, |b| b.key.clone());
                    return Err(SceneError::CraftInsideBody(key));
                }
                Ok(Craft::new(position, DVec2::from(*velocity), *heading))
            }
            CraftPlacement::Orbit {
                around,
                offset,
                clockwise,
            } => {
                let anchor_id = bodies.find(around);
                let Some((id, anchor)) = anchor_id.and_then(|id| bodies.get(id).map(|b| (id, b)))
                else {
                    return Err(SceneError::UnknownAnchor(around.clone()));
                };

                let offset = DVec2::from(*offset);
                let distance = offset.length();
                if distance <= anchor.radius {
                    return Err(SceneError::CraftInsideBody(around.clone()));
                }

                let speed = (anchor.mass * GRAVITY_SCALE / distance).sqrt();
                let tangent = offset.perp() / distance;
                let relative = if *clockwise { -tangent } else { tangent } * speed;
                let velocity = bodies.velocity(id).unwrap_or(DVec2::ZERO) + relative;

                Ok(Craft::new(
                    anchor.position() + offset,
                    velocity,
                    relative.angle(),
                ))
            }
        }
    }
}

// =============================================================================
// Scene lifecycle
// =============================================================================

/// Where a scene definition comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneSource {
    /// Built-in scene by id
    Preset(String),
    /// JSON file on disk
    File(PathBuf),
}

impl SceneSource {
    pub fn definition(&self) -> Result<SceneDefinition, SceneError> {
        match self {
            SceneSource::Preset(id) => presets::find(id)
                .ok_or_else(|| SceneError::UnknownPreset(id.clone()))?
                .definition(),
            SceneSource::File(path) => SceneDefinition::load(path),
        }
    }
}

impl Default for SceneSource {
    fn default() -> Self {
        SceneSource::Preset(DEFAULT_PRESET.to_string())
    }
}

impl fmt::Display for SceneSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneSource::Preset(id) => write!(f, "preset '{id}'"),
            SceneSource::File(path) => write!(f, "file '{}'", path.display()),
        }
    }
}

/// Scene loaded at startup.
#[derive(Resource, Clone, Debug, Default)]
pub struct InitialScene(pub SceneSource);

/// Pending scene change, applied at the start of the next simulation frame.
#[derive(Resource, Default, Debug)]
pub struct SceneRequest {
    pending: Option<SceneCommand>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    /// Restart the active scene from its definition
    Reset,
    /// Switch to another scene
    Load(SceneSource),
}

impl SceneRequest {
    pub fn reset(&mut self) {
        self.pending = Some(SceneCommand::Reset);
    }

    pub fn load(&mut self, source: SceneSource) {
        self.pending = Some(SceneCommand::Load(source));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take(&mut self) -> Option<SceneCommand> {
        self.pending.take()
    }
}

/// The scene currently being simulated.
#[derive(Resource, Default, Debug)]
pub struct ActiveScene {
    pub source: Option<SceneSource>,
    pub name: String,
    pub description: String,
    definition: Option<SceneDefinition>,
}

impl ActiveScene {
    pub fn definition(&self) -> Option<&SceneDefinition> {
        self.definition.as_ref()
    }
}

/// Plugin loading scenes and applying reset/switch requests.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InitialScene>()
            .init_resource::<SceneRequest>()
            .init_resource::<ActiveScene>()
            .add_systems(Startup, queue_initial_scene)
            .add_systems(Update, apply_scene_request.in_set(SimulationSet::Scene));
    }
}

fn queue_initial_scene(initial: Res<InitialScene>, mut request: ResMut<SceneRequest>) {
    request.load(initial.0.clone());
}

fn resolve(source: &SceneSource) -> Result<(SceneDefinition, Scene), SceneError> {
    let definition = source.definition()?;
    let scene = definition.build()?;
    Ok((definition, scene))
}

fn apply_scene_request(
    mut commands: Commands,
    mut request: ResMut<SceneRequest>,
    mut active: ResMut<ActiveScene>,
    mut bodies: ResMut<BodySet>,
    mut sim_time: ResMut<SimulationTime>,
    mut crash: ResMut<CrashState>,
    mut prediction: ResMut<PredictionState>,
    crafts: Query<Entity, With<Craft>>,
) {
    let Some(command) = request.take() else {
        return;
    };

    let source = match command {
        SceneCommand::Reset => match &active.source {
            Some(source) => source.clone(),
            None => {
                warn!("Reset requested before any scene was loaded");
                return;
            }
        },
        SceneCommand::Load(source) => source,
    };

    // A reset replays the stored definition; a file may have changed on disk since
    let loaded = match (&active.source, &active.definition) {
        (Some(current), Some(definition)) if *current == source => definition
            .build()
            .map(|scene| (definition.clone(), scene)),
        _ => resolve(&source),
    };

    let (source, definition, scene) = match loaded {
        Ok((definition, scene)) => (source, definition, scene),
        Err(err) => {
            error!("Failed to load scene from {}: {}", source, err);
            if active.definition.is_some() {
                return;
            }
            let fallback = SceneSource::default();
            match resolve(&fallback) {
                Ok((definition, scene)) => {
                    warn!("Falling back to {}", fallback);
                    (fallback, definition, scene)
                }
                Err(err) => {
                    error!("Built-in scene failed to load: {}", err);
                    return;
                }
            }
        }
    };

    for entity in &crafts {
        commands.entity(entity).despawn();
    }

    let Scene {
        name,
        bodies: scene_bodies,
        craft,
        time_warp,
    } = scene;

    info!(
        "Loaded scene '{}' from {} ({} bodies)",
        name,
        source,
        scene_bodies.len()
    );

    *bodies = scene_bodies;
    sim_time.reset();
    sim_time.set_warp(time_warp);
    crash.report = None;
    mark_prediction_dirty(&mut prediction);

    commands.spawn((craft, Forecast::default(), Name::new("Craft")));

    active.description = definition.description.clone();
    active.name = name;
    active.source = Some(source);
    active.definition = Some(definition);
}
