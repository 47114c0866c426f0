//! Gravitating bodies and the arena that owns them.
//!
//! Bodies are either fixed in space or ride a prescribed orbit around a parent.
//! They attract the craft but never each other, and they are not integrated:
//! orbiting bodies follow their closed-form path, so their position any number
//! of ticks ahead is known without simulation.
//!
//! The [`BodySet`] stores bodies parent-first. A [`BodyId`] is an index into
//! that arena, which is what forecasts and telemetry carry instead of
//! references.

pub mod dominance;
pub mod orbit;

#[cfg(test)]
mod proptest_dominance;

use bevy::math::DVec2;
use bevy::prelude::*;
use thiserror::Error;

use crate::types::DEFAULT_SOI_MULTIPLIER;

pub use dominance::{dominant_body, priority_order};
pub use orbit::OrbitPath;

/// Index of a body in its [`BodySet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// How a body moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyMotion {
    /// Stationary at a fixed position
    Fixed { position: DVec2 },
    /// Following a prescribed orbit around another body
    Orbiting { parent: BodyId, orbit: OrbitPath },
}

/// A gravitational source the craft can orbit or crash into.
#[derive(Clone, Debug)]
pub struct Body {
    /// Identifier from the scene definition
    pub key: String,
    /// Display name
    pub name: String,
    /// Mass in game units
    pub mass: f64,
    /// Surface radius; reaching it is a collision
    pub radius: f64,
    /// Radius within which this body dominates by priority
    pub sphere_of_influence: f64,
    /// Display color
    pub color: Color,
    /// Fixed position or orbit
    pub motion: BodyMotion,
    position: DVec2,
    depth: u32,
}

impl Body {
    fn new(key: impl Into<String>, mass: f64, radius: f64, motion: BodyMotion) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            mass,
            radius,
            sphere_of_influence: radius * DEFAULT_SOI_MULTIPLIER,
            color: Color::srgb(0.6, 0.6, 0.6),
            motion,
            position: DVec2::ZERO,
            depth: 0,
        }
    }

    /// A stationary body.
    pub fn fixed(key: impl Into<String>, mass: f64, radius: f64, position: DVec2) -> Self {
        let mut body = Self::new(key, mass, radius, BodyMotion::Fixed { position });
        body.position = position;
        body
    }

    /// A body orbiting `parent` along `orbit`.
    pub fn orbiting(
        key: impl Into<String>,
        mass: f64,
        radius: f64,
        parent: BodyId,
        orbit: OrbitPath,
    ) -> Self {
        Self::new(key, mass, radius, BodyMotion::Orbiting { parent, orbit })
    }

    /// Override the sphere of influence (default: ten radii).
    pub fn with_soi(mut self, sphere_of_influence: f64) -> Self {
        self.sphere_of_influence = sphere_of_influence;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Current position.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Number of parents above this body (0 for a fixed body).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Parent body, if orbiting.
    pub fn parent(&self) -> Option<BodyId> {
        match self.motion {
            BodyMotion::Fixed { .. } => None,
            BodyMotion::Orbiting { parent, .. } => Some(parent),
        }
    }
}

/// A body's state as seen by the gravity integrator at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravitySource {
    pub id: BodyId,
    pub position: DVec2,
    pub mass: f64,
    pub radius: f64,
    pub sphere_of_influence: f64,
    /// Hierarchy depth, used to rank bodies for dominance
    pub depth: u32,
}

impl GravitySource {
    /// Distance from `point` to this body's center.
    #[inline]
    pub fn distance_to(&self, point: DVec2) -> f64 {
        self.position.distance(point)
    }
}

/// Errors when adding a body to a [`BodySet`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodySetError {
    #[error("body '{key}' orbits {parent:?}, which is not in the set yet")]
    ParentNotLoaded { key: String, parent: BodyId },
}

/// All bodies in the scene, stored parent-first.
#[derive(Resource, Clone, Debug, Default)]
pub struct BodySet {
    bodies: Vec<Body>,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and place it at its starting position.
    ///
    /// An orbiting body's parent must already be in the set, which keeps the
    /// arena ordered parent-first.
    pub fn push(&mut self, mut body: Body) -> Result<BodyId, BodySetError> {
        let id = BodyId(self.bodies.len());
        match body.motion {
            BodyMotion::Fixed { position } => {
                body.position = position;
                body.depth = 0;
            }
            BodyMotion::Orbiting { parent, orbit } => {
                let Some(parent_body) = self.bodies.get(parent.0) else {
                    return Err(BodySetError::ParentNotLoaded {
                        key: body.key,
                        parent,
                    });
                };
                body.position = parent_body.position + orbit.local_position();
                body.depth = parent_body.depth + 1;
            }
        }
        self.bodies.push(body);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Look up a body by its scene key.
    pub fn find(&self, key: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.key == key).map(BodyId)
    }

    /// Iterate bodies with their ids, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    /// Move every orbiting body `dt` ticks along its path.
    pub fn advance(&mut self, dt: f64) {
        for i in 0..self.bodies.len() {
            if let BodyMotion::Orbiting { parent, mut orbit } = self.bodies[i].motion {
                orbit.advance(dt);
                let parent_pos = self.bodies[parent.0].position;
                let body = &mut self.bodies[i];
                body.motion = BodyMotion::Orbiting { parent, orbit };
                body.position = parent_pos + orbit.local_position();
            }
        }
    }

    /// Current positions as gravity sources.
    pub fn sources(&self) -> Vec<GravitySource> {
        let mut out = Vec::with_capacity(self.bodies.len());
        self.fill_sources(&mut out);
        out
    }

    /// Like [`sources`](Self::sources), reusing a buffer.
    pub fn fill_sources(&self, out: &mut Vec<GravitySource>) {
        out.clear();
        out.extend(
            self.bodies
                .iter()
                .enumerate()
                .map(|(i, b)| Self::source(BodyId(i), b, b.position)),
        );
    }

    /// Predicted gravity sources `offset` ticks from now.
    ///
    /// Closed-form: nothing is mutated.
    pub fn sources_at(&self, offset: f64) -> Vec<GravitySource> {
        let mut out = Vec::with_capacity(self.bodies.len());
        self.fill_sources_at(offset, &mut out);
        out
    }

    /// Like [`sources_at`](Self::sources_at), reusing a buffer.
    pub fn fill_sources_at(&self, offset: f64, out: &mut Vec<GravitySource>) {
        out.clear();
        for (i, body) in self.bodies.iter().enumerate() {
            let position = match body.motion {
                BodyMotion::Fixed { position } => position,
                // Parent-first order: the parent's predicted position is already in `out`
                BodyMotion::Orbiting { parent, orbit } => {
                    out[parent.0].position + orbit.local_position_at(offset)
                }
            };
            out.push(Self::source(BodyId(i), body, position));
        }
    }

    fn source(id: BodyId, body: &Body, position: DVec2) -> GravitySource {
        GravitySource {
            id,
            position,
            mass: body.mass,
            radius: body.radius,
            sphere_of_influence: body.sphere_of_influence,
            depth: body.depth,
        }
    }

    /// Current velocity of a body, including its parents' motion.
    pub fn velocity(&self, id: BodyId) -> Option<DVec2> {
        let body = self.get(id)?;
        match body.motion {
            BodyMotion::Fixed { .. } => Some(DVec2::ZERO),
            BodyMotion::Orbiting { parent, orbit } => {
                Some(self.velocity(parent)? + orbit.local_velocity_at(0.0))
            }
        }
    }

    /// Closest body surface to `point`: the body and the distance above its surface.
    pub fn nearest_surface(&self, point: DVec2) -> Option<(BodyId, f64)> {
        self.iter()
            .map(|(id, b)| (id, b.position.distance(point) - b.radius))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
