//! The player-controlled craft.
//!
//! Physics owns the craft's position and velocity; input only turns it and
//! fires the engine. A crash is terminal until the scene is reset.

use std::collections::VecDeque;

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::physics::Collision;
use crate::types::{OrbitalState, SimulationSet, TICKS_PER_SECOND};
use crate::vector::Vector2Ext;

/// Plugin for craft tuning and the exhaust effect.
pub struct CraftPlugin;

impl Plugin for CraftPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CraftConfig>()
            .add_systems(PreUpdate, clear_thrusting)
            .add_systems(Update, age_exhaust.in_set(SimulationSet::Physics));
    }
}

/// The engine flag only lasts for the frame input fired it in.
fn clear_thrusting(mut crafts: Query<&mut Craft>) {
    for mut craft in &mut crafts {
        if craft.thrusting {
            craft.thrusting = false;
        }
    }
}

/// Exhaust runs on wall-clock time so it still fades while paused.
fn age_exhaust(time: Res<Time>, config: Res<CraftConfig>, mut crafts: Query<&mut Craft>) {
    let ticks = time.delta_secs_f64() * TICKS_PER_SECOND;
    for mut craft in &mut crafts {
        if !craft.exhaust.is_empty() {
            craft.update_exhaust(&config, ticks);
        }
    }
}

/// Tuning for craft handling and the exhaust effect.
#[derive(Resource, Clone, Debug)]
pub struct CraftConfig {
    /// Velocity gained per tick of thrust
    pub thrust_power: f64,
    /// Heading change per tick of wall-clock time, radians
    pub rotation_speed: f64,
    /// Most exhaust particles kept
    pub exhaust_capacity: usize,
    /// Distance behind the craft where exhaust appears
    pub exhaust_offset: f64,
    /// Exhaust particle speed range (units per tick)
    pub exhaust_speed: std::ops::Range<f64>,
    /// Half-width of the random exhaust cone, radians
    pub exhaust_spread: f64,
    /// Starting life of an exhaust particle
    pub exhaust_life: f32,
    /// Life lost per tick
    pub exhaust_decay: f32,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            thrust_power: 0.001,
            rotation_speed: 0.03,
            exhaust_capacity: 12,
            exhaust_offset: 7.0,
            exhaust_speed: 2.0..3.0,
            exhaust_spread: 0.1,
            exhaust_life: 15.0,
            exhaust_decay: 0.7,
        }
    }
}

/// One engine exhaust puff. Cosmetic only.
#[derive(Clone, Debug, PartialEq)]
pub struct ExhaustParticle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub life: f32,
    pub size: f32,
}

/// The controlled point mass.
#[derive(Component, Clone, Debug)]
pub struct Craft {
    /// Position and velocity, mutated only by physics
    pub state: OrbitalState,
    /// Facing angle in radians from +x
    pub heading: f64,
    /// Terminal: set on collision, cleared only by a scene reset
    pub crashed: bool,
    /// Engine fired this frame
    pub thrusting: bool,
    /// Recent exhaust, oldest first
    pub exhaust: VecDeque<ExhaustParticle>,
}

impl Craft {
    pub fn new(position: DVec2, velocity: DVec2, heading: f64) -> Self {
        Self {
            state: OrbitalState::new(position, velocity),
            heading,
            crashed: false,
            thrusting: false,
            exhaust: VecDeque::new(),
        }
    }

    pub fn position(&self) -> DVec2 {
        self.state.pos
    }

    pub fn velocity(&self) -> DVec2 {
        self.state.vel
    }

    /// Unit vector along the heading.
    pub fn forward(&self) -> DVec2 {
        DVec2::unit_at(self.heading)
    }

    /// Turn by `delta` radians. Ignored once crashed.
    pub fn rotate(&mut self, delta: f64) {
        if !self.crashed {
            self.heading = (self.heading + delta).rem_euclid(std::f64::consts::TAU);
        }
    }

    /// Fire the engine for `ticks` of simulated time.
    ///
    /// Returns false (and does nothing) if the craft has crashed.
    pub fn apply_thrust(&mut self, config: &CraftConfig, ticks: f64) -> bool {
        if self.crashed {
            return false;
        }
        self.state.vel += self.forward() * config.thrust_power * ticks;
        self.thrusting = true;
        self.emit_exhaust(config);
        true
    }

    fn emit_exhaust(&mut self, config: &CraftConfig) {
        while self.exhaust.len() >= config.exhaust_capacity.max(1) {
            self.exhaust.pop_front();
        }

        let speed = config.exhaust_speed.start
            + fastrand::f64() * (config.exhaust_speed.end - config.exhaust_speed.start);
        let jitter = (fastrand::f64() - 0.5) * 2.0 * config.exhaust_spread;

        self.exhaust.push_back(ExhaustParticle {
            position: self.state.pos - self.forward() * config.exhaust_offset,
            velocity: -self.forward().rotated(jitter) * speed,
            life: config.exhaust_life,
            size: 2.0 + fastrand::f32(),
        });
    }

    /// Drift and fade exhaust over `ticks` of wall-clock time.
    pub fn update_exhaust(&mut self, config: &CraftConfig, ticks: f64) {
        for particle in &mut self.exhaust {
            particle.position += particle.velocity * ticks;
            particle.life -= config.exhaust_decay * ticks as f32;
        }
        self.exhaust.retain(|p| p.life > 0.0);
    }

    /// Mark the craft as crashed. Its state freezes at the impact point.
    pub fn crash(&mut self, collision: &Collision) {
        self.crashed = true;
        self.thrusting = false;
        self.state.pos = collision.point;
    }
}
