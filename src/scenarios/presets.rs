//! Built-in scenes.
//!
//! Each preset is a JSON scene embedded at compile time from `scenes/`.

use super::{SceneDefinition, SceneError};

/// Id of the scene loaded when nothing else is requested.
pub const DEFAULT_PRESET: &str = "moon_orbit";

/// A scene shipped with the binary.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    json: &'static str,
}

impl Preset {
    pub fn definition(&self) -> Result<SceneDefinition, SceneError> {
        SceneDefinition::from_json(self.json)
    }
}

/// All available presets, default first.
pub static PRESETS: &[Preset] = &[MOON_ORBIT, SINGLE_PLANET, MOON_TRANSFER];

/// Planet and moon, craft in a low orbit around the moon.
pub static MOON_ORBIT: Preset = Preset {
    id: "moon_orbit",
    name: "Moon Orbit",
    json: include_str!("../../scenes/moon_orbit.json"),
};

/// One planet, circular orbit. Good for learning the controls.
pub static SINGLE_PLANET: Preset = Preset {
    id: "single_planet",
    name: "Single Planet",
    json: include_str!("../../scenes/single_planet.json"),
};

/// Planet orbit timed to meet the moon.
pub static MOON_TRANSFER: Preset = Preset {
    id: "moon_transfer",
    name: "Moon Transfer",
    json: include_str!("../../scenes/moon_transfer.json"),
};

/// Look up a preset by id.
pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}
