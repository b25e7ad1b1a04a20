use std::collections::HashMap;

use engine::{
    AudioDirector, CueId, DebugInfoSnapshot, EntityId, GameDefs, InputSnapshot, ProbeLayer, Quat,
    Scene, SceneCommand, SceneDebugCommand, SceneDebugCommandResult, Transform, Vec3, World,
};
use tracing::{debug, info, warn};

const PROMPT_PICK_UP: &str = "Press E to pick up";
const PROMPT_REMOVE_LID: &str = "Press E to remove lid";
const PROMPT_THROW_CUP: &str = "Press E to throw the cup";
const PROMPT_RUN: &str = "Press shift to run";
const PROMPT_PLACE_CUP: &str = "Press E to place cup on coffee machine";
const PROMPT_TAKE_CUP: &str = "Press E to pick up brewed cup";
const PROMPT_BREWING: &str = "Coffee is brewing...";

const GAMEPLAY_SYSTEM_ORDER_TEXT: &str =
    "Look>Targeting>Interact>PickupAnimation>Brewing>Pursuit";

const PITCH_LIMIT_RADIANS: f32 = 1.5;

pub(crate) const EYE_SPAWN: Vec3 = Vec3 {
    x: 0.0,
    y: 1.6,
    z: 0.0,
};
pub(crate) const CUP_SPAWN: Vec3 = Vec3 {
    x: 0.6,
    y: 0.9,
    z: 2.0,
};
pub(crate) const MACHINE_SPAWN: Vec3 = Vec3 {
    x: -0.8,
    y: 0.9,
    z: 2.0,
};
pub(crate) const PURSUER_SPAWN: Vec3 = Vec3 {
    x: 2.0,
    y: 0.0,
    z: 1.0,
};
const PURSUER_STAND_POSITION: Vec3 = Vec3 {
    x: 2.0,
    y: 0.0,
    z: 1.5,
};

const CUP_PROBE_RADIUS: f32 = 0.15;
const LID_PROBE_RADIUS: f32 = 0.08;
const MACHINE_PROBE_RADIUS: f32 = 0.5;
const PURSUER_PROBE_RADIUS: f32 = 0.6;

const CUP_LID_LOCAL: Vec3 = Vec3 {
    x: 0.0,
    y: 0.12,
    z: 0.0,
};
const MACHINE_STAND_LOCAL: Vec3 = Vec3 {
    x: 0.0,
    y: 0.15,
    z: 0.0,
};

include!("types.rs");
include!("systems.rs");
include!("scene_state.rs");
include!("scene_impl.rs");
include!("util.rs");

pub(crate) fn build_scene(defs: GameDefs) -> Box<dyn Scene> {
    Box::new(NightShiftScene::new("cafe", defs))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
