mod audio;
mod input;
mod scene;

pub use audio::{AudioCommand, AudioDirector, CueId};
pub use input::InputSnapshot;
pub use scene::{
    DebugInfoSnapshot, Entity, EntityId, ProbeLayer, Quat, RayHit, Scene, SceneCommand,
    SceneDebugCommand, SceneDebugCommandResult, Transform, Vec2, Vec3, World, WorldError,
};
