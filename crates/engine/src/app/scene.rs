use std::collections::HashMap;

use thiserror::Error;

use super::input::InputSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UNIT_Y: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const UNIT_Z: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }

    pub fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }

    pub fn scaled(self, factor: f32) -> Vec3 {
        Vec3 {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn normalized(self) -> Option<Vec3> {
        let len_sq = self.length_sq();
        if len_sq <= f32::EPSILON {
            return None;
        }
        Some(self.scaled(len_sq.sqrt().recip()))
    }

    pub fn lerp(self, rhs: Vec3, t: f32) -> Vec3 {
        self.add(rhs.sub(self).scaled(t))
    }

    pub fn approx_eq(self, rhs: Vec3, epsilon: f32) -> bool {
        (self.x - rhs.x).abs() <= epsilon
            && (self.y - rhs.y).abs() <= epsilon
            && (self.z - rhs.z).abs() <= epsilon
    }
}

/// Unit quaternion. Constructors keep the result normalized; `nlerp`
/// renormalizes after interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Rotation about +Y.
    pub fn from_yaw(yaw_radians: f32) -> Self {
        let half = yaw_radians * 0.5;
        Quat {
            x: 0.0,
            y: half.sin(),
            z: 0.0,
            w: half.cos(),
        }
    }

    /// Rotation about +X.
    pub fn from_pitch(pitch_radians: f32) -> Self {
        let half = pitch_radians * 0.5;
        Quat {
            x: half.sin(),
            y: 0.0,
            z: 0.0,
            w: half.cos(),
        }
    }

    /// View rotation: yaw about +Y, then elevation. Rotating `UNIT_Z` by
    /// the result yields the forward vector for that yaw/pitch.
    pub fn from_yaw_pitch(yaw_radians: f32, pitch_radians: f32) -> Self {
        Self::from_yaw(yaw_radians).mul(Self::from_pitch(-pitch_radians))
    }

    pub fn mul(self, rhs: Quat) -> Quat {
        Quat {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }

    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3 {
            x: self.x,
            y: self.y,
            z: self.z,
        };
        let t = qv.cross(v).scaled(2.0);
        v.add(t.scaled(self.w)).add(qv.cross(t))
    }

    pub fn dot(self, rhs: Quat) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    pub fn normalized(self) -> Quat {
        let len_sq = self.dot(self);
        if len_sq <= f32::EPSILON {
            return Quat::IDENTITY;
        }
        let inv = len_sq.sqrt().recip();
        Quat {
            x: self.x * inv,
            y: self.y * inv,
            z: self.z * inv,
            w: self.w * inv,
        }
    }

    /// Normalized component lerp along the shorter arc.
    pub fn nlerp(self, rhs: Quat, t: f32) -> Quat {
        let rhs = if self.dot(rhs) < 0.0 {
            Quat {
                x: -rhs.x,
                y: -rhs.y,
                z: -rhs.z,
                w: -rhs.w,
            }
        } else {
            rhs
        };
        Quat {
            x: self.x + (rhs.x - self.x) * t,
            y: self.y + (rhs.y - self.y) * t,
            z: self.z + (rhs.z - self.z) * t,
            w: self.w + (rhs.w - self.w) * t,
        }
        .normalized()
    }

    /// q and -q describe the same rotation; compare up to sign.
    pub fn approx_eq(self, rhs: Quat, epsilon: f32) -> bool {
        self.dot(rhs).abs() >= 1.0 - epsilon
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Apply `local` in this transform's space.
    pub fn compose(&self, local: &Transform) -> Transform {
        Transform {
            position: self.position.add(self.rotation.rotate(local.position)),
            rotation: self.rotation.mul(local.rotation).normalized(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// Semantic layer a probe query selects on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeLayer {
    Item,
    Appliance,
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub world_point: Vec3,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub debug_name: &'static str,
    /// Local transform while attached to a parent, world transform at
    /// the root.
    pub transform: Transform,
    pub layer: Option<ProbeLayer>,
    /// Suspended entities are invisible to the probe.
    pub physics_active: bool,
    pub probe_radius: f32,
    /// Impulse handed off to the physics collaborator; the world only
    /// records it.
    pub queued_impulse: Option<Vec3>,
    parent: Option<EntityId>,
}

impl Entity {
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("entity {0:?} does not exist")]
    UnknownEntity(EntityId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    AttachWouldCycle { child: EntityId, parent: EntityId },
    #[error("entity {child:?} is already attached; detach it first")]
    AlreadyAttached { child: EntityId },
    #[error("sibling index {index} out of range for {child_count} children")]
    SiblingIndexOutOfRange { index: usize, child_count: usize },
}

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Default)]
pub struct World {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    children_by_parent: HashMap<EntityId, Vec<EntityId>>,
    prompt: Option<String>,
    prompt_write_count: u64,
}

impl World {
    pub fn spawn(&mut self, debug_name: &'static str, transform: Transform) -> EntityId {
        let id = self.allocator.allocate();
        self.entities.push(Entity {
            id,
            debug_name,
            transform,
            layer: None,
            physics_active: true,
            probe_radius: 0.0,
            queued_impulse: None,
            parent: None,
        });
        id
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn children(&self, parent: EntityId) -> &[EntityId] {
        self.children_by_parent
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn sibling_index(&self, child: EntityId) -> Option<usize> {
        let parent = self.find_entity(child)?.parent?;
        self.children(parent).iter().position(|id| *id == child)
    }

    /// Attach `child` under `parent` with the given local transform,
    /// appended after the parent's existing children.
    pub fn attach(
        &mut self,
        child: EntityId,
        parent: EntityId,
        local: Transform,
    ) -> Result<(), WorldError> {
        let child_count = self.children(parent).len();
        self.attach_at(child, parent, local, child_count)
    }

    /// Attach at an exact sibling slot, shifting later siblings right.
    pub fn attach_at(
        &mut self,
        child: EntityId,
        parent: EntityId,
        local: Transform,
        sibling_index: usize,
    ) -> Result<(), WorldError> {
        if self.find_entity(parent).is_none() {
            return Err(WorldError::UnknownEntity(parent));
        }
        {
            let entity = self
                .find_entity(child)
                .ok_or(WorldError::UnknownEntity(child))?;
            if entity.parent.is_some() {
                return Err(WorldError::AlreadyAttached { child });
            }
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(WorldError::AttachWouldCycle { child, parent });
        }
        let siblings = self.children_by_parent.entry(parent).or_default();
        if sibling_index > siblings.len() {
            return Err(WorldError::SiblingIndexOutOfRange {
                index: sibling_index,
                child_count: siblings.len(),
            });
        }
        siblings.insert(sibling_index, child);
        let entity = self
            .find_entity_mut(child)
            .ok_or(WorldError::UnknownEntity(child))?;
        entity.parent = Some(parent);
        entity.transform = local;
        Ok(())
    }

    /// Detach `child` from its parent, preserving its world pose. A
    /// no-op for root entities.
    pub fn detach(&mut self, child: EntityId) -> Result<(), WorldError> {
        let world_pose = self
            .world_pose(child)
            .ok_or(WorldError::UnknownEntity(child))?;
        let Some(parent) = self.find_entity(child).and_then(|entity| entity.parent) else {
            return Ok(());
        };
        if let Some(siblings) = self.children_by_parent.get_mut(&parent) {
            siblings.retain(|id| *id != child);
        }
        let entity = self
            .find_entity_mut(child)
            .ok_or(WorldError::UnknownEntity(child))?;
        entity.parent = None;
        entity.transform = world_pose;
        Ok(())
    }

    fn is_ancestor(&self, candidate: EntityId, of: EntityId) -> bool {
        let mut cursor = Some(of);
        let mut remaining = self.entities.len();
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            cursor = self.find_entity(id).and_then(|entity| entity.parent);
        }
        false
    }

    pub fn world_pose(&self, id: EntityId) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        let mut remaining = self.entities.len();
        while let Some(current) = cursor {
            let entity = self.find_entity(current)?;
            chain.push(entity);
            cursor = entity.parent;
            if remaining == 0 {
                break;
            }
            remaining -= 1;
        }
        let mut pose = Transform::IDENTITY;
        for entity in chain.iter().rev() {
            pose = pose.compose(&entity.transform);
        }
        Some(pose)
    }

    pub fn set_physics_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.find_entity_mut(id) {
            Some(entity) => {
                entity.physics_active = active;
                true
            }
            None => false,
        }
    }

    pub fn queue_impulse(&mut self, id: EntityId, impulse: Vec3) -> bool {
        match self.find_entity_mut(id) {
            Some(entity) => {
                entity.queued_impulse = Some(impulse);
                true
            }
            None => false,
        }
    }

    /// Directional query against one semantic layer: nearest struck
    /// surface along the ray, within `max_range`. Suspended entities and
    /// entities without a probe radius never hit.
    pub fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        layer: ProbeLayer,
    ) -> Option<RayHit> {
        let direction = direction.normalized()?;
        let mut best: Option<(f32, EntityId)> = None;

        for entity in &self.entities {
            if entity.layer != Some(layer) || !entity.physics_active || entity.probe_radius <= 0.0 {
                continue;
            }
            let Some(pose) = self.world_pose(entity.id) else {
                continue;
            };
            let to_center = pose.position.sub(origin);
            let t_mid = to_center.dot(direction);
            let closest_sq = (to_center.length_sq() - t_mid * t_mid).max(0.0);
            let radius_sq = entity.probe_radius * entity.probe_radius;
            if closest_sq > radius_sq {
                continue;
            }
            let offset = (radius_sq - closest_sq).sqrt();
            let mut t_hit = t_mid - offset;
            if t_hit < 0.0 {
                if t_mid + offset < 0.0 {
                    continue;
                }
                t_hit = 0.0;
            }
            if t_hit > max_range {
                continue;
            }
            match best {
                Some((best_t, best_id))
                    if best_t < t_hit || (best_t == t_hit && best_id.0 <= entity.id.0) => {}
                _ => best = Some((t_hit, entity.id)),
            }
        }

        best.map(|(t, entity)| RayHit {
            entity,
            world_point: origin.add(direction.scaled(t)),
        })
    }

    /// One-way prompt channel to the UI collaborator. Every call is
    /// counted so tests can assert edge-triggered callers.
    pub fn set_prompt(&mut self, text: &str) {
        self.prompt = Some(text.to_string());
        self.prompt_write_count = self.prompt_write_count.saturating_add(1);
    }

    pub fn clear_prompt(&mut self) {
        self.prompt = None;
        self.prompt_write_count = self.prompt_write_count.saturating_add(1);
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn prompt_write_count(&self) -> u64 {
        self.prompt_write_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneDebugCommand {
    LookAt { target: Vec3 },
    DropHeld,
    DumpState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneDebugCommandResult {
    Unsupported,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfoSnapshot {
    pub prompt: Option<String>,
    pub held_entity: Option<EntityId>,
    pub target_kind: String,
    pub extra_debug_lines: Vec<String>,
}

pub trait Scene {
    fn load(&mut self, world: &mut World);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut World,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut World);
    fn debug_title(&self, _world: &World) -> Option<String> {
        None
    }
    fn debug_info_snapshot(&self, _world: &World) -> Option<DebugInfoSnapshot> {
        None
    }
    fn execute_debug_command(
        &mut self,
        _command: SceneDebugCommand,
        _world: &mut World,
    ) -> SceneDebugCommandResult {
        SceneDebugCommandResult::Unsupported
    }
}
