/// Who currently owns a holdable. Ownership is transferred explicitly at
/// the same points the attachment tree changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OwnerTag {
    World,
    Player,
    Station,
}

impl OwnerTag {
    fn as_token(self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Player => "player",
            Self::Station => "station",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ContainerState {
    lid: Option<EntityId>,
    /// One-way lifecycle marker: set when a brew completes, never reset.
    filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldableKind {
    Generic,
    Container(ContainerState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Holdable {
    kind: HoldableKind,
    owner: OwnerTag,
}

impl Holdable {
    fn generic() -> Self {
        Self {
            kind: HoldableKind::Generic,
            owner: OwnerTag::World,
        }
    }

    fn container(lid: Option<EntityId>) -> Self {
        Self {
            kind: HoldableKind::Container(ContainerState { lid, filled: false }),
            owner: OwnerTag::World,
        }
    }

    fn container_state(&self) -> Option<ContainerState> {
        match self.kind {
            HoldableKind::Container(state) => Some(state),
            HoldableKind::Generic => None,
        }
    }
}

/// Full hierarchy placement of a lid at the moment of detachment. The
/// record is consumed without being cleared, so every detach cycle
/// overwrites it with fresh state.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LidPlacement {
    parent: EntityId,
    local_position: Vec3,
    local_rotation: Quat,
    sibling_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TransitionStep {
    Running { progress: f32 },
    Completed,
}

/// Suspend-until-elapsed-time, driven by an external tick. Completion
/// is reported once the accumulated time reaches the duration; callers
/// drop the transition on completion. No cancellation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TimedTransition {
    elapsed_seconds: f32,
    duration_seconds: f32,
}

impl TimedTransition {
    fn new(duration_seconds: f32) -> Self {
        Self {
            elapsed_seconds: 0.0,
            duration_seconds,
        }
    }

    fn tick(&mut self, dt_seconds: f32) -> TransitionStep {
        self.elapsed_seconds += dt_seconds;
        if self.duration_seconds <= 0.0 || self.elapsed_seconds >= self.duration_seconds {
            return TransitionStep::Completed;
        }
        TransitionStep::Running {
            progress: self.elapsed_seconds / self.duration_seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PickupAnimation {
    item: EntityId,
    start: Transform,
    target: Transform,
    transition: TimedTransition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BrewStation {
    stand_anchor: Option<EntityId>,
    current_cup: Option<EntityId>,
    brew: Option<TimedTransition>,
}

impl BrewStation {
    fn new(stand_anchor: Option<EntityId>) -> Self {
        Self {
            stand_anchor,
            current_cup: None,
            brew: None,
        }
    }

    fn is_brewing(&self) -> bool {
        self.brew.is_some()
    }

    fn is_ready(&self) -> bool {
        self.current_cup.is_some() && self.brew.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PursuitPhase {
    Dormant,
    Alerting { delay: TimedTransition },
    Chasing,
}

impl PursuitPhase {
    fn as_token(self) -> &'static str {
        match self {
            Self::Dormant => "dormant",
            Self::Alerting { .. } => "alerting",
            Self::Chasing => "chasing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pursuer {
    phase: PursuitPhase,
    move_speed: f32,
    nav_destination: Option<Vec3>,
}

impl Pursuer {
    fn dormant(walk_speed: f32, stand_position: Vec3) -> Self {
        Self {
            phase: PursuitPhase::Dormant,
            move_speed: walk_speed,
            nav_destination: Some(stand_position),
        }
    }
}

/// The single target slot. At most one target kind can be locked at any
/// instant; switching kinds is a plain assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetLock {
    None,
    Item(EntityId),
    Appliance(EntityId),
    Agent(EntityId),
    Lid(EntityId),
}

impl TargetLock {
    fn kind_token(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Item(_) => "item",
            Self::Appliance(_) => "appliance",
            Self::Agent(_) => "agent",
            Self::Lid(_) => "lid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameplayEvent {
    ItemPickedUp { item: EntityId },
    ItemDropped { item: EntityId },
    ItemThrown { item: EntityId },
    CupPlaced { cup: EntityId },
    LidDetached { lid: EntityId },
    LidReattached { lid: EntityId },
    BrewStarted { cup: EntityId },
    BrewCompleted { cup: EntityId },
    BrewedCupTaken { cup: EntityId, with_lid: bool },
    PursuitAlerted { agent: EntityId },
    PursuitStarted { agent: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameplayEventKind {
    ItemPickedUp,
    ItemDropped,
    ItemThrown,
    CupPlaced,
    LidDetached,
    LidReattached,
    BrewStarted,
    BrewCompleted,
    BrewedCupTaken,
    PursuitAlerted,
    PursuitStarted,
}

impl GameplayEvent {
    fn kind(self) -> GameplayEventKind {
        match self {
            Self::ItemPickedUp { .. } => GameplayEventKind::ItemPickedUp,
            Self::ItemDropped { .. } => GameplayEventKind::ItemDropped,
            Self::ItemThrown { .. } => GameplayEventKind::ItemThrown,
            Self::CupPlaced { .. } => GameplayEventKind::CupPlaced,
            Self::LidDetached { .. } => GameplayEventKind::LidDetached,
            Self::LidReattached { .. } => GameplayEventKind::LidReattached,
            Self::BrewStarted { .. } => GameplayEventKind::BrewStarted,
            Self::BrewCompleted { .. } => GameplayEventKind::BrewCompleted,
            Self::BrewedCupTaken { .. } => GameplayEventKind::BrewedCupTaken,
            Self::PursuitAlerted { .. } => GameplayEventKind::PursuitAlerted,
            Self::PursuitStarted { .. } => GameplayEventKind::PursuitStarted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct GameplayEventCounts {
    total: u32,
    item_picked_up: u32,
    item_dropped: u32,
    item_thrown: u32,
    cup_placed: u32,
    lid_detached: u32,
    lid_reattached: u32,
    brew_started: u32,
    brew_completed: u32,
    brewed_cup_taken: u32,
    pursuit_alerted: u32,
    pursuit_started: u32,
}

impl GameplayEventCounts {
    fn record(&mut self, kind: GameplayEventKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            GameplayEventKind::ItemPickedUp => {
                self.item_picked_up = self.item_picked_up.saturating_add(1)
            }
            GameplayEventKind::ItemDropped => {
                self.item_dropped = self.item_dropped.saturating_add(1)
            }
            GameplayEventKind::ItemThrown => self.item_thrown = self.item_thrown.saturating_add(1),
            GameplayEventKind::CupPlaced => self.cup_placed = self.cup_placed.saturating_add(1),
            GameplayEventKind::LidDetached => {
                self.lid_detached = self.lid_detached.saturating_add(1)
            }
            GameplayEventKind::LidReattached => {
                self.lid_reattached = self.lid_reattached.saturating_add(1)
            }
            GameplayEventKind::BrewStarted => {
                self.brew_started = self.brew_started.saturating_add(1)
            }
            GameplayEventKind::BrewCompleted => {
                self.brew_completed = self.brew_completed.saturating_add(1)
            }
            GameplayEventKind::BrewedCupTaken => {
                self.brewed_cup_taken = self.brewed_cup_taken.saturating_add(1)
            }
            GameplayEventKind::PursuitAlerted => {
                self.pursuit_alerted = self.pursuit_alerted.saturating_add(1)
            }
            GameplayEventKind::PursuitStarted => {
                self.pursuit_started = self.pursuit_started.saturating_add(1)
            }
        }
    }
}

#[derive(Default)]
struct GameplayEventBus {
    current_tick_events: Vec<GameplayEvent>,
    last_tick_counts: GameplayEventCounts,
    total_counts: GameplayEventCounts,
}

impl GameplayEventBus {
    fn emit(&mut self, event: GameplayEvent) {
        self.current_tick_events.push(event);
    }

    fn finish_tick_rollover(&mut self) {
        let mut counts = GameplayEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
            self.total_counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    fn last_tick_counts(&self) -> GameplayEventCounts {
        self.last_tick_counts
    }

    fn total_counts(&self) -> GameplayEventCounts {
        self.total_counts
    }
}

/// The player's view: probe origin and aim. Locomotion is a collaborator
/// concern; only the look state lives here.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EyePose {
    position: Vec3,
    yaw: f32,
    pitch: f32,
}

impl EyePose {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    fn rotation(&self) -> Quat {
        Quat::from_yaw_pitch(self.yaw, self.pitch)
    }

    fn forward(&self) -> Vec3 {
        Vec3 {
            x: self.yaw.sin() * self.pitch.cos(),
            y: self.pitch.sin(),
            z: self.yaw.cos() * self.pitch.cos(),
        }
    }

    fn look_at(&mut self, target: Vec3) {
        let to_target = target.sub(self.position);
        let horizontal = (to_target.x * to_target.x + to_target.z * to_target.z).sqrt();
        if horizontal > f32::EPSILON || to_target.y.abs() > f32::EPSILON {
            self.yaw = to_target.x.atan2(to_target.z);
            self.pitch = to_target
                .y
                .atan2(horizontal)
                .clamp(-PITCH_LIMIT_RADIANS, PITCH_LIMIT_RADIANS);
        }
    }
}
