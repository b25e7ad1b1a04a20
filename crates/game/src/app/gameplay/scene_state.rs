struct NightShiftScene {
    scene_name: &'static str,
    defs: GameDefs,
    audio: AudioDirector,
    eye: EyePose,
    player_id: Option<EntityId>,
    hold_anchor_id: Option<EntityId>,
    held_item: Option<EntityId>,
    placed_cup: Option<EntityId>,
    target: TargetLock,
    brewing_watch: bool,
    chase_prompt_latched: bool,
    pickup: Option<PickupAnimation>,
    holdables_by_entity: HashMap<EntityId, Holdable>,
    stations_by_entity: HashMap<EntityId, BrewStation>,
    pursuers_by_entity: HashMap<EntityId, Pursuer>,
    lid_placements_by_lid: HashMap<EntityId, LidPlacement>,
    system_events: GameplayEventBus,
    system_order_text: String,
}

impl NightShiftScene {
    fn new(scene_name: &'static str, defs: GameDefs) -> Self {
        let audio =
            AudioDirector::new().with_cue_duration(CueId::BrewCycle, defs.brew_cue_seconds);
        Self {
            scene_name,
            defs,
            audio,
            eye: EyePose::new(EYE_SPAWN),
            player_id: None,
            hold_anchor_id: None,
            held_item: None,
            placed_cup: None,
            target: TargetLock::None,
            brewing_watch: false,
            chase_prompt_latched: false,
            pickup: None,
            holdables_by_entity: HashMap::new(),
            stations_by_entity: HashMap::new(),
            pursuers_by_entity: HashMap::new(),
            lid_placements_by_lid: HashMap::new(),
            system_events: GameplayEventBus::default(),
            system_order_text: String::new(),
        }
    }

    fn reset_runtime_state(&mut self) {
        self.eye = EyePose::new(EYE_SPAWN);
        self.player_id = None;
        self.hold_anchor_id = None;
        self.held_item = None;
        self.placed_cup = None;
        self.target = TargetLock::None;
        self.brewing_watch = false;
        self.chase_prompt_latched = false;
        self.pickup = None;
        self.holdables_by_entity.clear();
        self.stations_by_entity.clear();
        self.pursuers_by_entity.clear();
        self.lid_placements_by_lid.clear();
        self.system_events = GameplayEventBus::default();
        self.system_order_text.clear();
    }

    fn held_container(&self) -> Option<(EntityId, ContainerState)> {
        let id = self.held_item?;
        let holdable = self.holdables_by_entity.get(&id)?;
        holdable.container_state().map(|state| (id, state))
    }

    fn held_filled_cup(&self) -> Option<EntityId> {
        self.held_container()
            .and_then(|(id, state)| state.filled.then_some(id))
    }

    fn cup_lid(&self, cup: EntityId) -> Option<EntityId> {
        self.holdables_by_entity.get(&cup)?.container_state()?.lid
    }

    /// Ownership rides along with the attachment tree: an item carries
    /// its seated attachments (a cup carries its lid) to the new owner.
    fn transfer_ownership(&mut self, item: EntityId, owner: OwnerTag, world: &World) {
        if let Some(holdable) = self.holdables_by_entity.get_mut(&item) {
            holdable.owner = owner;
        }
        for child in world.children(item) {
            if let Some(holdable) = self.holdables_by_entity.get_mut(child) {
                holdable.owner = owner;
            }
        }
    }

    fn set_target(&mut self, lock: TargetLock, prompt: Option<&str>, world: &mut World) {
        self.target = lock;
        match prompt {
            Some(text) => self.show_prompt(text, world),
            None => self.hide_prompt(world),
        }
    }

    fn show_prompt(&mut self, text: &str, world: &mut World) {
        world.set_prompt(text);
    }

    /// Hide requests are suppressed once the chase prompt is latched.
    fn hide_prompt(&mut self, world: &mut World) {
        if self.chase_prompt_latched {
            return;
        }
        world.clear_prompt();
    }

    /// Suspend physics first so the item cannot be disturbed while the
    /// animation runs; a second pickup during an animation is a no-op.
    fn start_pickup(&mut self, item: EntityId, world: &mut World) {
        if self.pickup.is_some() {
            debug!(item = item.0, "pickup_rejected_animation_in_progress");
            return;
        }
        if world.find_entity(item).is_none() {
            warn!(item = item.0, "pickup_rejected_unknown_entity");
            return;
        }
        let Some(anchor) = self.hold_anchor_id else {
            warn!(item = item.0, "hold_anchor_missing");
            return;
        };
        world.set_physics_active(item, false);
        if let Err(error) = world.detach(item) {
            warn!(item = item.0, error = %error, "pickup_detach_failed");
            return;
        }
        let (Some(start), Some(target)) = (world.world_pose(item), world.world_pose(anchor)) else {
            warn!(item = item.0, "pickup_pose_unavailable");
            return;
        };
        self.hide_prompt(world);
        self.target = TargetLock::None;
        self.pickup = Some(PickupAnimation {
            item,
            start,
            target,
            transition: TimedTransition::new(self.defs.pickup_duration_seconds),
        });
        debug!(item = item.0, "pickup_started");
    }

    fn throw_held(&mut self, world: &mut World) {
        let Some(item) = self.held_item.take() else {
            return;
        };
        world.set_physics_active(item, true);
        if let Err(error) = world.detach(item) {
            warn!(item = item.0, error = %error, "throw_detach_failed");
        }
        world.queue_impulse(item, self.eye.forward().scaled(self.defs.throw_impulse));
        self.transfer_ownership(item, OwnerTag::World, world);
        self.system_events.emit(GameplayEvent::ItemThrown { item });
        debug!(item = item.0, "item_thrown");
    }

    fn drop_held(&mut self, world: &mut World) {
        let Some(item) = self.held_item.take() else {
            return;
        };
        world.set_physics_active(item, true);
        if let Err(error) = world.detach(item) {
            warn!(item = item.0, error = %error, "drop_detach_failed");
        }
        let forward = flat_forward(self.eye.yaw);
        if let Some(entity) = world.find_entity_mut(item) {
            entity.transform.position = self
                .eye
                .position
                .add(forward.scaled(self.defs.drop_forward_offset));
        }
        self.transfer_ownership(item, OwnerTag::World, world);
        self.system_events.emit(GameplayEvent::ItemDropped { item });
        debug!(item = item.0, "item_dropped");
    }

    fn station_interact(&mut self, station_id: EntityId, world: &mut World) {
        let Some(station) = self.stations_by_entity.get(&station_id).copied() else {
            warn!(station = station_id.0, "unknown_station_target");
            return;
        };
        if let Some((cup, state)) = self.held_container() {
            if !state.filled && station.current_cup.is_none() {
                self.place_cup_on_station(station_id, cup, world);
            }
        } else if station.current_cup.is_some() && !station.is_brewing() {
            self.take_brewed_cup(station_id, world);
        }
        // A brewing station is a status target only.
    }

    fn place_cup_on_station(&mut self, station_id: EntityId, cup: EntityId, world: &mut World) {
        let Some(station) = self.stations_by_entity.get(&station_id).copied() else {
            warn!(station = station_id.0, "unknown_station_on_place");
            return;
        };
        let Some(stand_anchor) = station.stand_anchor else {
            warn!(station = station_id.0, "station_missing_stand_anchor");
            return;
        };
        self.held_item = None;
        world.set_physics_active(cup, false);
        if let Err(error) = world.detach(cup) {
            warn!(cup = cup.0, error = %error, "cup_detach_failed");
            return;
        }
        if let Err(error) = world.attach(cup, stand_anchor, Transform::IDENTITY) {
            warn!(cup = cup.0, error = %error, "cup_stand_attach_failed");
            return;
        }
        self.transfer_ownership(cup, OwnerTag::Station, world);
        if let Some(station) = self.stations_by_entity.get_mut(&station_id) {
            station.current_cup = Some(cup);
        }
        self.placed_cup = Some(cup);
        self.system_events.emit(GameplayEvent::CupPlaced { cup });
        info!(station = station_id.0, cup = cup.0, "cup_placed");

        match self.detach_lid(cup, world) {
            Ok(lid) => self.start_pickup(lid, world),
            Err(error) => warn!(cup = cup.0, error = %error, "lid_detach_failed"),
        }
        self.start_brewing(station_id);
    }

    fn start_brewing(&mut self, station_id: EntityId) {
        let Some(station) = self.stations_by_entity.get(&station_id).copied() else {
            return;
        };
        let Some(cup) = station.current_cup else {
            return;
        };
        if station.is_brewing() {
            return;
        }
        self.audio.play(CueId::BrewCycle);
        let duration = self.audio.cue_duration(CueId::BrewCycle);
        if let Some(station) = self.stations_by_entity.get_mut(&station_id) {
            station.brew = Some(TimedTransition::new(duration));
        }
        self.system_events.emit(GameplayEvent::BrewStarted { cup });
        info!(
            station = station_id.0,
            cup = cup.0,
            duration_seconds = f64::from(duration),
            "brew_started"
        );
    }

    fn take_brewed_cup(&mut self, station_id: EntityId, world: &mut World) {
        let Some(station) = self.stations_by_entity.get(&station_id).copied() else {
            return;
        };
        if station.is_brewing() {
            return;
        }
        let Some(cup) = station.current_cup else {
            return;
        };
        let mut with_lid = false;
        if let Some(lid) = self.cup_lid(cup) {
            if self.held_item == Some(lid) {
                match self.reattach_lid(lid, world) {
                    Ok(()) => {
                        self.held_item = None;
                        with_lid = true;
                    }
                    Err(error) => warn!(lid = lid.0, error = %error, "lid_reattach_failed"),
                }
            }
        }
        if let Some(station) = self.stations_by_entity.get_mut(&station_id) {
            station.current_cup = None;
        }
        self.placed_cup = None;
        self.transfer_ownership(cup, OwnerTag::World, world);
        self.system_events
            .emit(GameplayEvent::BrewedCupTaken { cup, with_lid });
        info!(
            station = station_id.0,
            cup = cup.0,
            with_lid,
            "brewed_cup_taken"
        );
        self.start_pickup(cup, world);
    }

    /// Captures the lid's full hierarchy placement before any parent
    /// change, then pops it free above the cup so it is immediately
    /// pickable.
    fn detach_lid(&mut self, cup: EntityId, world: &mut World) -> Result<EntityId, String> {
        let Some(lid) = self.cup_lid(cup) else {
            return Err(format!("cup {} has no assigned lid", cup.0));
        };
        let entity = world
            .find_entity(lid)
            .ok_or_else(|| format!("lid {} is missing from the world", lid.0))?;
        if let (Some(parent), Some(sibling_index)) = (entity.parent(), world.sibling_index(lid)) {
            let local = world
                .find_entity(lid)
                .map(|entity| entity.transform)
                .ok_or_else(|| format!("lid {} is missing from the world", lid.0))?;
            self.lid_placements_by_lid.insert(
                lid,
                LidPlacement {
                    parent,
                    local_position: local.position,
                    local_rotation: local.rotation,
                    sibling_index,
                },
            );
        }
        world.detach(lid).map_err(|error| error.to_string())?;
        world.set_physics_active(lid, true);
        let cup_pose = world
            .world_pose(cup)
            .ok_or_else(|| format!("cup {} is missing from the world", cup.0))?;
        if let Some(entity) = world.find_entity_mut(lid) {
            entity.transform.position = cup_pose
                .position
                .add(Vec3::UNIT_Y.scaled(self.defs.lid_pop_offset));
        }
        if let Some(holdable) = self.holdables_by_entity.get_mut(&lid) {
            holdable.owner = OwnerTag::World;
        }
        self.system_events.emit(GameplayEvent::LidDetached { lid });
        debug!(cup = cup.0, lid = lid.0, "lid_detached");
        Ok(lid)
    }

    /// Restores parent, local pose, and sibling slot exactly as captured
    /// at detachment. The record stays in place; the next detach
    /// overwrites it.
    fn reattach_lid(&mut self, lid: EntityId, world: &mut World) -> Result<(), String> {
        let Some(record) = self.lid_placements_by_lid.get(&lid).copied() else {
            return Err(format!("no saved placement for lid {}", lid.0));
        };
        world.detach(lid).map_err(|error| error.to_string())?;
        world
            .attach_at(
                lid,
                record.parent,
                Transform {
                    position: record.local_position,
                    rotation: record.local_rotation,
                },
                record.sibling_index,
            )
            .map_err(|error| error.to_string())?;
        world.set_physics_active(lid, false);
        // The lid rejoins its cup's subtree; ownership follows the cup.
        let cup_owner = self.holdables_by_entity.values().find_map(|holdable| {
            match holdable.kind {
                HoldableKind::Container(state) if state.lid == Some(lid) => Some(holdable.owner),
                _ => None,
            }
        });
        if let (Some(owner), Some(holdable)) = (cup_owner, self.holdables_by_entity.get_mut(&lid))
        {
            holdable.owner = owner;
        }
        self.system_events.emit(GameplayEvent::LidReattached { lid });
        debug!(lid = lid.0, "lid_reattached");
        Ok(())
    }

    fn trigger_pursuit(&mut self, agent_id: EntityId, world: &mut World) {
        self.throw_held(world);
        let alert_delay = self.defs.alert_delay_seconds;
        let mut alerted = false;
        if let Some(pursuer) = self.pursuers_by_entity.get_mut(&agent_id) {
            if matches!(pursuer.phase, PursuitPhase::Dormant) {
                pursuer.phase = PursuitPhase::Alerting {
                    delay: TimedTransition::new(alert_delay),
                };
                alerted = true;
            }
        } else {
            warn!(agent = agent_id.0, "unknown_pursuit_target");
        }
        if alerted {
            self.audio.play(CueId::AlertSiren);
            self.audio.play(CueId::Heartbeat);
            self.audio.play(CueId::HeavyBreathing);
            self.system_events
                .emit(GameplayEvent::PursuitAlerted { agent: agent_id });
            info!(agent = agent_id.0, "pursuit_alerted");
        }
        self.target = TargetLock::None;
        self.show_prompt(PROMPT_RUN, world);
        self.chase_prompt_latched = true;
        self.audio.stop(CueId::Ambient);
    }

    fn format_dump_state(&self, world: &World) -> String {
        let held_text = self
            .held_item
            .map(|id| id.0.to_string())
            .unwrap_or_else(|| "none".to_string());
        let mut station_ids: Vec<EntityId> = self.stations_by_entity.keys().copied().collect();
        station_ids.sort_by_key(|id| id.0);
        let station_text = station_ids
            .first()
            .and_then(|id| self.stations_by_entity.get(id))
            .map(|station| {
                format!(
                    "cup:{} brewing:{} ready:{}",
                    station
                        .current_cup
                        .map(|id| id.0.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    u8::from(station.is_brewing()),
                    u8::from(station.is_ready())
                )
            })
            .unwrap_or_else(|| "none".to_string());
        let mut agent_ids: Vec<EntityId> = self.pursuers_by_entity.keys().copied().collect();
        agent_ids.sort_by_key(|id| id.0);
        let pursuit_text = agent_ids
            .first()
            .and_then(|id| self.pursuers_by_entity.get(id))
            .map(|pursuer| format!("{}@{:.1}", pursuer.phase.as_token(), pursuer.move_speed))
            .unwrap_or_else(|| "none".to_string());
        let counts = self.system_events.total_counts();

        format!(
            "dump.state v1 | held:{held_text} | tgt:{} | prompt:{} | station {station_text} | pursuit:{pursuit_text} | ev:{} | evk:pu:{} pl:{} bs:{} bc:{} bt:{} ld:{} lr:{} th:{} pa:{} ps:{}",
            self.target.kind_token(),
            world.prompt().unwrap_or("none"),
            counts.total,
            counts.item_picked_up,
            counts.cup_placed,
            counts.brew_started,
            counts.brew_completed,
            counts.brewed_cup_taken,
            counts.lid_detached,
            counts.lid_reattached,
            counts.item_thrown,
            counts.pursuit_alerted,
            counts.pursuit_started
        )
    }
}
