impl NightShiftScene {
    fn integrate_look(&mut self, input: &InputSnapshot, fixed_dt_seconds: f32) {
        let look = input.look();
        if look.x == 0.0 && look.y == 0.0 {
            return;
        }
        let sensitivity = self.defs.mouse_sensitivity;
        self.eye.yaw += look.x * sensitivity * fixed_dt_seconds;
        self.eye.pitch = (self.eye.pitch + look.y * sensitivity * fixed_dt_seconds)
            .clamp(-PITCH_LIMIT_RADIANS, PITCH_LIMIT_RADIANS);
    }

    fn sync_view_entity(&mut self, world: &mut World) {
        let Some(view_id) = self.player_id else {
            return;
        };
        if let Some(view) = world.find_entity_mut(view_id) {
            view.transform = Transform {
                position: self.eye.position,
                rotation: self.eye.rotation(),
            };
        }
    }

    /// Appliance legality mirrors the held-item state: a held cup can
    /// only ever be placed; an empty (or lid-holding) hand can take a
    /// ready cup or watch a running brew.
    fn station_target_prompt(&self, station: &BrewStation) -> Option<&'static str> {
        if let Some((_, state)) = self.held_container() {
            if !state.filled && station.current_cup.is_none() {
                return Some(PROMPT_PLACE_CUP);
            }
            return None;
        }
        if station.current_cup.is_some() && !station.is_brewing() {
            return Some(PROMPT_TAKE_CUP);
        }
        if station.is_brewing() {
            return Some(PROMPT_BREWING);
        }
        None
    }

    /// One probe per semantic layer, in priority order, stopping at the
    /// first layer that yields a legal target. Target switches are
    /// edge-triggered; re-detecting the same target writes nothing.
    fn run_targeting_system(&mut self, world: &mut World) {
        let origin = self.eye.position;
        let direction = self.eye.forward();
        let range = self.defs.probe_range;

        if let Some(hit) = world.cast_ray(origin, direction, range, ProbeLayer::Appliance) {
            if let Some(station) = self.stations_by_entity.get(&hit.entity).copied() {
                if let Some(prompt) = self.station_target_prompt(&station) {
                    let became_ready = self.brewing_watch && !station.is_brewing();
                    if self.target != TargetLock::Appliance(hit.entity) || became_ready {
                        self.set_target(TargetLock::Appliance(hit.entity), Some(prompt), world);
                    }
                    self.brewing_watch = station.is_brewing();
                    return;
                }
            }
        }
        if matches!(self.target, TargetLock::Appliance(_)) {
            self.brewing_watch = false;
            self.set_target(TargetLock::None, None, world);
        }

        if let Some(hit) = world.cast_ray(origin, direction, range, ProbeLayer::Agent) {
            if self.held_filled_cup().is_some() && self.pursuers_by_entity.contains_key(&hit.entity)
            {
                if self.target != TargetLock::Agent(hit.entity) {
                    self.set_target(TargetLock::Agent(hit.entity), Some(PROMPT_THROW_CUP), world);
                }
                return;
            }
        }
        if matches!(self.target, TargetLock::Agent(_)) {
            self.set_target(TargetLock::None, None, world);
        }

        if let Some(hit) = world.cast_ray(origin, direction, range, ProbeLayer::Item) {
            if let Some(lid) = self.placed_cup.and_then(|cup| self.cup_lid(cup)) {
                if hit.entity == lid {
                    if self.target != TargetLock::Lid(lid) {
                        self.set_target(TargetLock::Lid(lid), Some(PROMPT_REMOVE_LID), world);
                    }
                    return;
                }
            }
            if self.holdables_by_entity.contains_key(&hit.entity) {
                if self.target != TargetLock::Item(hit.entity) {
                    self.set_target(TargetLock::Item(hit.entity), Some(PROMPT_PICK_UP), world);
                }
                return;
            }
        }
        if self.target != TargetLock::None {
            self.set_target(TargetLock::None, None, world);
        }
    }

    /// Dispatch priority: appliance > lid > agent > item. Exactly one
    /// branch runs per interact press.
    fn run_interact_system(&mut self, input: &InputSnapshot, world: &mut World) {
        if !input.interact_pressed() {
            return;
        }
        match self.target {
            TargetLock::Appliance(station_id) => {
                self.station_interact(station_id, world);
                self.target = TargetLock::None;
                self.brewing_watch = false;
                self.hide_prompt(world);
            }
            TargetLock::Lid(lid) => {
                let still_seated = world
                    .find_entity(lid)
                    .map(|entity| entity.parent().is_some())
                    .unwrap_or(false);
                if still_seated {
                    if let Some(cup) = self.placed_cup {
                        if let Err(error) = self.detach_lid(cup, world) {
                            warn!(lid = lid.0, error = %error, "lid_detach_failed");
                        }
                    }
                } else {
                    self.start_pickup(lid, world);
                }
            }
            TargetLock::Agent(agent_id) => {
                self.trigger_pursuit(agent_id, world);
            }
            TargetLock::Item(item) => {
                self.start_pickup(item, world);
            }
            TargetLock::None => {}
        }
    }

    fn run_pickup_animation_system(&mut self, fixed_dt_seconds: f32, world: &mut World) {
        let Some(mut animation) = self.pickup.take() else {
            return;
        };
        match animation.transition.tick(fixed_dt_seconds) {
            TransitionStep::Running { progress } => {
                let eased = self.defs.pickup_ease.evaluate(progress);
                let pose = pose_lerp(&animation.start, &animation.target, eased);
                if let Some(entity) = world.find_entity_mut(animation.item) {
                    entity.transform = pose;
                }
                self.pickup = Some(animation);
            }
            TransitionStep::Completed => {
                self.finish_pickup(animation.item, world);
            }
        }
    }

    fn finish_pickup(&mut self, item: EntityId, world: &mut World) {
        let Some(anchor) = self.hold_anchor_id else {
            warn!(item = item.0, "hold_anchor_missing_on_pickup_completion");
            return;
        };
        if let Err(error) = world.attach(item, anchor, Transform::IDENTITY) {
            warn!(item = item.0, error = %error, "pickup_attach_failed");
            return;
        }
        self.held_item = Some(item);
        self.transfer_ownership(item, OwnerTag::Player, world);
        self.system_events.emit(GameplayEvent::ItemPickedUp { item });
        debug!(item = item.0, "item_picked_up");
    }

    fn run_brewing_system(&mut self, fixed_dt_seconds: f32) {
        let mut station_ids: Vec<EntityId> = self.stations_by_entity.keys().copied().collect();
        station_ids.sort_by_key(|id| id.0);

        let mut completed: Vec<(EntityId, EntityId)> = Vec::new();
        for station_id in station_ids {
            let Some(station) = self.stations_by_entity.get_mut(&station_id) else {
                continue;
            };
            let Some(brew) = station.brew.as_mut() else {
                continue;
            };
            if matches!(brew.tick(fixed_dt_seconds), TransitionStep::Completed) {
                station.brew = None;
                if let Some(cup) = station.current_cup {
                    completed.push((station_id, cup));
                }
            }
        }

        for (station_id, cup) in completed {
            if let Some(holdable) = self.holdables_by_entity.get_mut(&cup) {
                if let HoldableKind::Container(state) = &mut holdable.kind {
                    state.filled = true;
                }
            }
            self.system_events.emit(GameplayEvent::BrewCompleted { cup });
            info!(station = station_id.0, cup = cup.0, "brew_completed");
        }
    }

    fn run_pursuit_system(&mut self, fixed_dt_seconds: f32, world: &mut World) {
        let player_position = self.eye.position;
        let chase_speed = self.defs.pursuer_chase_speed;
        let mut agent_ids: Vec<EntityId> = self.pursuers_by_entity.keys().copied().collect();
        agent_ids.sort_by_key(|id| id.0);

        let mut chase_started: Vec<EntityId> = Vec::new();
        for agent_id in agent_ids {
            // Facing runs in every phase.
            if let Some(entity) = world.find_entity_mut(agent_id) {
                if let Some(yaw) = yaw_toward(entity.transform.position, player_position) {
                    entity.transform.rotation = Quat::from_yaw(yaw);
                }
            }
            let Some(pursuer) = self.pursuers_by_entity.get_mut(&agent_id) else {
                continue;
            };
            match &mut pursuer.phase {
                PursuitPhase::Dormant => {}
                PursuitPhase::Alerting { delay } => {
                    if matches!(delay.tick(fixed_dt_seconds), TransitionStep::Completed) {
                        pursuer.phase = PursuitPhase::Chasing;
                        pursuer.move_speed = chase_speed;
                        pursuer.nav_destination = Some(player_position);
                        chase_started.push(agent_id);
                    }
                }
                PursuitPhase::Chasing => {
                    pursuer.nav_destination = Some(player_position);
                }
            }
        }

        for agent_id in chase_started {
            self.audio.play(CueId::ChaseTheme);
            self.system_events
                .emit(GameplayEvent::PursuitStarted { agent: agent_id });
            info!(agent = agent_id.0, "pursuit_started");
        }
    }
}
