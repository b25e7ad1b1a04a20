impl Scene for NightShiftScene {
    fn load(&mut self, world: &mut World) {
        self.reset_runtime_state();

        let view_id = world.spawn(
            "player_view",
            Transform {
                position: EYE_SPAWN,
                rotation: Quat::IDENTITY,
            },
        );
        let anchor_id = world.spawn("hold_anchor", Transform::IDENTITY);
        let [anchor_x, anchor_y, anchor_z] = self.defs.hold_anchor_local;
        if let Err(error) = world.attach(
            anchor_id,
            view_id,
            Transform::from_position(Vec3::new(anchor_x, anchor_y, anchor_z)),
        ) {
            warn!(error = %error, "hold_anchor_attach_failed");
        }
        world.set_physics_active(anchor_id, false);

        let cup_id = world.spawn("cup", Transform::from_position(CUP_SPAWN));
        if let Some(cup) = world.find_entity_mut(cup_id) {
            cup.layer = Some(ProbeLayer::Item);
            cup.probe_radius = CUP_PROBE_RADIUS;
        }
        let sleeve_id = world.spawn("cup_sleeve", Transform::IDENTITY);
        let lid_id = world.spawn("cup_lid", Transform::IDENTITY);
        for (child, local) in [
            (sleeve_id, Transform::IDENTITY),
            (lid_id, Transform::from_position(CUP_LID_LOCAL)),
        ] {
            if let Err(error) = world.attach(child, cup_id, local) {
                warn!(cup = cup_id.0, error = %error, "cup_child_attach_failed");
            }
        }
        world.set_physics_active(sleeve_id, false);
        if let Some(lid) = world.find_entity_mut(lid_id) {
            lid.layer = Some(ProbeLayer::Item);
            lid.probe_radius = LID_PROBE_RADIUS;
            // Inert while seated on the cup; detach_lid wakes it up.
            lid.physics_active = false;
        }
        self.holdables_by_entity
            .insert(cup_id, Holdable::container(Some(lid_id)));
        self.holdables_by_entity.insert(lid_id, Holdable::generic());

        let machine_id = world.spawn("coffee_machine", Transform::from_position(MACHINE_SPAWN));
        if let Some(machine) = world.find_entity_mut(machine_id) {
            machine.layer = Some(ProbeLayer::Appliance);
            machine.probe_radius = MACHINE_PROBE_RADIUS;
        }
        let stand_id = world.spawn("cup_stand", Transform::IDENTITY);
        if let Err(error) = world.attach(
            stand_id,
            machine_id,
            Transform::from_position(MACHINE_STAND_LOCAL),
        ) {
            warn!(machine = machine_id.0, error = %error, "cup_stand_attach_failed");
        }
        world.set_physics_active(stand_id, false);
        self.stations_by_entity
            .insert(machine_id, BrewStation::new(Some(stand_id)));

        let pursuer_id = world.spawn("pursuer", Transform::from_position(PURSUER_SPAWN));
        if let Some(pursuer) = world.find_entity_mut(pursuer_id) {
            pursuer.layer = Some(ProbeLayer::Agent);
            pursuer.probe_radius = PURSUER_PROBE_RADIUS;
        }
        self.pursuers_by_entity.insert(
            pursuer_id,
            Pursuer::dormant(self.defs.pursuer_walk_speed, PURSUER_STAND_POSITION),
        );

        self.player_id = Some(view_id);
        self.hold_anchor_id = Some(anchor_id);
        self.system_order_text = GAMEPLAY_SYSTEM_ORDER_TEXT.to_string();
        self.sync_view_entity(world);
        self.audio.play(CueId::Ambient);
        info!(
            scene = self.scene_name,
            entity_count = world.entity_count(),
            sys = %self.system_order_text,
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut World,
    ) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        self.integrate_look(input, fixed_dt_seconds);
        self.sync_view_entity(world);

        // Detection and dispatch stay suppressed for the whole pickup
        // animation; the brew and pursuit timers keep running.
        if self.pickup.is_some() {
            self.run_pickup_animation_system(fixed_dt_seconds, world);
        } else {
            self.run_targeting_system(world);
            self.run_interact_system(input, world);
        }
        self.run_brewing_system(fixed_dt_seconds);
        self.run_pursuit_system(fixed_dt_seconds, world);
        self.system_events.finish_tick_rollover();

        SceneCommand::None
    }

    fn unload(&mut self, world: &mut World) {
        info!(
            scene = self.scene_name,
            entity_count = world.entity_count(),
            "scene_unload"
        );
        self.reset_runtime_state();
    }

    fn debug_title(&self, world: &World) -> Option<String> {
        let held_text = self
            .held_item
            .map(|id| id.0.to_string())
            .unwrap_or_else(|| "none".to_string());
        Some(format!(
            "Night Shift | Scene {} | Entities {} | Held {} | Target {}",
            self.scene_name,
            world.entity_count(),
            held_text,
            self.target.kind_token()
        ))
    }

    fn debug_info_snapshot(&self, world: &World) -> Option<DebugInfoSnapshot> {
        let counts = self.system_events.last_tick_counts();
        let owner_line = self
            .held_item
            .and_then(|id| self.holdables_by_entity.get(&id))
            .map(|holdable| format!("held_owner: {}", holdable.owner.as_token()))
            .unwrap_or_else(|| "held_owner: none".to_string());
        let extra_debug_lines = vec![
            format!("ev: {}", counts.total),
            format!(
                "evk: pu:{} dr:{} pl:{} bs:{} bc:{} bt:{} ld:{} lr:{} th:{} pa:{} ps:{}",
                counts.item_picked_up,
                counts.item_dropped,
                counts.cup_placed,
                counts.brew_started,
                counts.brew_completed,
                counts.brewed_cup_taken,
                counts.lid_detached,
                counts.lid_reattached,
                counts.item_thrown,
                counts.pursuit_alerted,
                counts.pursuit_started
            ),
            format!("sys: {}", self.system_order_text),
            owner_line,
        ];
        Some(DebugInfoSnapshot {
            prompt: world.prompt().map(str::to_string),
            held_entity: self.held_item,
            target_kind: self.target.kind_token().to_string(),
            extra_debug_lines,
        })
    }

    fn execute_debug_command(
        &mut self,
        command: SceneDebugCommand,
        world: &mut World,
    ) -> SceneDebugCommandResult {
        match command {
            SceneDebugCommand::LookAt { target } => {
                self.eye.look_at(target);
                self.sync_view_entity(world);
                SceneDebugCommandResult::Success(format!(
                    "looking at ({:.2}, {:.2}, {:.2})",
                    target.x, target.y, target.z
                ))
            }
            SceneDebugCommand::DropHeld => {
                if self.held_item.is_none() {
                    return SceneDebugCommandResult::Error("no held item".to_string());
                }
                self.drop_held(world);
                SceneDebugCommandResult::Success("dropped held item".to_string())
            }
            SceneDebugCommand::DumpState => {
                SceneDebugCommandResult::Success(self.format_dump_state(world))
            }
        }
    }
}
