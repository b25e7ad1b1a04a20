    use super::*;
    use engine::Vec2;

    const DT: f32 = 0.05;
    const EPSILON: f32 = 1e-4;

    fn loaded_scene() -> (NightShiftScene, World) {
        let mut scene = NightShiftScene::new("test", GameDefs::default());
        let mut world = World::default();
        scene.load(&mut world);
        (scene, world)
    }

    fn find_by_name(world: &World, name: &str) -> EntityId {
        world
            .entities()
            .iter()
            .find(|entity| entity.debug_name == name)
            .map(|entity| entity.id)
            .unwrap_or_else(|| panic!("entity '{name}' not found"))
    }

    fn interact_input() -> InputSnapshot {
        InputSnapshot::empty().with_interact_pressed(true)
    }

    fn advance(scene: &mut NightShiftScene, world: &mut World, steps: usize) {
        for _ in 0..steps {
            scene.update(DT, &InputSnapshot::empty(), world);
        }
    }

    fn look_at(scene: &mut NightShiftScene, world: &mut World, target: Vec3) {
        let result = scene.execute_debug_command(SceneDebugCommand::LookAt { target }, world);
        assert!(matches!(result, SceneDebugCommandResult::Success(_)));
    }

    fn settle_pickup(scene: &mut NightShiftScene, world: &mut World) {
        for _ in 0..200 {
            if scene.pickup.is_none() {
                return;
            }
            scene.update(DT, &InputSnapshot::empty(), world);
        }
        panic!("pickup animation did not settle");
    }

    fn wait_for_brew_completion(scene: &mut NightShiftScene, world: &mut World) {
        for _ in 0..400 {
            if scene.system_events.total_counts().brew_completed > 0 {
                return;
            }
            scene.update(DT, &InputSnapshot::empty(), world);
        }
        panic!("brew did not complete");
    }

    fn station(scene: &NightShiftScene, machine: EntityId) -> BrewStation {
        scene
            .stations_by_entity
            .get(&machine)
            .copied()
            .expect("station")
    }

    fn cup_state(scene: &NightShiftScene, cup: EntityId) -> ContainerState {
        scene
            .holdables_by_entity
            .get(&cup)
            .and_then(Holdable::container_state)
            .expect("container state")
    }

    fn pick_up_cup(scene: &mut NightShiftScene, world: &mut World) -> EntityId {
        let cup = find_by_name(world, "cup");
        look_at(scene, world, CUP_SPAWN);
        scene.update(DT, &interact_input(), world);
        assert!(scene.pickup.is_some(), "cup pickup should start");
        settle_pickup(scene, world);
        assert_eq!(scene.held_item, Some(cup));
        cup
    }

    /// Pick up the cup, place it on the machine, wait out the brew, and
    /// take the brewed cup back (with the lid reattached).
    fn run_full_brew_flow(
        scene: &mut NightShiftScene,
        world: &mut World,
    ) -> (EntityId, EntityId, EntityId) {
        let cup = pick_up_cup(scene, world);
        let lid = find_by_name(world, "cup_lid");
        let machine = find_by_name(world, "coffee_machine");

        look_at(scene, world, MACHINE_SPAWN);
        scene.update(DT, &interact_input(), world);
        assert_eq!(station(scene, machine).current_cup, Some(cup));
        settle_pickup(scene, world);
        assert_eq!(scene.held_item, Some(lid));

        wait_for_brew_completion(scene, world);
        // One more detection pass so the ready edge re-arms the prompt.
        advance(scene, world, 1);
        assert_eq!(world.prompt(), Some(PROMPT_TAKE_CUP));

        scene.update(DT, &interact_input(), world);
        settle_pickup(scene, world);
        assert_eq!(scene.held_item, Some(cup));
        (cup, lid, machine)
    }

    #[test]
    fn timed_transition_reports_progress_then_completes() {
        let mut transition = TimedTransition::new(1.0);
        assert_eq!(
            transition.tick(0.4),
            TransitionStep::Running { progress: 0.4 }
        );
        assert_eq!(
            transition.tick(0.4),
            TransitionStep::Running { progress: 0.8 }
        );
        assert_eq!(transition.tick(0.4), TransitionStep::Completed);
    }

    #[test]
    fn zero_duration_transition_completes_on_first_tick() {
        let mut transition = TimedTransition::new(0.0);
        assert_eq!(transition.tick(DT), TransitionStep::Completed);
    }

    #[test]
    fn idle_gaze_writes_no_prompts() {
        let (mut scene, mut world) = loaded_scene();
        advance(&mut scene, &mut world, 8);
        assert_eq!(world.prompt_write_count(), 0);
        assert_eq!(world.prompt(), None);
        assert_eq!(scene.target, TargetLock::None);
    }

    #[test]
    fn targeting_cup_prompts_once_for_unchanged_world() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");

        look_at(&mut scene, &mut world, CUP_SPAWN);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::Item(cup));
        assert_eq!(world.prompt(), Some(PROMPT_PICK_UP));

        let writes_after_first = world.prompt_write_count();
        advance(&mut scene, &mut world, 10);
        assert_eq!(world.prompt_write_count(), writes_after_first);
        assert_eq!(world.prompt(), Some(PROMPT_PICK_UP));
    }

    #[test]
    fn look_input_rotates_eye() {
        let (mut scene, mut world) = loaded_scene();
        let yaw_before = scene.eye.yaw;
        let input = InputSnapshot::empty().with_look(Vec2 { x: 1.0, y: 0.0 });
        scene.update(DT, &input, &mut world);
        assert!(scene.eye.yaw > yaw_before);
    }

    #[test]
    fn quit_request_short_circuits_the_tick() {
        let (mut scene, mut world) = loaded_scene();
        let command = scene.update(
            DT,
            &InputSnapshot::empty().with_quit_requested(true),
            &mut world,
        );
        assert_eq!(command, SceneCommand::Quit);
    }

    #[test]
    fn target_kinds_are_mutually_exclusive_across_a_detection_sequence() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");
        let machine = find_by_name(&world, "coffee_machine");

        look_at(&mut scene, &mut world, CUP_SPAWN);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::Item(cup));

        // Empty hand, empty idle station: nothing legal there.
        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::None);

        pick_up_cup(&mut scene, &mut world);
        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::Appliance(machine));
        assert_eq!(world.prompt(), Some(PROMPT_PLACE_CUP));

        // An unfilled cup is no throwing material.
        look_at(&mut scene, &mut world, PURSUER_SPAWN);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::None);
    }

    #[test]
    fn pickup_suspends_physics_immediately_and_snaps_to_anchor() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");
        let anchor = find_by_name(&world, "hold_anchor");

        look_at(&mut scene, &mut world, CUP_SPAWN);
        scene.update(DT, &interact_input(), &mut world);
        assert!(scene.pickup.is_some());
        assert!(!world.find_entity(cup).expect("cup").physics_active);

        settle_pickup(&mut scene, &mut world);
        assert_eq!(scene.held_item, Some(cup));
        let cup_entity = world.find_entity(cup).expect("cup");
        assert_eq!(cup_entity.parent(), Some(anchor));
        assert!(cup_entity.transform.position.approx_eq(Vec3::ZERO, EPSILON));
        let cup_pose = world.world_pose(cup).expect("cup pose");
        let anchor_pose = world.world_pose(anchor).expect("anchor pose");
        assert!(cup_pose.position.approx_eq(anchor_pose.position, EPSILON));
        assert_eq!(
            scene.holdables_by_entity.get(&cup).expect("holdable").owner,
            OwnerTag::Player
        );
        assert_eq!(scene.system_events.total_counts().item_picked_up, 1);
    }

    #[test]
    fn pickup_interpolates_toward_the_anchor() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");
        let anchor = find_by_name(&world, "hold_anchor");

        look_at(&mut scene, &mut world, CUP_SPAWN);
        scene.update(DT, &interact_input(), &mut world);
        let anchor_position = world.world_pose(anchor).expect("anchor").position;
        let start_distance = CUP_SPAWN.sub(anchor_position).length();

        advance(&mut scene, &mut world, 5);
        assert!(scene.pickup.is_some(), "animation still running");
        let mid_position = world.world_pose(cup).expect("cup").position;
        let mid_distance = mid_position.sub(anchor_position).length();
        assert!(mid_distance < start_distance);
        assert!(mid_distance > EPSILON);
    }

    #[test]
    fn second_pickup_during_animation_is_rejected() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");
        let extra = world.spawn(
            "extra_item",
            Transform::from_position(Vec3::new(0.0, 0.9, -1.5)),
        );
        if let Some(entity) = world.find_entity_mut(extra) {
            entity.layer = Some(ProbeLayer::Item);
            entity.probe_radius = 0.1;
        }
        scene.holdables_by_entity.insert(extra, Holdable::generic());

        look_at(&mut scene, &mut world, CUP_SPAWN);
        scene.update(DT, &interact_input(), &mut world);
        assert_eq!(scene.pickup.map(|animation| animation.item), Some(cup));

        scene.start_pickup(extra, &mut world);
        assert_eq!(scene.pickup.map(|animation| animation.item), Some(cup));

        settle_pickup(&mut scene, &mut world);
        assert_eq!(scene.held_item, Some(cup));
        assert_eq!(
            scene
                .holdables_by_entity
                .get(&extra)
                .expect("extra holdable")
                .owner,
            OwnerTag::World
        );
    }

    #[test]
    fn placing_the_cup_starts_the_brew_and_frees_the_lid() {
        let (mut scene, mut world) = loaded_scene();
        let cup = pick_up_cup(&mut scene, &mut world);
        let lid = find_by_name(&world, "cup_lid");
        let machine = find_by_name(&world, "coffee_machine");
        let stand = find_by_name(&world, "cup_stand");

        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        scene.update(DT, &interact_input(), &mut world);

        let placed = station(&scene, machine);
        assert_eq!(placed.current_cup, Some(cup));
        assert!(placed.is_brewing());
        assert_eq!(scene.placed_cup, Some(cup));
        assert_eq!(scene.audio.play_count(CueId::BrewCycle), 1);

        let cup_entity = world.find_entity(cup).expect("cup");
        assert_eq!(cup_entity.parent(), Some(stand));
        assert!(!cup_entity.physics_active);
        assert_eq!(
            scene.holdables_by_entity.get(&cup).expect("cup holdable").owner,
            OwnerTag::Station
        );

        // The lid popped free and is animating into the hand.
        let lid_entity = world.find_entity(lid).expect("lid");
        assert_eq!(lid_entity.parent(), None);
        assert_eq!(scene.pickup.map(|animation| animation.item), Some(lid));
        assert!(scene.lid_placements_by_lid.contains_key(&lid));

        settle_pickup(&mut scene, &mut world);
        assert_eq!(scene.held_item, Some(lid));
    }

    #[test]
    fn brew_completion_fills_the_cup_and_waits_for_the_player() {
        let (mut scene, mut world) = loaded_scene();
        let cup = pick_up_cup(&mut scene, &mut world);
        let machine = find_by_name(&world, "coffee_machine");

        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        scene.update(DT, &interact_input(), &mut world);
        settle_pickup(&mut scene, &mut world);

        assert!(!cup_state(&scene, cup).filled);
        wait_for_brew_completion(&mut scene, &mut world);

        let ready = station(&scene, machine);
        assert!(ready.is_ready());
        assert!(!ready.is_brewing());
        assert_eq!(ready.current_cup, Some(cup));
        assert!(cup_state(&scene, cup).filled);
    }

    #[test]
    fn ready_edge_reprompts_exactly_once() {
        let (mut scene, mut world) = loaded_scene();
        pick_up_cup(&mut scene, &mut world);

        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        scene.update(DT, &interact_input(), &mut world);
        settle_pickup(&mut scene, &mut world);

        advance(&mut scene, &mut world, 1);
        assert_eq!(world.prompt(), Some(PROMPT_BREWING));

        wait_for_brew_completion(&mut scene, &mut world);
        let writes_at_completion = world.prompt_write_count();

        advance(&mut scene, &mut world, 1);
        assert_eq!(world.prompt(), Some(PROMPT_TAKE_CUP));
        assert_eq!(world.prompt_write_count(), writes_at_completion + 1);

        advance(&mut scene, &mut world, 10);
        assert_eq!(world.prompt_write_count(), writes_at_completion + 1);
    }

    #[test]
    fn taking_the_brewed_cup_reattaches_the_lid_exactly() {
        let (mut scene, mut world) = loaded_scene();
        let lid = find_by_name(&world, "cup_lid");
        let before = world.find_entity(lid).expect("lid").transform;
        let sibling_before = world.sibling_index(lid).expect("sibling index");

        let (cup, lid, machine) = run_full_brew_flow(&mut scene, &mut world);

        let ready = station(&scene, machine);
        assert_eq!(ready.current_cup, None);
        assert!(!ready.is_brewing());
        assert_eq!(scene.placed_cup, None);

        let lid_entity = world.find_entity(lid).expect("lid");
        assert_eq!(lid_entity.parent(), Some(cup));
        assert!(!lid_entity.physics_active);
        let after = lid_entity.transform;
        assert_eq!(after.position.x.to_bits(), before.position.x.to_bits());
        assert_eq!(after.position.y.to_bits(), before.position.y.to_bits());
        assert_eq!(after.position.z.to_bits(), before.position.z.to_bits());
        assert_eq!(after.rotation.x.to_bits(), before.rotation.x.to_bits());
        assert_eq!(after.rotation.y.to_bits(), before.rotation.y.to_bits());
        assert_eq!(after.rotation.z.to_bits(), before.rotation.z.to_bits());
        assert_eq!(after.rotation.w.to_bits(), before.rotation.w.to_bits());
        assert_eq!(world.sibling_index(lid), Some(sibling_before));

        assert!(cup_state(&scene, cup).filled);
        // The lid rides along with the cup into the player's hands.
        assert_eq!(
            scene.holdables_by_entity.get(&lid).expect("lid holdable").owner,
            OwnerTag::Player
        );
        let counts = scene.system_events.total_counts();
        assert_eq!(counts.brew_started, 1);
        assert_eq!(counts.brew_completed, 1);
        assert_eq!(counts.brewed_cup_taken, 1);
        assert_eq!(counts.lid_detached, 1);
        assert_eq!(counts.lid_reattached, 1);
    }

    #[test]
    fn detach_then_reattach_restores_bit_identical_placement() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");
        let lid = find_by_name(&world, "cup_lid");
        let before = world.find_entity(lid).expect("lid").transform;
        let sibling_before = world.sibling_index(lid).expect("sibling index");

        scene.detach_lid(cup, &mut world).expect("detach");
        assert_eq!(world.find_entity(lid).expect("lid").parent(), None);
        assert!(world.find_entity(lid).expect("lid").physics_active);

        scene.reattach_lid(lid, &mut world).expect("reattach");
        let lid_entity = world.find_entity(lid).expect("lid");
        assert_eq!(lid_entity.parent(), Some(cup));
        assert!(!lid_entity.physics_active);
        assert_eq!(
            lid_entity.transform.position.x.to_bits(),
            before.position.x.to_bits()
        );
        assert_eq!(
            lid_entity.transform.position.y.to_bits(),
            before.position.y.to_bits()
        );
        assert_eq!(
            lid_entity.transform.position.z.to_bits(),
            before.position.z.to_bits()
        );
        assert_eq!(
            lid_entity.transform.rotation.w.to_bits(),
            before.rotation.w.to_bits()
        );
        assert_eq!(world.sibling_index(lid), Some(sibling_before));
    }

    #[test]
    fn repeated_detach_cycles_recapture_fresh_state() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");
        let lid = find_by_name(&world, "cup_lid");

        for _ in 0..3 {
            scene.detach_lid(cup, &mut world).expect("detach");
            scene.reattach_lid(lid, &mut world).expect("reattach");
        }
        let lid_entity = world.find_entity(lid).expect("lid");
        assert_eq!(lid_entity.parent(), Some(cup));
        assert_eq!(world.sibling_index(lid), Some(1));
        assert_eq!(scene.system_events.total_counts().lid_detached, 0);
        // Events roll over per tick; emit counts live in the current
        // tick until an update happens.
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.system_events.total_counts().lid_detached, 3);
        assert_eq!(scene.system_events.total_counts().lid_reattached, 3);
    }

    #[test]
    fn detach_lid_without_an_assigned_lid_is_a_loud_no_op() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");
        let lid = find_by_name(&world, "cup_lid");
        scene
            .holdables_by_entity
            .insert(cup, Holdable::container(None));

        let error = scene.detach_lid(cup, &mut world).expect_err("must fail");
        assert!(error.contains("no assigned lid"), "{error}");
        let lid_entity = world.find_entity(lid).expect("lid");
        assert_eq!(lid_entity.parent(), Some(cup));
        assert!(!lid_entity.physics_active);
        assert!(!scene.lid_placements_by_lid.contains_key(&lid));
    }

    #[test]
    fn reattach_without_a_saved_record_fails() {
        let (mut scene, mut world) = loaded_scene();
        let lid = find_by_name(&world, "cup_lid");
        let error = scene.reattach_lid(lid, &mut world).expect_err("must fail");
        assert!(error.contains("no saved placement"), "{error}");
    }

    #[test]
    fn station_without_a_stand_anchor_aborts_the_place() {
        let (mut scene, mut world) = loaded_scene();
        let machine = find_by_name(&world, "coffee_machine");
        scene
            .stations_by_entity
            .get_mut(&machine)
            .expect("station")
            .stand_anchor = None;

        let cup = pick_up_cup(&mut scene, &mut world);
        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        scene.update(DT, &interact_input(), &mut world);

        assert_eq!(scene.held_item, Some(cup));
        assert_eq!(station(&scene, machine).current_cup, None);
        assert_eq!(scene.system_events.total_counts().cup_placed, 0);
    }

    #[test]
    fn a_filled_cup_is_never_offered_for_placing() {
        let (mut scene, mut world) = loaded_scene();
        let (cup, _, machine) = run_full_brew_flow(&mut scene, &mut world);

        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::None);

        scene.update(DT, &interact_input(), &mut world);
        assert_eq!(scene.held_item, Some(cup));
        assert_eq!(station(&scene, machine).current_cup, None);
        assert_eq!(scene.system_events.total_counts().cup_placed, 1);
        assert!(cup_state(&scene, cup).filled);
    }

    #[test]
    fn a_brewing_station_is_a_status_target_only() {
        let (mut scene, mut world) = loaded_scene();
        let cup = pick_up_cup(&mut scene, &mut world);
        let machine = find_by_name(&world, "coffee_machine");

        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        scene.update(DT, &interact_input(), &mut world);
        settle_pickup(&mut scene, &mut world);

        advance(&mut scene, &mut world, 1);
        assert_eq!(world.prompt(), Some(PROMPT_BREWING));

        // Interacting mid-brew changes nothing.
        scene.update(DT, &interact_input(), &mut world);
        let brewing = station(&scene, machine);
        assert!(brewing.is_brewing());
        assert_eq!(brewing.current_cup, Some(cup));
        assert_eq!(scene.system_events.total_counts().brewed_cup_taken, 0);
    }

    #[test]
    fn filled_flag_survives_drop_repickup_and_rejected_place() {
        let (mut scene, mut world) = loaded_scene();
        let (cup, _, machine) = run_full_brew_flow(&mut scene, &mut world);

        let result = scene.execute_debug_command(SceneDebugCommand::DropHeld, &mut world);
        assert!(matches!(result, SceneDebugCommandResult::Success(_)));
        assert_eq!(scene.held_item, None);
        assert!(cup_state(&scene, cup).filled);
        let dropped = world.find_entity(cup).expect("cup");
        assert!(dropped.physics_active);
        let expected = scene
            .eye
            .position
            .add(flat_forward(scene.eye.yaw).scaled(scene.defs.drop_forward_offset));
        assert!(dropped.transform.position.approx_eq(expected, EPSILON));

        let drop_position = dropped.transform.position;
        look_at(&mut scene, &mut world, drop_position);
        scene.update(DT, &interact_input(), &mut world);
        settle_pickup(&mut scene, &mut world);
        assert_eq!(scene.held_item, Some(cup));
        assert!(cup_state(&scene, cup).filled);

        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::None);
        assert_eq!(station(&scene, machine).current_cup, None);
        assert!(cup_state(&scene, cup).filled);
    }

    #[test]
    fn a_loose_lid_at_the_cup_slot_is_a_lid_target() {
        let (mut scene, mut world) = loaded_scene();
        pick_up_cup(&mut scene, &mut world);
        let lid = find_by_name(&world, "cup_lid");

        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        scene.update(DT, &interact_input(), &mut world);
        settle_pickup(&mut scene, &mut world);
        assert_eq!(scene.held_item, Some(lid));

        let result = scene.execute_debug_command(SceneDebugCommand::DropHeld, &mut world);
        assert!(matches!(result, SceneDebugCommandResult::Success(_)));
        let lid_position = world.find_entity(lid).expect("lid").transform.position;

        look_at(&mut scene, &mut world, lid_position);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::Lid(lid));
        assert_eq!(world.prompt(), Some(PROMPT_REMOVE_LID));

        scene.update(DT, &interact_input(), &mut world);
        settle_pickup(&mut scene, &mut world);
        assert_eq!(scene.held_item, Some(lid));
    }

    #[test]
    fn interacting_with_a_seated_lid_detaches_it() {
        let (mut scene, mut world) = loaded_scene();
        let cup = find_by_name(&world, "cup");
        let lid = find_by_name(&world, "cup_lid");
        scene.placed_cup = Some(cup);
        scene.target = TargetLock::Lid(lid);

        scene.run_interact_system(&interact_input(), &mut world);

        let lid_entity = world.find_entity(lid).expect("lid");
        assert_eq!(lid_entity.parent(), None);
        assert!(lid_entity.physics_active);
        assert!(scene.lid_placements_by_lid.contains_key(&lid));
        let expected = CUP_SPAWN.add(Vec3::UNIT_Y.scaled(scene.defs.lid_pop_offset));
        assert!(
            lid_entity.transform.position.approx_eq(expected, EPSILON),
            "{:?} vs {expected:?}",
            lid_entity.transform.position
        );
    }

    #[test]
    fn throwing_the_filled_cup_alerts_then_chases() {
        let (mut scene, mut world) = loaded_scene();
        let (cup, _, _) = run_full_brew_flow(&mut scene, &mut world);
        let pursuer = find_by_name(&world, "pursuer");

        look_at(&mut scene, &mut world, PURSUER_SPAWN);
        advance(&mut scene, &mut world, 1);
        assert_eq!(scene.target, TargetLock::Agent(pursuer));
        assert_eq!(world.prompt(), Some(PROMPT_THROW_CUP));

        scene.update(DT, &interact_input(), &mut world);

        assert_eq!(scene.held_item, None);
        let cup_entity = world.find_entity(cup).expect("cup");
        assert!(cup_entity.physics_active);
        let impulse = cup_entity.queued_impulse.expect("impulse");
        assert!((impulse.length() - scene.defs.throw_impulse).abs() <= 1e-3);
        assert!(impulse.x > 0.0, "thrown toward the pursuer");

        assert!(matches!(
            scene.pursuers_by_entity.get(&pursuer).expect("pursuer").phase,
            PursuitPhase::Alerting { .. }
        ));
        assert_eq!(scene.audio.play_count(CueId::AlertSiren), 1);
        assert_eq!(scene.audio.play_count(CueId::Heartbeat), 1);
        assert_eq!(scene.audio.play_count(CueId::HeavyBreathing), 1);
        assert_eq!(scene.audio.stop_count(CueId::Ambient), 1);
        assert_eq!(world.prompt(), Some(PROMPT_RUN));

        let alert_ticks = (scene.defs.alert_delay_seconds / DT).ceil() as usize + 1;
        advance(&mut scene, &mut world, alert_ticks);

        let chasing = scene.pursuers_by_entity.get(&pursuer).expect("pursuer");
        assert!(matches!(chasing.phase, PursuitPhase::Chasing));
        assert_eq!(chasing.move_speed, scene.defs.pursuer_chase_speed);
        assert_eq!(chasing.nav_destination, Some(EYE_SPAWN));
        assert_eq!(scene.audio.play_count(CueId::ChaseTheme), 1);
        assert_eq!(scene.system_events.total_counts().pursuit_alerted, 1);
        assert_eq!(scene.system_events.total_counts().pursuit_started, 1);

        // Retargeting holds on every subsequent tick, and the run prompt
        // stays latched.
        advance(&mut scene, &mut world, 5);
        assert_eq!(
            scene
                .pursuers_by_entity
                .get(&pursuer)
                .expect("pursuer")
                .nav_destination,
            Some(EYE_SPAWN)
        );
        assert_eq!(world.prompt(), Some(PROMPT_RUN));
    }

    #[test]
    fn pursuer_faces_the_player_in_every_phase() {
        let (mut scene, mut world) = loaded_scene();
        let pursuer = find_by_name(&world, "pursuer");

        advance(&mut scene, &mut world, 1);
        let expected_yaw = yaw_toward(PURSUER_SPAWN, EYE_SPAWN).expect("bearing");
        let rotation = world.find_entity(pursuer).expect("pursuer").transform.rotation;
        assert!(rotation.approx_eq(Quat::from_yaw(expected_yaw), EPSILON));
        assert!(matches!(
            scene.pursuers_by_entity.get(&pursuer).expect("pursuer").phase,
            PursuitPhase::Dormant
        ));
    }

    #[test]
    fn brew_and_alert_timers_run_while_a_pickup_animates() {
        let (mut scene, mut world) = loaded_scene();
        let cup = pick_up_cup(&mut scene, &mut world);
        let machine = find_by_name(&world, "coffee_machine");

        look_at(&mut scene, &mut world, MACHINE_SPAWN);
        scene.update(DT, &interact_input(), &mut world);
        // The lid pickup is animating; the brew must advance regardless.
        assert!(scene.pickup.is_some());
        let remaining_before = station(&scene, machine)
            .brew
            .expect("brewing")
            .elapsed_seconds;
        advance(&mut scene, &mut world, 3);
        let remaining_after = station(&scene, machine)
            .brew
            .expect("brewing")
            .elapsed_seconds;
        assert!(remaining_after > remaining_before);
        assert_eq!(station(&scene, machine).current_cup, Some(cup));
    }

    #[test]
    fn dump_state_and_debug_snapshot_reflect_the_scene() {
        let (mut scene, mut world) = loaded_scene();
        let result = scene.execute_debug_command(SceneDebugCommand::DumpState, &mut world);
        match result {
            SceneDebugCommandResult::Success(dump) => {
                assert!(dump.starts_with("dump.state v1"), "{dump}");
                assert!(dump.contains("pursuit:dormant"), "{dump}");
            }
            other => panic!("unexpected result {other:?}"),
        }

        let snapshot = scene.debug_info_snapshot(&world).expect("snapshot");
        assert_eq!(snapshot.target_kind, "none");
        assert_eq!(snapshot.held_entity, None);
        assert!(snapshot
            .extra_debug_lines
            .iter()
            .any(|line| line.starts_with("sys: ")));

        let title = scene.debug_title(&world).expect("title");
        assert!(title.starts_with("Night Shift"), "{title}");
    }

    #[test]
    fn drop_without_a_held_item_is_an_error() {
        let (mut scene, mut world) = loaded_scene();
        let result = scene.execute_debug_command(SceneDebugCommand::DropHeld, &mut world);
        assert_eq!(
            result,
            SceneDebugCommandResult::Error("no held item".to_string())
        );
    }
