use std::process::ExitCode;

use engine::{
    InputSnapshot, Scene, SceneCommand, SceneDebugCommand, SceneDebugCommandResult, World,
};
use tracing::{info, warn};

use super::bootstrap::{AppWiring, ScriptAction};

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        mut scene,
        fixed_dt_seconds,
        script,
    } = app;

    let mut world = World::default();
    scene.load(&mut world);

    let last_tick = script.iter().map(|step| step.tick).max().unwrap_or(0);
    for tick in 0..=last_tick {
        let mut input = InputSnapshot::empty();
        for step in script.iter().filter(|step| step.tick == tick) {
            match step.action {
                ScriptAction::LookAt(target) => {
                    match scene.execute_debug_command(SceneDebugCommand::LookAt { target }, &mut world)
                    {
                        SceneDebugCommandResult::Success(result) => {
                            info!(tick, result = %result, "script_look")
                        }
                        other => warn!(tick, result = ?other, "script_look_failed"),
                    }
                }
                ScriptAction::Interact => {
                    input = input.with_interact_pressed(true);
                }
                ScriptAction::DumpState => {
                    if let SceneDebugCommandResult::Success(dump) =
                        scene.execute_debug_command(SceneDebugCommand::DumpState, &mut world)
                    {
                        info!(tick, dump = %dump, "script_dump");
                    }
                }
                ScriptAction::Quit => {
                    input = input.with_quit_requested(true);
                }
            }
        }

        if scene.update(fixed_dt_seconds, &input, &mut world) == SceneCommand::Quit {
            info!(tick, "quit_requested");
            break;
        }
    }

    scene.unload(&mut world);
    ExitCode::SUCCESS
}
