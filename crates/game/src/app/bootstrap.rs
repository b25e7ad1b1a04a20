use std::path::PathBuf;

use engine::{load_defs, resolve_app_paths, GameDefs, Scene, Vec3};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay;

const DEFS_FILE_NAME: &str = "interaction.defs.json";
const DEFS_PATH_ENV_VAR: &str = "NIGHTSHIFT_DEFS";

pub(crate) const FIXED_DT_SECONDS: f32 = 0.05;

#[derive(Debug, Clone, Copy)]
pub(crate) enum ScriptAction {
    LookAt(Vec3),
    Interact,
    DumpState,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ScriptStep {
    pub(crate) tick: u64,
    pub(crate) action: ScriptAction,
}

pub(crate) struct AppWiring {
    pub(crate) scene: Box<dyn Scene>,
    pub(crate) fixed_dt_seconds: f32,
    pub(crate) script: Vec<ScriptStep>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Night Shift Startup ===");

    let defs = load_defs_or_default();
    let script = demo_script(&defs);

    AppWiring {
        scene: gameplay::build_scene(defs),
        fixed_dt_seconds: FIXED_DT_SECONDS,
        script,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_defs_or_default() -> GameDefs {
    let path = match std::env::var(DEFS_PATH_ENV_VAR) {
        Ok(value) => Some(PathBuf::from(value)),
        Err(_) => resolve_app_paths()
            .ok()
            .map(|paths| paths.base_content_dir.join(DEFS_FILE_NAME)),
    };
    let Some(path) = path else {
        debug!("defs_path_unresolved_using_defaults");
        return GameDefs::default();
    };
    if !path.is_file() {
        debug!(path = %path.display(), "defs_file_absent_using_defaults");
        return GameDefs::default();
    }
    match load_defs(&path) {
        Ok(defs) => defs,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "defs_load_failed_using_defaults");
            GameDefs::default()
        }
    }
}

/// A deterministic session through the whole interaction loop: pick up
/// the cup, brew, take the brewed cup, throw it at the pursuer, then
/// wait out the alert delay.
fn demo_script(defs: &GameDefs) -> Vec<ScriptStep> {
    let ticks_for = |seconds: f32| (seconds / FIXED_DT_SECONDS).ceil() as u64 + 2;
    let pickup_ticks = ticks_for(defs.pickup_duration_seconds);
    let brew_ticks = ticks_for(defs.brew_cue_seconds);
    let alert_ticks = ticks_for(defs.alert_delay_seconds);

    let mut steps = Vec::new();
    let mut tick = 1;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::LookAt(gameplay::CUP_SPAWN),
    });
    tick += 1;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::Interact,
    });
    tick += pickup_ticks;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::LookAt(gameplay::MACHINE_SPAWN),
    });
    tick += 1;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::Interact,
    });
    tick += pickup_ticks + brew_ticks;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::DumpState,
    });
    tick += 1;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::Interact,
    });
    tick += pickup_ticks;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::LookAt(gameplay::PURSUER_SPAWN),
    });
    tick += 1;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::Interact,
    });
    tick += alert_ticks + 10;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::DumpState,
    });
    tick += 1;
    steps.push(ScriptStep {
        tick,
        action: ScriptAction::Quit,
    });
    steps
}
