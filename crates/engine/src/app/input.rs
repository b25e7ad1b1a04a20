use super::scene::Vec2;

/// One tick's worth of polled input, already translated into abstract
/// intents. Button fields are edge-triggered: true only on the tick the
/// press happened.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    movement: Vec2,
    look: Vec2,
    run_pressed: bool,
    jump_pressed: bool,
    interact_pressed: bool,
    quit_requested: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_look(mut self, look: Vec2) -> Self {
        self.look = look;
        self
    }

    pub fn with_run_pressed(mut self, run_pressed: bool) -> Self {
        self.run_pressed = run_pressed;
        self
    }

    pub fn with_jump_pressed(mut self, jump_pressed: bool) -> Self {
        self.jump_pressed = jump_pressed;
        self
    }

    pub fn with_interact_pressed(mut self, interact_pressed: bool) -> Self {
        self.interact_pressed = interact_pressed;
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    pub fn look(&self) -> Vec2 {
        self.look
    }

    pub fn run_pressed(&self) -> bool {
        self.run_pressed
    }

    pub fn jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    pub fn interact_pressed(&self) -> bool {
        self.interact_pressed
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}
