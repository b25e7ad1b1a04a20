use std::collections::HashMap;

use tracing::debug;

/// Handles for the cues the interaction core can trigger. Playback is
/// the audio collaborator's job; the director only records commands and
/// answers duration queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueId {
    Ambient,
    BrewCycle,
    AlertSiren,
    Heartbeat,
    HeavyBreathing,
    ChaseTheme,
}

impl CueId {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Ambient => "ambient",
            Self::BrewCycle => "brew_cycle",
            Self::AlertSiren => "alert_siren",
            Self::Heartbeat => "heartbeat",
            Self::HeavyBreathing => "heavy_breathing",
            Self::ChaseTheme => "chase_theme",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Play(CueId),
    Stop(CueId),
}

const FALLBACK_CUE_DURATION_SECONDS: f32 = 1.0;

#[derive(Debug, Default)]
pub struct AudioDirector {
    durations_by_cue: HashMap<CueId, f32>,
    commands: Vec<AudioCommand>,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cue_duration(mut self, cue: CueId, duration_seconds: f32) -> Self {
        self.durations_by_cue.insert(cue, duration_seconds);
        self
    }

    pub fn play(&mut self, cue: CueId) {
        debug!(cue = cue.as_token(), "audio_play");
        self.commands.push(AudioCommand::Play(cue));
    }

    pub fn stop(&mut self, cue: CueId) {
        debug!(cue = cue.as_token(), "audio_stop");
        self.commands.push(AudioCommand::Stop(cue));
    }

    pub fn cue_duration(&self, cue: CueId) -> f32 {
        self.durations_by_cue
            .get(&cue)
            .copied()
            .unwrap_or(FALLBACK_CUE_DURATION_SECONDS)
    }

    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    pub fn play_count(&self, cue: CueId) -> usize {
        self.commands
            .iter()
            .filter(|command| **command == AudioCommand::Play(cue))
            .count()
    }

    pub fn stop_count(&self, cue: CueId) -> usize {
        self.commands
            .iter()
            .filter(|command| **command == AudioCommand::Stop(cue))
            .count()
    }
}
