use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Easing applied to animated transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseKind {
    Linear,
    SmoothStep,
}

impl EaseKind {
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Numeric tunables for the interaction core. Compiled-in defaults;
/// an optional defs file under assets/base may override any subset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameDefs {
    pub pickup_duration_seconds: f32,
    pub pickup_ease: EaseKind,
    pub probe_range: f32,
    pub hold_anchor_local: [f32; 3],
    pub throw_impulse: f32,
    pub drop_forward_offset: f32,
    pub lid_pop_offset: f32,
    pub alert_delay_seconds: f32,
    pub brew_cue_seconds: f32,
    pub pursuer_walk_speed: f32,
    pub pursuer_chase_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for GameDefs {
    fn default() -> Self {
        Self {
            pickup_duration_seconds: 0.5,
            pickup_ease: EaseKind::SmoothStep,
            probe_range: 3.0,
            hold_anchor_local: [0.45, -0.3, 0.6],
            throw_impulse: 10.0,
            drop_forward_offset: 1.0,
            lid_pop_offset: 0.2,
            alert_delay_seconds: 3.0,
            brew_cue_seconds: 4.0,
            pursuer_walk_speed: 2.0,
            pursuer_chase_speed: 3.5,
            mouse_sensitivity: 1.2,
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read defs file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse defs json at {json_path}: {message}")]
    Parse { json_path: String, message: String },
    #[error("invalid defs value at {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl GameDefs {
    pub fn validate(&self) -> Result<(), ContentError> {
        let positive_durations = [
            ("pickup_duration_seconds", self.pickup_duration_seconds),
            ("alert_delay_seconds", self.alert_delay_seconds),
            ("brew_cue_seconds", self.brew_cue_seconds),
        ];
        for (field, value) in positive_durations {
            require_positive(field, value)?;
        }
        let positive_magnitudes = [
            ("probe_range", self.probe_range),
            ("throw_impulse", self.throw_impulse),
            ("pursuer_walk_speed", self.pursuer_walk_speed),
            ("pursuer_chase_speed", self.pursuer_chase_speed),
            ("mouse_sensitivity", self.mouse_sensitivity),
        ];
        for (field, value) in positive_magnitudes {
            require_positive(field, value)?;
        }
        let finite_offsets = [
            ("drop_forward_offset", self.drop_forward_offset),
            ("lid_pop_offset", self.lid_pop_offset),
            ("hold_anchor_local[0]", self.hold_anchor_local[0]),
            ("hold_anchor_local[1]", self.hold_anchor_local[1]),
            ("hold_anchor_local[2]", self.hold_anchor_local[2]),
        ];
        for (field, value) in finite_offsets {
            require_finite(field, value)?;
        }
        Ok(())
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), ContentError> {
    if !value.is_finite() {
        return Err(ContentError::Invalid {
            field,
            reason: format!("expected finite number, got {value}"),
        });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ContentError> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(ContentError::Invalid {
            field,
            reason: format!("expected value > 0, got {value}"),
        });
    }
    Ok(())
}

pub fn load_defs(path: &Path) -> Result<GameDefs, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let defs = parse_defs_json(&raw)?;
    defs.validate()?;
    info!(path = %path.display(), "defs_loaded");
    Ok(defs)
}

fn parse_defs_json(raw: &str) -> Result<GameDefs, ContentError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, GameDefs>(&mut deserializer) {
        Ok(defs) => Ok(defs),
        Err(error) => {
            let json_path = error.path().to_string();
            let source = error.into_inner();
            let json_path = if json_path.is_empty() || json_path == "." {
                "<root>".to_string()
            } else {
                json_path
            };
            Err(ContentError::Parse {
                json_path,
                message: source.to_string(),
            })
        }
    }
}
