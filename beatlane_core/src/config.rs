use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::audio::SoundProfile;
use crate::chart::NoteColor;
use crate::editor::{MAX_ZOOM, MIN_ZOOM};
use crate::error::ConfigError;
use crate::gameplay::session::{DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};
use crate::input::keymap::KeyMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub game: GameSettings,
    pub editor: EditorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub speed: u8,
    pub key_map: KeyMap,
    pub hit_volume: f32,
    pub sound_profile: SoundProfile,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            key_map: KeyMap::default(),
            hit_volume: 0.3,
            sound_profile: SoundProfile::Classic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Reference tempo for the snap grid.
    pub bpm: f64,
    /// 0 = free placement, N = 1/N note.
    pub snap_divisor: u32,
    /// Pixels per 1000 ms.
    pub zoom: f64,
    pub lane_width_px: f32,
    /// Maximum undo depth; unbounded when absent.
    pub history_limit: Option<usize>,
    pub tool_color: NoteColor,
    pub hit_volume: f32,
    pub sound_profile: SoundProfile,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            snap_divisor: 4,
            zoom: 200.0,
            lane_width_px: 100.0,
            history_limit: None,
            tool_color: NoteColor::Blue,
            hit_volume: 0.3,
            sound_profile: SoundProfile::Classic,
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Clamps out-of-range values back into their valid ranges.
    pub fn sanitized(mut self) -> Self {
        let defaults = CoreConfig::default();

        if !(MIN_SPEED..=MAX_SPEED).contains(&self.game.speed) {
            log::warn!("config: speed {} clamped to {MIN_SPEED}..={MAX_SPEED}", self.game.speed);
            self.game.speed = self.game.speed.clamp(MIN_SPEED, MAX_SPEED);
        }
        self.game.hit_volume = sanitize_volume(self.game.hit_volume);
        self.editor.hit_volume = sanitize_volume(self.editor.hit_volume);

        if !(self.editor.bpm.is_finite() && self.editor.bpm > 0.0) {
            log::warn!("config: bpm {} replaced with {}", self.editor.bpm, defaults.editor.bpm);
            self.editor.bpm = defaults.editor.bpm;
        }
        if !(self.editor.zoom.is_finite() && (MIN_ZOOM..=MAX_ZOOM).contains(&self.editor.zoom)) {
            log::warn!("config: zoom {} clamped to {MIN_ZOOM}..={MAX_ZOOM}", self.editor.zoom);
            self.editor.zoom = if self.editor.zoom.is_finite() {
                self.editor.zoom.clamp(MIN_ZOOM, MAX_ZOOM)
            } else {
                defaults.editor.zoom
            };
        }
        if !(self.editor.lane_width_px.is_finite() && self.editor.lane_width_px > 0.0) {
            log::warn!("config: lane width {} replaced", self.editor.lane_width_px);
            self.editor.lane_width_px = defaults.editor.lane_width_px;
        }
        self
    }
}

fn sanitize_volume(volume: f32) -> f32 {
    if volume.is_finite() && (0.0..=1.0).contains(&volume) {
        return volume;
    }
    log::warn!("config: volume {volume} clamped to 0..=1");
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
