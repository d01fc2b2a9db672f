use rand::Rng;

use super::{Note, NoteColor, LANE_COUNT};

/// Shape of a procedurally generated beatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatmapConfig {
    pub total_duration_ms: f64,
    pub start_offset_ms: f64,
    /// Intervals are either 2x or 4x this value.
    pub base_interval_ms: f64,
    /// Probability of the short (2x) interval.
    pub short_interval_chance: f64,
    pub hold_chance: f64,
    pub hold_min_ms: f64,
    pub hold_max_ms: f64,
}

impl Default for BeatmapConfig {
    fn default() -> Self {
        Self {
            total_duration_ms: 120_000.0,
            start_offset_ms: 1_000.0,
            base_interval_ms: 200.0,
            short_interval_chance: 0.3,
            hold_chance: 0.15,
            hold_min_ms: 200.0,
            hold_max_ms: 700.0,
        }
    }
}

impl BeatmapConfig {
    /// Non-finite values or a non-positive interval would never end the
    /// generation loop; a negative offset would place notes before zero.
    fn is_usable(&self) -> bool {
        let fields = [
            self.total_duration_ms,
            self.start_offset_ms,
            self.base_interval_ms,
            self.short_interval_chance,
            self.hold_chance,
            self.hold_min_ms,
            self.hold_max_ms,
        ];
        fields.iter().all(|v| v.is_finite())
            && self.base_interval_ms > 0.0
            && self.start_offset_ms >= 0.0
    }

    fn holds_enabled(&self) -> bool {
        self.hold_min_ms > 0.0 && self.hold_max_ms > self.hold_min_ms
    }
}

/// Generates a beatmap with strictly increasing note times, all below
/// `total_duration_ms`. An unusable config yields an empty beatmap.
pub fn generate_beatmap<R: Rng + ?Sized>(config: &BeatmapConfig, rng: &mut R) -> Vec<Note> {
    let mut notes = Vec::new();
    let mut current_time = config.start_offset_ms;

    if !config.is_usable() {
        log::warn!("unusable beatmap config, generating nothing: {config:?}");
        return notes;
    }

    loop {
        let interval = if rng.gen_bool(config.short_interval_chance.clamp(0.0, 1.0)) {
            config.base_interval_ms * 2.0
        } else {
            config.base_interval_ms * 4.0
        };
        current_time += interval;
        if current_time >= config.total_duration_ms {
            break;
        }

        let lane = rng.gen_range(0..LANE_COUNT);
        let color = if rng.gen_bool(0.5) {
            NoteColor::Blue
        } else {
            NoteColor::Pink
        };

        let note = if rng.gen_bool(config.hold_chance.clamp(0.0, 1.0)) && config.holds_enabled()
        {
            let duration = rng.gen_range(config.hold_min_ms..config.hold_max_ms);
            Note::hold(lane, current_time, duration, color)
        } else {
            Note::tap(lane, current_time, color)
        };
        notes.push(note);
    }

    log::debug!("generated beatmap with {} notes", notes.len());
    notes
}

pub fn generate_random_beatmap(config: &BeatmapConfig) -> Vec<Note> {
    generate_beatmap(config, &mut rand::thread_rng())
}
