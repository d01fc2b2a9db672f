use crate::audio::{self, HitSound, HitSoundSink, NullSink, SoundProfile};
use crate::chart::NoteId;
use crate::config::EditorSettings;
use crate::editor::document::EditorDocument;
use crate::gameplay::judge::JudgmentKind;
use crate::gameplay::MAX_TICK_DELTA_MS;
use crate::time::clock::{Clock, MonotonicSource, TimeSource};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackTick {
    pub time_ms: f64,
    /// Notes crossed this tick; each triggered a hit sound.
    pub passed: Vec<NoteId>,
    /// Set when playback wrapped to the loop start; the host should re-seek
    /// its audio here.
    pub seek_to: Option<f64>,
    pub suppressed: bool,
}

/// Drives editor playback from a clock and plays a tick sound for every
/// note the play head crosses.
pub struct EditorPlayback<S: TimeSource = MonotonicSource> {
    clock: Clock<S>,
    sink: Box<dyn HitSoundSink>,
    volume: f32,
    profile: SoundProfile,
    /// Document time written by the last tick, play or scrub.
    synced_ms: Option<f64>,
}

impl EditorPlayback<MonotonicSource> {
    pub fn monotonic(settings: &EditorSettings) -> Self {
        Self::new(MonotonicSource::new(), settings)
    }
}

impl<S: TimeSource> EditorPlayback<S> {
    pub fn new(source: S, settings: &EditorSettings) -> Self {
        Self {
            clock: Clock::new(source),
            sink: Box::new(NullSink),
            volume: settings.hit_volume,
            profile: settings.sound_profile,
            synced_ms: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn HitSoundSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn clock(&self) -> &Clock<S> {
        &self.clock
    }

    pub fn play(&mut self, doc: &mut EditorDocument) {
        doc.set_playing(true);
        self.clock.seek(doc.current_time_ms());
        self.clock.start();
        self.synced_ms = Some(doc.current_time_ms());
    }

    pub fn pause(&mut self, doc: &mut EditorDocument) {
        self.clock.pause();
        doc.set_playing(false);
    }

    pub fn toggle(&mut self, doc: &mut EditorDocument) {
        if doc.is_playing() {
            self.pause(doc);
        } else {
            self.play(doc);
        }
    }

    /// Moves the play head; the next tick starts from here.
    pub fn scrub(&mut self, doc: &mut EditorDocument, time_ms: f64) {
        doc.set_time(time_ms);
        self.clock.seek(doc.current_time_ms());
        self.synced_ms = Some(doc.current_time_ms());
    }

    pub fn tick(&mut self, doc: &mut EditorDocument) -> PlaybackTick {
        let prev = doc.current_time_ms();

        // The document may have been toggled directly by a command.
        if !doc.is_playing() {
            self.clock.pause();
            return PlaybackTick {
                time_ms: prev,
                ..PlaybackTick::default()
            };
        }
        if !self.clock.is_running() {
            self.clock.seek(prev);
            self.clock.start();
            self.synced_ms = Some(prev);
        }

        // Time moved under us (e.g. a SetTime command); follow the document.
        if self.synced_ms != Some(prev) {
            self.clock.seek(prev);
            self.synced_ms = Some(prev);
            log::trace!("resync play head to {prev}");
            return PlaybackTick {
                time_ms: prev,
                suppressed: true,
                ..PlaybackTick::default()
            };
        }

        let now = self.clock.time_ms();

        if let Some((start, end)) = doc.loop_region() {
            if prev < end && now >= end {
                self.clock.seek(start);
                doc.set_time(start);
                self.synced_ms = Some(doc.current_time_ms());
                log::trace!("loop wrap {end} -> {start}");
                return PlaybackTick {
                    time_ms: start,
                    passed: Vec::new(),
                    seek_to: Some(start),
                    suppressed: true,
                };
            }
        }

        let delta = now - prev;
        let suppressed = !(0.0..=MAX_TICK_DELTA_MS).contains(&delta);
        let passed: Vec<NoteId> = if suppressed {
            Vec::new()
        } else {
            doc.notes()
                .iter()
                .filter(|n| n.time_ms > prev && n.time_ms <= now)
                .map(|n| n.id)
                .collect()
        };

        for _ in &passed {
            audio::trigger(
                self.sink.as_ref(),
                HitSound {
                    category: JudgmentKind::Perfect,
                    volume: self.volume,
                    profile: self.profile,
                },
            );
        }

        doc.set_time(now);
        self.synced_ms = Some(doc.current_time_ms());
        PlaybackTick {
            time_ms: doc.current_time_ms(),
            passed,
            seek_to: None,
            suppressed,
        }
    }
}
