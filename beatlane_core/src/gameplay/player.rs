use rand::Rng;

use crate::audio::{self, HitSound, HitSoundSink, NullSink, SoundProfile};
use crate::chart::generator::{generate_beatmap, BeatmapConfig};
use crate::chart::{Note, NoteId};
use crate::config::GameSettings;
use crate::gameplay::session::{GameSession, PlayResult, RenderFrame};
use crate::gameplay::MAX_TICK_DELTA_MS;
use crate::input::dispatcher::{Dispatched, InputDispatcher};
use crate::input::events::KeyEvent;
use crate::input::InputQueue;
use crate::time::clock::{Clock, MonotonicSource, TimeSource};

use crossbeam_channel::Sender;

/// What one tick did, for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub time_ms: f64,
    pub missed: Vec<NoteId>,
    pub judged: Vec<Dispatched>,
    /// The elapsed delta was too large; sounds and the miss sweep were skipped.
    pub suppressed: bool,
    /// Set on the tick that ended the session.
    pub finished: bool,
}

/// Owns everything a play session needs: clock, session state, input and
/// the audio collaborator. The host calls `tick` once per frame.
pub struct GamePlayer<S: TimeSource = MonotonicSource> {
    clock: Clock<S>,
    session: GameSession,
    dispatcher: InputDispatcher,
    input: InputQueue,
    sink: Box<dyn HitSoundSink>,
    hit_volume: f32,
    sound_profile: SoundProfile,
    last_tick_ms: f64,
}

impl GamePlayer<MonotonicSource> {
    pub fn monotonic(settings: &GameSettings) -> Self {
        Self::new(MonotonicSource::new(), settings)
    }
}

impl<S: TimeSource> GamePlayer<S> {
    pub fn new(source: S, settings: &GameSettings) -> Self {
        let mut session = GameSession::default();
        session.set_speed(settings.speed);
        Self {
            clock: Clock::new(source),
            session,
            dispatcher: InputDispatcher::new(settings.key_map.clone()),
            input: InputQueue::new(),
            sink: Box::new(NullSink),
            hit_volume: settings.hit_volume,
            sound_profile: settings.sound_profile,
            last_tick_ms: 0.0,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn HitSoundSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn clock(&self) -> &Clock<S> {
        &self.clock
    }

    pub fn dispatcher_mut(&mut self) -> &mut InputDispatcher {
        &mut self.dispatcher
    }

    /// Sender for the host's key events; they are judged on the next tick.
    pub fn input_sender(&self) -> Sender<KeyEvent> {
        self.input.sender()
    }

    pub fn push_input(&self, event: KeyEvent) {
        self.input.push(event);
    }

    /// Starts a fresh session on `notes` with the clock at zero.
    pub fn start(&mut self, notes: Vec<Note>) {
        let speed = self.session.speed();
        self.session = GameSession::new(notes);
        self.session.set_speed(speed);
        self.input.drain();
        self.clock.reset();
        self.clock.start();
        self.last_tick_ms = 0.0;
        self.session.set_playing(true);
        log::info!("session started with {} notes", self.session.notes().len());
    }

    pub fn start_generated<R: Rng + ?Sized>(&mut self, config: &BeatmapConfig, rng: &mut R) {
        self.start(generate_beatmap(config, rng));
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        self.session.set_playing(false);
    }

    pub fn resume(&mut self) {
        if self.session.is_finished() {
            return;
        }
        self.clock.start();
        self.last_tick_ms = self.clock.time_ms();
        self.session.set_playing(true);
    }

    pub fn reset(&mut self) {
        self.clock.reset();
        self.session.reset();
        self.input.drain();
        self.last_tick_ms = 0.0;
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.session.set_speed(speed);
    }

    /// Advances time, sweeps misses, then judges queued input.
    pub fn tick(&mut self) -> TickReport {
        if !self.session.is_playing() {
            // Presses while paused are not judged later.
            self.input.drain();
            return TickReport {
                time_ms: self.session.current_time_ms(),
                ..TickReport::default()
            };
        }

        let now = self.clock.time_ms();
        let delta = now - self.last_tick_ms;
        self.last_tick_ms = now;
        let suppressed = !(0.0..=MAX_TICK_DELTA_MS).contains(&delta);
        if suppressed {
            log::trace!("tick delta {delta:.1} ms suppressed");
        }

        self.session.update_time(now);
        let mut missed = if suppressed {
            Vec::new()
        } else {
            self.session.sweep_misses()
        };

        let mut judged = Vec::new();
        for event in self.input.drain() {
            let Some(dispatched) = self.dispatcher.dispatch(&event, &mut self.session) else {
                continue;
            };
            if !suppressed && dispatched.judgment.kind.is_hit() {
                audio::trigger(
                    self.sink.as_ref(),
                    HitSound {
                        category: dispatched.judgment.kind,
                        volume: self.hit_volume,
                        profile: self.sound_profile,
                    },
                );
            }
            judged.push(dispatched);
        }

        let finished = self.session.is_finished();
        if finished {
            // Anything a suppressed tick skipped is still a miss.
            missed.extend(self.session.sweep_misses());
            self.clock.pause();
            self.session.set_playing(false);
            let result = self.session.result();
            log::info!(
                "session finished: score {} max combo {} ({:.2}%)",
                result.score,
                result.max_combo,
                result.accuracy
            );
        }

        TickReport {
            time_ms: now,
            missed,
            judged,
            suppressed,
            finished,
        }
    }

    pub fn frame(&self) -> RenderFrame {
        self.session.render_frame()
    }

    pub fn result(&self) -> PlayResult {
        self.session.result()
    }
}
