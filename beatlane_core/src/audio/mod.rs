use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::error::AudioError;
use crate::gameplay::judge::JudgmentKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundProfile {
    #[default]
    Classic,
    Soft,
    Percussive,
}

/// A request to the host's audio backend. The core never synthesizes audio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSound {
    pub category: JudgmentKind,
    pub volume: f32,
    pub profile: SoundProfile,
}

/// Audio trigger collaborator.
pub trait HitSoundSink {
    fn play_hit_sound(&self, sound: HitSound) -> Result<(), AudioError>;
}

/// Used when no audio backend is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl HitSoundSink for NullSink {
    fn play_hit_sound(&self, _sound: HitSound) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Forwards requests to whichever thread owns the audio device.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    command_tx: Sender<HitSound>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<HitSound>) {
        let (tx, rx) = unbounded();
        (Self { command_tx: tx }, rx)
    }
}

impl HitSoundSink for ChannelSink {
    fn play_hit_sound(&self, sound: HitSound) -> Result<(), AudioError> {
        self.command_tx
            .send(sound)
            .map_err(|_| AudioError::Disconnected)
    }
}

/// Fire-and-forget: audio failures never reach game or editor state.
pub(crate) fn trigger(sink: &dyn HitSoundSink, sound: HitSound) {
    if let Err(err) = sink.play_hit_sound(sound) {
        log::warn!("hit sound dropped: {err}");
    }
}
