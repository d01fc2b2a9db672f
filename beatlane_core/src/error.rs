use std::path::PathBuf;

use thiserror::Error;

use crate::chart::NoteId;
use crate::gameplay::judge::JudgmentKind;

/// Failures of the game session's note state machine.
///
/// These are defects in the caller: the input dispatcher only ever hands the
/// session pending notes it just looked up.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("note {0} is not part of this session")]
    UnknownNote(NoteId),

    #[error("note {0} has already been judged")]
    AlreadyJudged(NoteId),

    #[error("{0:?} is not a hit judgment")]
    NotAHit(JudgmentKind),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("lane {lane} is out of range (0..={max})")]
    LaneOutOfRange { lane: u8, max: u8 },

    #[error("note time {0} ms is not a finite, non-negative value")]
    InvalidTime(f64),

    #[error("hold duration {0} ms must be finite and positive")]
    InvalidDuration(f64),

    #[error("note id {0:?} is not a valid uuid")]
    InvalidId(String),

    #[error("note id {0} appears more than once")]
    DuplicateId(NoteId),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    #[error("audio backend is disconnected")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
