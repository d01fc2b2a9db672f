pub mod generator;

use std::collections::HashSet;
use std::fmt;

use chart_schema::{ChartColor, ChartFile, ChartMeta, ChartNote, ChartNoteKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChartError;

pub const LANE_COUNT: u8 = 4;
pub const MAX_LANE: u8 = LANE_COUNT - 1;

/// Two notes in the same lane closer than this are considered the same note.
pub const DEDUP_EPSILON_MS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, ChartError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ChartError::InvalidId(s.to_string()))
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NoteKind {
    Tap,
    Hold { duration_ms: f64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Blue,
    Pink,
}

/// Per-note judgment state. `Hit` and `Missed` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteState {
    #[default]
    Pending,
    Hit,
    Missed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Target hit instant in ms.
    pub time_ms: f64,
    pub lane: u8,
    pub kind: NoteKind,
    pub color: NoteColor,
    #[serde(default)]
    pub state: NoteState,
}

impl Note {
    pub fn tap(lane: u8, time_ms: f64, color: NoteColor) -> Self {
        Self {
            id: NoteId::new(),
            time_ms,
            lane,
            kind: NoteKind::Tap,
            color,
            state: NoteState::Pending,
        }
    }

    pub fn hold(lane: u8, time_ms: f64, duration_ms: f64, color: NoteColor) -> Self {
        Self {
            kind: NoteKind::Hold { duration_ms },
            ..Self::tap(lane, time_ms, color)
        }
    }

    pub fn duration_ms(&self) -> Option<f64> {
        match self.kind {
            NoteKind::Tap => None,
            NoteKind::Hold { duration_ms } => Some(duration_ms),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == NoteState::Pending
    }

    pub fn is_hit(&self) -> bool {
        self.state == NoteState::Hit
    }

    pub fn is_missed(&self) -> bool {
        self.state == NoteState::Missed
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Copy of this note under a fresh id, back in the pending state.
    pub fn duplicate(&self) -> Self {
        Self {
            id: NoteId::new(),
            state: NoteState::Pending,
            ..self.clone()
        }
    }

    pub fn to_chart_note(&self) -> ChartNote {
        ChartNote {
            id: Some(self.id.to_string()),
            time_ms: self.time_ms,
            lane: self.lane,
            kind: match self.kind {
                NoteKind::Tap => ChartNoteKind::Tap,
                NoteKind::Hold { duration_ms } => ChartNoteKind::Hold { duration_ms },
            },
            color: match self.color {
                NoteColor::Blue => ChartColor::Blue,
                NoteColor::Pink => ChartColor::Pink,
            },
        }
    }

    /// Validates an exported note. Missing ids get a fresh one.
    pub fn from_chart_note(note: &ChartNote) -> Result<Self, ChartError> {
        check_lane(note.lane)?;
        check_time(note.time_ms)?;
        let kind = match note.kind {
            ChartNoteKind::Tap => NoteKind::Tap,
            ChartNoteKind::Hold { duration_ms } => {
                if !(duration_ms.is_finite() && duration_ms > 0.0) {
                    return Err(ChartError::InvalidDuration(duration_ms));
                }
                NoteKind::Hold { duration_ms }
            }
        };
        let id = match &note.id {
            Some(id) => NoteId::parse(id)?,
            None => NoteId::new(),
        };
        Ok(Self {
            id,
            time_ms: note.time_ms,
            lane: note.lane,
            kind,
            color: match note.color {
                ChartColor::Blue => NoteColor::Blue,
                ChartColor::Pink => NoteColor::Pink,
            },
            state: NoteState::Pending,
        })
    }
}

pub fn check_lane(lane: u8) -> Result<u8, ChartError> {
    if lane > MAX_LANE {
        return Err(ChartError::LaneOutOfRange { lane, max: MAX_LANE });
    }
    Ok(lane)
}

pub fn check_time(time_ms: f64) -> Result<f64, ChartError> {
    if !(time_ms.is_finite() && time_ms >= 0.0) {
        return Err(ChartError::InvalidTime(time_ms));
    }
    Ok(time_ms)
}

/// Validates and converts every note of a chart file, sorted by time.
/// Ids must be unique within the file.
pub fn notes_from_file(file: &ChartFile) -> Result<Vec<Note>, ChartError> {
    let mut notes = file
        .notes
        .iter()
        .map(Note::from_chart_note)
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::with_capacity(notes.len());
    if let Some(dup) = notes.iter().find(|n| !seen.insert(n.id)) {
        return Err(ChartError::DuplicateId(dup.id));
    }

    sort_by_time(&mut notes);
    Ok(notes)
}

pub fn sort_by_time(notes: &mut [Note]) {
    notes.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
}

/// Dedup guard shared by add and paste.
pub fn collides(notes: &[Note], lane: u8, time_ms: f64) -> bool {
    notes
        .iter()
        .any(|n| n.lane == lane && (n.time_ms - time_ms).abs() < DEDUP_EPSILON_MS)
}

/// A playable note collection, sorted ascending by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    pub meta: Option<ChartMeta>,
    pub notes: Vec<Note>,
}

impl Chart {
    pub fn from_notes(mut notes: Vec<Note>) -> Self {
        sort_by_time(&mut notes);
        Chart { meta: None, notes }
    }

    pub fn from_file(file: &ChartFile) -> Result<Self, ChartError> {
        let notes = notes_from_file(file)?;
        log::info!("loaded chart {:?} with {} notes", file.meta.title, notes.len());
        Ok(Chart {
            meta: Some(file.meta.clone()),
            notes,
        })
    }

    pub fn to_file(&self, meta: ChartMeta) -> ChartFile {
        ChartFile {
            meta,
            notes: self.notes.iter().map(Note::to_chart_note).collect(),
        }
    }

    pub fn last_note_time_ms(&self) -> Option<f64> {
        self.notes.last().map(|n| n.time_ms)
    }
}
