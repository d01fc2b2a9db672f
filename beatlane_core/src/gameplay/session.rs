use serde::Serialize;

use crate::chart::{sort_by_time, Note, NoteColor, NoteId, NoteKind, NoteState};
use crate::error::SessionError;
use crate::gameplay::judge::{JudgmentKind, Timing, MISS_WINDOW_MS};

/// Time after the last note before the session counts as finished.
pub const END_GRACE_MS: f64 = 2_000.0;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 10;
pub const DEFAULT_SPEED: u8 = 5;

/// Scene units per ms of lead time at speed 1.
pub const SCROLL_UNITS_PER_MS: f64 = 0.005;

/// The most recent judgment, keyed by note so the renderer can retrigger
/// feedback animations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LastJudgment {
    pub note_id: NoteId,
    pub kind: JudgmentKind,
    pub timing: Option<Timing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rank {
    S,
    A,
    B,
    C,
}

impl Rank {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 95.0 {
            Rank::S
        } else if accuracy >= 90.0 {
            Rank::A
        } else if accuracy >= 80.0 {
            Rank::B
        } else {
            Rank::C
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayResult {
    pub score: u64,
    pub max_combo: u32,
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
    /// Percentage: perfect counts fully, good counts half.
    pub accuracy: f64,
    pub rank: Rank,
}

/// What the renderer needs for one note in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteSprite {
    pub id: NoteId,
    pub lane: u8,
    pub kind: NoteKind,
    pub color: NoteColor,
    pub state: NoteState,
    /// Signed ms until the note reaches the judgment line.
    pub lead_ms: f64,
    /// Distance from the judgment line in scene units, linear in `lead_ms`.
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub current_time_ms: f64,
    pub score: u64,
    pub combo: u32,
    pub last_judgment: Option<LastJudgment>,
    pub notes: Vec<NoteSprite>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    is_playing: bool,
    current_time_ms: f64,
    score: u64,
    combo: u32,
    max_combo: u32,
    perfect: u32,
    good: u32,
    miss: u32,
    speed: u8,
    notes: Vec<Note>,
    last_judgment: Option<LastJudgment>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl GameSession {
    pub fn new(mut notes: Vec<Note>) -> Self {
        sort_by_time(&mut notes);
        Self {
            is_playing: false,
            current_time_ms: 0.0,
            score: 0,
            combo: 0,
            max_combo: 0,
            perfect: 0,
            good: 0,
            miss: 0,
            speed: DEFAULT_SPEED,
            notes,
            last_judgment: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time_ms(&self) -> f64 {
        self.current_time_ms
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn perfect(&self) -> u32 {
        self.perfect
    }

    pub fn good(&self) -> u32 {
        self.good
    }

    pub fn miss(&self) -> u32 {
        self.miss
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn last_judgment(&self) -> Option<LastJudgment> {
        self.last_judgment
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn update_time(&mut self, time_ms: f64) {
        self.current_time_ms = time_ms;
    }

    /// Marks every pending note more than the miss window behind the current
    /// time as missed. Returns the ids that transitioned, in chart order.
    pub fn sweep_misses(&mut self) -> Vec<NoteId> {
        let now = self.current_time_ms;
        let overdue: Vec<NoteId> = self
            .notes
            .iter()
            .take_while(|n| n.time_ms < now)
            .filter(|n| n.is_pending() && now - n.time_ms > MISS_WINDOW_MS)
            .map(|n| n.id)
            .collect();

        for id in &overdue {
            // Ids were just taken from pending notes.
            let _ = self.handle_miss(*id);
        }
        overdue
    }

    /// Applies a PERFECT or GOOD judgment to a pending note.
    pub fn handle_hit(
        &mut self,
        id: NoteId,
        kind: JudgmentKind,
        timing: Option<Timing>,
    ) -> Result<(), SessionError> {
        if !kind.is_hit() {
            return Err(SessionError::NotAHit(kind));
        }
        self.transition(id, NoteState::Hit)?;

        self.score += kind.points();
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        match kind {
            JudgmentKind::Perfect => self.perfect += 1,
            JudgmentKind::Good => self.good += 1,
            JudgmentKind::Miss => unreachable!("rejected above"),
        }
        self.last_judgment = Some(LastJudgment {
            note_id: id,
            kind,
            timing,
        });
        log::debug!("hit {id}: {kind:?} {timing:?}, combo {}", self.combo);
        Ok(())
    }

    pub fn handle_miss(&mut self, id: NoteId) -> Result<(), SessionError> {
        self.transition(id, NoteState::Missed)?;

        self.combo = 0;
        self.miss += 1;
        self.last_judgment = Some(LastJudgment {
            note_id: id,
            kind: JudgmentKind::Miss,
            timing: None,
        });
        log::debug!("miss {id}");
        Ok(())
    }

    fn transition(&mut self, id: NoteId, to: NoteState) -> Result<(), SessionError> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(SessionError::UnknownNote(id))?;
        if note.is_terminal() {
            return Err(SessionError::AlreadyJudged(id));
        }
        note.state = to;
        Ok(())
    }

    /// The instant at which the session is over.
    pub fn end_time_ms(&self) -> f64 {
        self.notes.last().map_or(0.0, |n| n.time_ms) + END_GRACE_MS
    }

    pub fn is_finished(&self) -> bool {
        self.current_time_ms >= self.end_time_ms()
    }

    pub fn result(&self) -> PlayResult {
        let judged = self.perfect + self.good + self.miss;
        let accuracy = if judged > 0 {
            (self.perfect as f64 + self.good as f64 * 0.5) / judged as f64 * 100.0
        } else {
            0.0
        };
        PlayResult {
            score: self.score,
            max_combo: self.max_combo,
            perfect: self.perfect,
            good: self.good,
            miss: self.miss,
            accuracy,
            rank: Rank::from_accuracy(accuracy),
        }
    }

    pub fn render_frame(&self) -> RenderFrame {
        let scale = self.speed as f64 * SCROLL_UNITS_PER_MS;
        RenderFrame {
            current_time_ms: self.current_time_ms,
            score: self.score,
            combo: self.combo,
            last_judgment: self.last_judgment,
            notes: self
                .notes
                .iter()
                .map(|n| {
                    let lead_ms = n.time_ms - self.current_time_ms;
                    NoteSprite {
                        id: n.id,
                        lane: n.lane,
                        kind: n.kind,
                        color: n.color,
                        state: n.state,
                        lead_ms,
                        position: lead_ms * scale,
                    }
                })
                .collect(),
        }
    }

    /// Back to the pre-start state, keeping the chart and speed.
    pub fn reset(&mut self) {
        for note in &mut self.notes {
            note.state = NoteState::Pending;
        }
        self.is_playing = false;
        self.current_time_ms = 0.0;
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.perfect = 0;
        self.good = 0;
        self.miss = 0;
        self.last_judgment = None;
        log::info!("session reset");
    }
}
