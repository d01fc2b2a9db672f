use crate::chart::NoteId;
use crate::gameplay::judge::{judge, Judgment, JudgmentKind, MISS_WINDOW_MS};
use crate::gameplay::session::GameSession;
use crate::input::events::KeyEvent;
use crate::input::keymap::KeyMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dispatched {
    pub note_id: NoteId,
    pub lane: u8,
    pub judgment: Judgment,
    /// `note_time - current_time` at the moment of input.
    pub time_diff_ms: f64,
}

/// Turns key presses into judgments against the session's notes.
#[derive(Debug, Clone, Default)]
pub struct InputDispatcher {
    key_map: KeyMap,
}

impl InputDispatcher {
    pub fn new(key_map: KeyMap) -> Self {
        Self { key_map }
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    pub fn key_map_mut(&mut self) -> &mut KeyMap {
        &mut self.key_map
    }

    /// Judges a key-down against the best pending note in its lane.
    ///
    /// Unmapped keys, releases, inactive sessions and taps with nothing in
    /// range are ignored.
    pub fn dispatch(&self, event: &KeyEvent, session: &mut GameSession) -> Option<Dispatched> {
        if !event.pressed || !session.is_playing() {
            return None;
        }
        let lane = self.key_map.lane_for(&event.code)?;
        let now = session.current_time_ms();

        let (note_id, note_time) = find_candidate(session, lane, now)?;
        let time_diff_ms = note_time - now;
        let judgment = judge(time_diff_ms)?;

        let applied = match judgment.kind {
            JudgmentKind::Perfect | JudgmentKind::Good => {
                session.handle_hit(note_id, judgment.kind, judgment.timing)
            }
            JudgmentKind::Miss => session.handle_miss(note_id),
        };
        if let Err(err) = applied {
            log::error!("session rejected judgment for lane {lane}: {err}");
            return None;
        }

        Some(Dispatched {
            note_id,
            lane,
            judgment,
            time_diff_ms,
        })
    }
}

/// Earliest pending note in `lane` within the miss window of `now`.
/// Ties on time keep chart order.
fn find_candidate(session: &GameSession, lane: u8, now: f64) -> Option<(NoteId, f64)> {
    session
        .notes()
        .iter()
        .filter(|n| n.lane == lane && n.is_pending() && (n.time_ms - now).abs() <= MISS_WINDOW_MS)
        .min_by(|a, b| a.time_ms.total_cmp(&b.time_ms))
        .map(|n| (n.id, n.time_ms))
}
