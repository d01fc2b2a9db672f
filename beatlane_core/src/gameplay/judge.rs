use serde::{Deserialize, Serialize};

// Half-widths of the judgment windows, in ms.
pub const PERFECT_WINDOW_MS: f64 = 50.0;
pub const GOOD_WINDOW_MS: f64 = 100.0;
pub const MISS_WINDOW_MS: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JudgmentKind {
    Perfect,
    Good,
    Miss,
}

impl JudgmentKind {
    pub fn points(self) -> u64 {
        match self {
            JudgmentKind::Perfect => 100,
            JudgmentKind::Good => 50,
            JudgmentKind::Miss => 0,
        }
    }

    pub fn is_hit(self) -> bool {
        !matches!(self, JudgmentKind::Miss)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Timing {
    Fast,
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub kind: JudgmentKind,
    /// Always `None` for misses.
    pub timing: Option<Timing>,
}

impl Judgment {
    pub fn miss() -> Self {
        Self {
            kind: JudgmentKind::Miss,
            timing: None,
        }
    }
}

/// Judges an input against a note. `time_diff_ms` is `note_time - input_time`,
/// so a positive value means the input came early.
///
/// Returns `None` outside the miss window; the caller must then do nothing.
pub fn judge(time_diff_ms: f64) -> Option<Judgment> {
    let abs_diff = time_diff_ms.abs();
    let timing = if time_diff_ms > 0.0 {
        Timing::Fast
    } else {
        Timing::Late
    };

    if abs_diff <= PERFECT_WINDOW_MS {
        Some(Judgment {
            kind: JudgmentKind::Perfect,
            timing: Some(timing),
        })
    } else if abs_diff <= GOOD_WINDOW_MS {
        Some(Judgment {
            kind: JudgmentKind::Good,
            timing: Some(timing),
        })
    } else if abs_diff <= MISS_WINDOW_MS {
        Some(Judgment::miss())
    } else {
        None
    }
}
