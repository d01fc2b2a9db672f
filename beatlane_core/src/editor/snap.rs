pub const DEFAULT_BPM: f64 = 120.0;

/// Beat grid used to quantize edited times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGrid {
    pub bpm: f64,
    /// 0 = free placement, N = 1/N note.
    pub divisor: u32,
}

impl Default for SnapGrid {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            divisor: 4,
        }
    }
}

impl SnapGrid {
    pub fn new(bpm: f64, divisor: u32) -> Self {
        Self { bpm, divisor }
    }

    pub fn beat_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }

    /// Grid spacing, or `None` when snapping is off.
    pub fn interval_ms(&self) -> Option<f64> {
        if self.divisor == 0 || !(self.bpm.is_finite() && self.bpm > 0.0) {
            return None;
        }
        Some(self.beat_ms() * 4.0 / self.divisor as f64)
    }

    /// Rounds to the nearest grid line.
    pub fn snap(&self, time_ms: f64) -> f64 {
        match self.interval_ms() {
            Some(interval) => (time_ms / interval).round() * interval,
            None => time_ms,
        }
    }

    /// `free` is the per-gesture override that bypasses the grid.
    pub fn snap_unless(&self, time_ms: f64, free: bool) -> f64 {
        if free {
            time_ms
        } else {
            self.snap(time_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_notes_at_120_bpm_are_500ms() {
        let grid = SnapGrid::new(120.0, 4);
        assert_eq!(grid.interval_ms(), Some(500.0));
        assert_eq!(grid.snap(740.0), 500.0);
        assert_eq!(grid.snap(760.0), 1000.0);
    }

    #[test]
    fn sixteenths_follow_tempo() {
        let grid = SnapGrid::new(150.0, 16);
        assert_eq!(grid.interval_ms(), Some(100.0));
        assert_eq!(grid.snap(149.0), 100.0);
    }

    #[test]
    fn divisor_zero_is_free() {
        let grid = SnapGrid::new(120.0, 0);
        assert_eq!(grid.interval_ms(), None);
        assert_eq!(grid.snap(123.4), 123.4);
    }

    #[test]
    fn override_bypasses_grid() {
        let grid = SnapGrid::default();
        assert_eq!(grid.snap_unless(740.0, true), 740.0);
        assert_eq!(grid.snap_unless(740.0, false), 500.0);
    }
}
