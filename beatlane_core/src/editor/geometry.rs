use glam::Vec2;

use crate::chart::{LANE_COUNT, MAX_LANE};

/// Screen-space layout of the editor track. Screen y grows downwards and
/// time grows upwards from the judgment line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    /// Screen point of the judgment line at the left edge of lane 0.
    pub origin: Vec2,
    pub lane_width: f32,
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            lane_width: 100.0,
        }
    }
}

/// Closed time and lane ranges covered by a selection box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRegion {
    pub time_min_ms: f64,
    pub time_max_ms: f64,
    pub lane_min: u8,
    pub lane_max: u8,
}

impl BoxRegion {
    pub fn contains(&self, time_ms: f64, lane: u8) -> bool {
        (self.time_min_ms..=self.time_max_ms).contains(&time_ms)
            && (self.lane_min..=self.lane_max).contains(&lane)
    }
}

impl TrackGeometry {
    pub fn new(origin: Vec2, lane_width: f32) -> Self {
        Self { origin, lane_width }
    }

    pub fn width(&self) -> f32 {
        self.lane_width * LANE_COUNT as f32
    }

    /// `zoom` is pixels per 1000 ms; `view_time_ms` is the time shown on the
    /// judgment line.
    pub fn time_at(&self, y: f32, zoom: f64, view_time_ms: f64) -> f64 {
        view_time_ms + self.time_delta(self.origin.y - y, zoom)
    }

    /// Time covered by `pixels` of upward movement.
    pub fn time_delta(&self, pixels: f32, zoom: f64) -> f64 {
        pixels as f64 / zoom * 1000.0
    }

    fn lane_index(&self, x: f32) -> i32 {
        ((x - self.origin.x) / self.lane_width).floor() as i32
    }

    pub fn lane_at(&self, x: f32) -> Option<u8> {
        let lane = self.lane_index(x);
        (0..=MAX_LANE as i32).contains(&lane).then_some(lane as u8)
    }

    /// Whole lanes covered by `pixels` of rightward movement.
    pub fn lane_delta(&self, pixels: f32) -> i32 {
        (pixels / self.lane_width).round() as i32
    }

    pub fn box_region(&self, a: Vec2, b: Vec2, zoom: f64, view_time_ms: f64) -> Option<BoxRegion> {
        let min = a.min(b);
        let max = a.max(b);

        let first = self.lane_index(min.x);
        let last = self.lane_index(max.x);
        if last < 0 || first > MAX_LANE as i32 {
            return None;
        }

        // Higher on screen is later in time.
        Some(BoxRegion {
            time_min_ms: self.time_at(max.y, zoom, view_time_ms),
            time_max_ms: self.time_at(min.y, zoom, view_time_ms),
            lane_min: first.clamp(0, MAX_LANE as i32) as u8,
            lane_max: last.clamp(0, MAX_LANE as i32) as u8,
        })
    }

    /// Screen point of a note's center, for rendering.
    pub fn note_position(&self, time_ms: f64, lane: u8, zoom: f64, view_time_ms: f64) -> Vec2 {
        let x = self.origin.x + (lane as f32 + 0.5) * self.lane_width;
        let y = self.origin.y - ((time_ms - view_time_ms) / 1000.0 * zoom) as f32;
        Vec2::new(x, y)
    }
}
