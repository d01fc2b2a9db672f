use glam::Vec2;

use crate::chart::{Note, NoteId, MAX_LANE};
use crate::editor::geometry::TrackGeometry;
use crate::editor::snap::SnapGrid;

/// Pointer movement below this many pixels is a click, not a box.
pub const CLICK_SLOP_PX: f32 = 5.0;

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Toggle the clicked note in or out of the selection.
    pub multi: bool,
    /// Free placement: skip snapping for this operation.
    pub free: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragOrigin {
    pub id: NoteId,
    pub time_ms: f64,
    pub lane: u8,
}

/// Moving the selected notes. `before` is the collection at pointer-down,
/// recorded in history only if the drag changed something.
#[derive(Debug, Clone)]
pub struct DragGesture {
    pub(crate) anchor: Vec2,
    pub(crate) origins: Vec<DragOrigin>,
    pub(crate) before: Vec<Note>,
}

impl DragGesture {
    pub(crate) fn new(anchor: Vec2, notes: &[Note], selected: &[NoteId]) -> Self {
        let origins = notes
            .iter()
            .filter(|n| selected.contains(&n.id))
            .map(|n| DragOrigin {
                id: n.id,
                time_ms: n.time_ms,
                lane: n.lane,
            })
            .collect();
        Self {
            anchor,
            origins,
            before: notes.to_vec(),
        }
    }

    /// Each note's new time and lane for the pointer at `pos`. Lanes clamp per
    /// note, so notes pressed against an edge stop while the others move on.
    pub(crate) fn targets(
        &self,
        pos: Vec2,
        geometry: &TrackGeometry,
        zoom: f64,
        grid: &SnapGrid,
        free: bool,
    ) -> Vec<DragOrigin> {
        let delta = pos - self.anchor;
        let time_delta = geometry.time_delta(-delta.y, zoom);
        let lane_delta = geometry.lane_delta(delta.x);

        self.origins
            .iter()
            .map(|o| DragOrigin {
                id: o.id,
                time_ms: grid.snap_unless(o.time_ms + time_delta, free).max(0.0),
                lane: (o.lane as i32 + lane_delta).clamp(0, MAX_LANE as i32) as u8,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGesture {
    pub(crate) anchor: Vec2,
    pub(crate) current: Vec2,
    /// Latched once the pointer leaves the click slop.
    pub(crate) is_box: bool,
}

impl BoxGesture {
    pub(crate) fn new(anchor: Vec2) -> Self {
        Self {
            anchor,
            current: anchor,
            is_box: false,
        }
    }

    pub(crate) fn update(&mut self, pos: Vec2) {
        self.current = pos;
        if self.anchor.distance(pos) >= CLICK_SLOP_PX {
            self.is_box = true;
        }
    }
}

/// The pointer gesture in progress, if any.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Drag(DragGesture),
    BoxSelect(BoxGesture),
}

/// What a pointer-up finished.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    None,
    Dragged { changed: bool },
    BoxSelected(usize),
    Added(Option<NoteId>),
}
