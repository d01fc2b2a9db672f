use chart_schema::{ChartFile, ChartMeta};
use glam::Vec2;
use rand::Rng;

use crate::chart::{
    check_lane, check_time, collides, notes_from_file, sort_by_time, Note, NoteColor, NoteId,
    NoteKind, LANE_COUNT, MAX_LANE,
};
use crate::config::EditorSettings;
use crate::editor::geometry::{BoxRegion, TrackGeometry};
use crate::editor::gesture::{BoxGesture, DragGesture, Gesture, GestureOutcome, Modifiers};
use crate::editor::history::History;
use crate::editor::snap::SnapGrid;
use crate::editor::{MAX_ZOOM, MIN_ZOOM};
use crate::error::ChartError;

/// Field edits for a single note; `None` leaves a field alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NotePatch {
    pub time_ms: Option<f64>,
    pub lane: Option<u8>,
    pub kind: Option<NoteKind>,
    pub color: Option<NoteColor>,
}

/// The chart being edited, with selection, clipboard, loop markers and
/// undo history.
///
/// Every operation that changes the note collection records the previous
/// collection in history and discards the redo branch. Selection is not
/// versioned, but it never refers to a note that no longer exists.
#[derive(Debug, Clone)]
pub struct EditorDocument {
    current_time_ms: f64,
    is_playing: bool,
    grid: SnapGrid,
    zoom: f64,
    notes: Vec<Note>,
    selected: Vec<NoteId>,
    tool_color: NoteColor,
    loop_start_ms: Option<f64>,
    loop_end_ms: Option<f64>,
    clipboard: Vec<Note>,
    history: History<Vec<Note>>,
    geometry: TrackGeometry,
    gesture: Gesture,
}

impl Default for EditorDocument {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}

impl EditorDocument {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            current_time_ms: 0.0,
            is_playing: false,
            grid: SnapGrid::new(settings.bpm, settings.snap_divisor),
            zoom: settings.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            notes: Vec::new(),
            selected: Vec::new(),
            tool_color: settings.tool_color,
            loop_start_ms: None,
            loop_end_ms: None,
            clipboard: Vec::new(),
            history: History::new(settings.history_limit),
            geometry: TrackGeometry::new(Vec2::ZERO, settings.lane_width_px),
            gesture: Gesture::Idle,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Selected ids in the order they were selected.
    pub fn selected_ids(&self) -> &[NoteId] {
        &self.selected
    }

    pub fn is_selected(&self, id: NoteId) -> bool {
        self.selected.contains(&id)
    }

    pub fn current_time_ms(&self) -> f64 {
        self.current_time_ms
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn snap_grid(&self) -> SnapGrid {
        self.grid
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn tool_color(&self) -> NoteColor {
        self.tool_color
    }

    pub fn clipboard(&self) -> &[Note] {
        &self.clipboard
    }

    pub fn geometry(&self) -> &TrackGeometry {
        &self.geometry
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn loop_start_ms(&self) -> Option<f64> {
        self.loop_start_ms
    }

    pub fn loop_end_ms(&self) -> Option<f64> {
        self.loop_end_ms
    }

    /// The loop is armed only when both markers are set and end > start.
    pub fn loop_region(&self) -> Option<(f64, f64)> {
        match (self.loop_start_ms, self.loop_end_ms) {
            (Some(start), Some(end)) if end > start => Some((start, end)),
            _ => None,
        }
    }

    // Transport and view

    pub fn set_time(&mut self, time_ms: f64) {
        if time_ms.is_finite() {
            self.current_time_ms = time_ms.max(0.0);
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn set_snap_divisor(&mut self, divisor: u32) {
        self.grid.divisor = divisor;
    }

    /// Reference tempo for the snap grid; invalid tempos are ignored.
    pub fn set_bpm(&mut self, bpm: f64) {
        if bpm.is_finite() && bpm > 0.0 {
            self.grid.bpm = bpm;
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn set_tool_color(&mut self, color: NoteColor) {
        self.tool_color = color;
    }

    pub fn set_geometry(&mut self, geometry: TrackGeometry) {
        self.geometry = geometry;
    }

    pub fn snap(&self, time_ms: f64, free: bool) -> f64 {
        self.grid.snap_unless(time_ms, free)
    }

    // Note collection

    /// Ends any pointer gesture before the collection changes underneath it.
    /// A drag that already moved notes is kept as its own undo step.
    fn settle_gesture(&mut self) {
        if let Gesture::Drag(drag) = std::mem::take(&mut self.gesture) {
            if self.notes != drag.before {
                self.history.record(drag.before);
            }
        }
    }

    fn record(&mut self) {
        self.settle_gesture();
        self.history.record(self.notes.clone());
    }

    fn prune_selection(&mut self) {
        let notes = &self.notes;
        self.selected.retain(|id| notes.iter().any(|n| n.id == *id));
    }

    /// Adds a tap note in the current tool color. Rejected (None) for an
    /// invalid lane or time, or when a note already sits within 1 ms in the
    /// same lane.
    pub fn add_note(&mut self, lane: u8, time_ms: f64) -> Option<NoteId> {
        if check_lane(lane).is_err() || check_time(time_ms).is_err() {
            return None;
        }
        if collides(&self.notes, lane, time_ms) {
            log::debug!("add_note: lane {lane} at {time_ms} ms already occupied");
            return None;
        }

        self.record();
        let note = Note::tap(lane, time_ms, self.tool_color);
        let id = note.id;
        self.notes.push(note);
        sort_by_time(&mut self.notes);
        log::debug!("added note {id} lane {lane} at {time_ms} ms");
        Some(id)
    }

    pub fn remove_note(&mut self, id: NoteId) -> bool {
        let Some(index) = self.notes.iter().position(|n| n.id == id) else {
            return false;
        };
        self.record();
        self.notes.remove(index);
        self.prune_selection();
        true
    }

    /// Returns `Ok(false)` when no note has `id`.
    pub fn update_note(&mut self, id: NoteId, patch: NotePatch) -> Result<bool, ChartError> {
        if let Some(lane) = patch.lane {
            check_lane(lane)?;
        }
        if let Some(time) = patch.time_ms {
            check_time(time)?;
        }
        if let Some(NoteKind::Hold { duration_ms }) = patch.kind {
            if !(duration_ms.is_finite() && duration_ms > 0.0) {
                return Err(ChartError::InvalidDuration(duration_ms));
            }
        }
        let Some(index) = self.notes.iter().position(|n| n.id == id) else {
            return Ok(false);
        };

        self.record();
        let note = &mut self.notes[index];
        if let Some(time) = patch.time_ms {
            note.time_ms = time;
        }
        if let Some(lane) = patch.lane {
            note.lane = lane;
        }
        if let Some(kind) = patch.kind {
            note.kind = kind;
        }
        if let Some(color) = patch.color {
            note.color = color;
        }
        sort_by_time(&mut self.notes);
        Ok(true)
    }

    // Selection

    /// With `multi`, toggles `id` in the selection; otherwise selects only `id`.
    pub fn select_note(&mut self, id: NoteId, multi: bool) -> bool {
        if self.note(id).is_none() {
            return false;
        }
        if !multi {
            self.selected = vec![id];
        } else if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn select_all(&mut self) {
        self.selected = self.notes.iter().map(|n| n.id).collect();
    }

    /// Replaces the selection with every note inside `region`.
    pub fn select_region(&mut self, region: &BoxRegion) -> usize {
        self.selected = self
            .notes
            .iter()
            .filter(|n| region.contains(n.time_ms, n.lane))
            .map(|n| n.id)
            .collect();
        self.selected.len()
    }

    pub fn delete_selection(&mut self) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        self.record();
        let before = self.notes.len();
        let selected = std::mem::take(&mut self.selected);
        self.notes.retain(|n| !selected.contains(&n.id));
        before - self.notes.len()
    }

    // Clipboard

    /// Snapshots the selected notes. An empty selection leaves the clipboard
    /// untouched.
    pub fn copy_selection(&mut self) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        self.clipboard = self
            .notes
            .iter()
            .filter(|n| self.selected.contains(&n.id))
            .cloned()
            .collect();
        self.clipboard.len()
    }

    /// Pastes the clipboard so its earliest note lands on `target_ms`. Notes
    /// that would collide are dropped; the survivors become the selection.
    pub fn paste_at(&mut self, target_ms: f64) -> Vec<NoteId> {
        if !target_ms.is_finite() {
            return Vec::new();
        }
        let Some(min_time) = self.clipboard.iter().map(|n| n.time_ms).reduce(f64::min) else {
            return Vec::new();
        };
        let offset = target_ms - min_time;

        let mut pasted: Vec<Note> = Vec::new();
        for source in &self.clipboard {
            let mut note = source.duplicate();
            note.time_ms = (note.time_ms + offset).max(0.0);
            if collides(&self.notes, note.lane, note.time_ms)
                || collides(&pasted, note.lane, note.time_ms)
            {
                continue;
            }
            pasted.push(note);
        }
        if pasted.is_empty() {
            return Vec::new();
        }

        self.record();
        let ids: Vec<NoteId> = pasted.iter().map(|n| n.id).collect();
        self.notes.extend(pasted);
        sort_by_time(&mut self.notes);
        self.selected = ids.clone();
        log::debug!("pasted {} notes at {target_ms} ms", ids.len());
        ids
    }

    // Bulk transforms

    fn transform_selection(&mut self, mut f: impl FnMut(&mut Note)) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.record();
        for note in self.notes.iter_mut() {
            if self.selected.contains(&note.id) {
                f(note);
            }
        }
        true
    }

    /// Reflects selected lanes: 0<->3, 1<->2.
    pub fn mirror_selection(&mut self) -> bool {
        self.transform_selection(|n| n.lane = MAX_LANE - n.lane)
    }

    pub fn randomize_selection<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.transform_selection(|n| n.lane = rng.gen_range(0..LANE_COUNT))
    }

    // History

    pub fn undo(&mut self) -> bool {
        self.settle_gesture();
        let current = std::mem::take(&mut self.notes);
        let (notes, changed) = match self.history.undo(current) {
            Ok(previous) => (previous, true),
            Err(current) => (current, false),
        };
        self.notes = notes;
        self.prune_selection();
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.settle_gesture();
        let current = std::mem::take(&mut self.notes);
        let (notes, changed) = match self.history.redo(current) {
            Ok(next) => (next, true),
            Err(current) => (current, false),
        };
        self.notes = notes;
        self.prune_selection();
        changed
    }

    // Loop markers

    fn loop_marker(&self, time_ms: Option<f64>, free: bool) -> Option<f64> {
        time_ms
            .filter(|t| t.is_finite())
            .map(|t| self.snap(t, free).max(0.0))
    }

    pub fn set_loop_start(&mut self, time_ms: Option<f64>, free: bool) {
        self.loop_start_ms = self.loop_marker(time_ms, free);
    }

    pub fn set_loop_end(&mut self, time_ms: Option<f64>, free: bool) {
        self.loop_end_ms = self.loop_marker(time_ms, free);
    }

    pub fn clear_loop(&mut self) {
        self.loop_start_ms = None;
        self.loop_end_ms = None;
    }

    // Pointer gestures

    /// Pointer pressed on a note: updates the selection and, if the note is
    /// still selected, starts dragging the whole selection.
    pub fn pointer_down_on_note(&mut self, id: NoteId, pos: Vec2, modifiers: Modifiers) -> bool {
        if !self.select_note(id, modifiers.multi) {
            return false;
        }
        self.gesture = if self.is_selected(id) {
            Gesture::Drag(DragGesture::new(pos, &self.notes, &self.selected))
        } else {
            Gesture::Idle
        };
        true
    }

    /// Pointer pressed on empty track: starts a box selection that turns
    /// into a click-to-add if the pointer barely moves.
    pub fn pointer_down_on_track(&mut self, pos: Vec2) {
        self.gesture = Gesture::BoxSelect(BoxGesture::new(pos));
    }

    pub fn pointer_move(&mut self, pos: Vec2, modifiers: Modifiers) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::Drag(drag) => {
                self.apply_drag(&drag, pos, modifiers.free);
                self.gesture = Gesture::Drag(drag);
                true
            }
            Gesture::BoxSelect(mut boxed) => {
                boxed.update(pos);
                if boxed.is_box {
                    self.select_box(&boxed);
                }
                self.gesture = Gesture::BoxSelect(boxed);
                true
            }
        }
    }

    pub fn pointer_up(&mut self, pos: Vec2, modifiers: Modifiers) -> GestureOutcome {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => GestureOutcome::None,
            Gesture::Drag(drag) => {
                self.apply_drag(&drag, pos, modifiers.free);
                let changed = self.notes != drag.before;
                if changed {
                    self.history.record(drag.before);
                }
                GestureOutcome::Dragged { changed }
            }
            Gesture::BoxSelect(mut boxed) => {
                boxed.update(pos);
                if boxed.is_box {
                    GestureOutcome::BoxSelected(self.select_box(&boxed))
                } else {
                    GestureOutcome::Added(self.add_note_at(boxed.anchor, modifiers.free))
                }
            }
        }
    }

    /// Click-to-add at a screen point.
    pub fn add_note_at(&mut self, pos: Vec2, free: bool) -> Option<NoteId> {
        let lane = self.geometry.lane_at(pos.x)?;
        let raw = self.geometry.time_at(pos.y, self.zoom, self.current_time_ms);
        let time = self.snap(raw, free);
        if time < 0.0 {
            return None;
        }
        self.add_note(lane, time)
    }

    fn apply_drag(&mut self, drag: &DragGesture, pos: Vec2, free: bool) {
        let targets = drag.targets(pos, &self.geometry, self.zoom, &self.grid, free);
        for target in targets {
            if let Some(note) = self.notes.iter_mut().find(|n| n.id == target.id) {
                note.time_ms = target.time_ms;
                note.lane = target.lane;
            }
        }
        sort_by_time(&mut self.notes);
    }

    fn select_box(&mut self, boxed: &BoxGesture) -> usize {
        match self.geometry.box_region(
            boxed.anchor,
            boxed.current,
            self.zoom,
            self.current_time_ms,
        ) {
            Some(region) => self.select_region(&region),
            None => {
                self.selected.clear();
                0
            }
        }
    }

    /// Screen position of every note, for the renderer.
    pub fn note_positions(&self) -> Vec<(NoteId, Vec2)> {
        self.notes
            .iter()
            .map(|n| {
                let pos = self
                    .geometry
                    .note_position(n.time_ms, n.lane, self.zoom, self.current_time_ms);
                (n.id, pos)
            })
            .collect()
    }

    // Import / export

    pub fn export_chart(&self, mut meta: ChartMeta) -> ChartFile {
        meta.bpm = self.grid.bpm;
        meta.total_duration_ms = meta.total_duration_ms.max(
            self.notes
                .iter()
                .map(|n| n.time_ms + n.duration_ms().unwrap_or(0.0))
                .fold(0.0, f64::max),
        );
        ChartFile {
            meta,
            notes: self.notes.iter().map(Note::to_chart_note).collect(),
        }
    }

    /// Replaces the collection with a chart file's notes. Undoable.
    pub fn import_chart(&mut self, file: &ChartFile) -> Result<usize, ChartError> {
        let notes = notes_from_file(file)?;

        self.record();
        self.notes = notes;
        self.selected.clear();
        self.set_bpm(file.meta.bpm);
        log::info!("imported chart {:?} ({} notes)", file.meta.title, self.notes.len());
        Ok(self.notes.len())
    }
}
