use glam::Vec2;

use crate::chart::{NoteColor, NoteId};
use crate::editor::document::{EditorDocument, NotePatch};
use crate::editor::gesture::{GestureOutcome, Modifiers};

/// One user action against the editor, processed synchronously by
/// [`EditorDocument::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    SetTime(f64),
    TogglePlay,
    SetSnap(u32),
    SetBpm(f64),
    SetZoom(f64),
    SetToolColor(NoteColor),

    AddNote { lane: u8, time_ms: f64 },
    RemoveNote(NoteId),
    UpdateNote { id: NoteId, patch: NotePatch },

    SelectNote { id: NoteId, multi: bool },
    ClearSelection,
    SelectAll,
    DeleteSelection,

    Copy,
    Paste { target_ms: f64 },
    Mirror,
    Randomize,

    Undo,
    Redo,

    SetLoopStart { time_ms: Option<f64>, free: bool },
    SetLoopEnd { time_ms: Option<f64>, free: bool },

    PointerDownOnNote { id: NoteId, pos: Vec2, modifiers: Modifiers },
    PointerDownOnTrack { pos: Vec2 },
    PointerMove { pos: Vec2, modifiers: Modifiers },
    PointerUp { pos: Vec2, modifiers: Modifiers },
}

impl EditorDocument {
    /// Applies a command. Returns whether it had any effect.
    pub fn apply(&mut self, command: EditorCommand) -> bool {
        log::trace!("editor command {command:?}");
        match command {
            EditorCommand::SetTime(t) => {
                self.set_time(t);
                true
            }
            EditorCommand::TogglePlay => {
                self.toggle_play();
                true
            }
            EditorCommand::SetSnap(divisor) => {
                self.set_snap_divisor(divisor);
                true
            }
            EditorCommand::SetBpm(bpm) => {
                self.set_bpm(bpm);
                true
            }
            EditorCommand::SetZoom(zoom) => {
                self.set_zoom(zoom);
                true
            }
            EditorCommand::SetToolColor(color) => {
                self.set_tool_color(color);
                true
            }
            EditorCommand::AddNote { lane, time_ms } => self.add_note(lane, time_ms).is_some(),
            EditorCommand::RemoveNote(id) => self.remove_note(id),
            EditorCommand::UpdateNote { id, patch } => match self.update_note(id, patch) {
                Ok(changed) => changed,
                Err(err) => {
                    log::debug!("update of {id} rejected: {err}");
                    false
                }
            },
            EditorCommand::SelectNote { id, multi } => self.select_note(id, multi),
            EditorCommand::ClearSelection => {
                self.clear_selection();
                true
            }
            EditorCommand::SelectAll => {
                self.select_all();
                true
            }
            EditorCommand::DeleteSelection => self.delete_selection() > 0,
            EditorCommand::Copy => self.copy_selection() > 0,
            EditorCommand::Paste { target_ms } => !self.paste_at(target_ms).is_empty(),
            EditorCommand::Mirror => self.mirror_selection(),
            EditorCommand::Randomize => self.randomize_selection(&mut rand::thread_rng()),
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::SetLoopStart { time_ms, free } => {
                self.set_loop_start(time_ms, free);
                true
            }
            EditorCommand::SetLoopEnd { time_ms, free } => {
                self.set_loop_end(time_ms, free);
                true
            }
            EditorCommand::PointerDownOnNote { id, pos, modifiers } => {
                self.pointer_down_on_note(id, pos, modifiers)
            }
            EditorCommand::PointerDownOnTrack { pos } => {
                self.pointer_down_on_track(pos);
                true
            }
            EditorCommand::PointerMove { pos, modifiers } => self.pointer_move(pos, modifiers),
            EditorCommand::PointerUp { pos, modifiers } => {
                self.pointer_up(pos, modifiers) != GestureOutcome::None
            }
        }
    }
}
