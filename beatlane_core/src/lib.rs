pub mod audio;
pub mod chart;
pub mod config;
pub mod editor;
pub mod error;
pub mod gameplay;
pub mod input;
pub mod time;

pub use chart::{Note, NoteColor, NoteId, NoteKind, NoteState};
pub use error::{AudioError, ChartError, ConfigError, SessionError};
