pub mod command;
pub mod document;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod playback;
pub mod snap;

pub use command::EditorCommand;
pub use document::{EditorDocument, NotePatch};
pub use geometry::TrackGeometry;
pub use gesture::Modifiers;

/// Zoom bounds, in pixels per 1000 ms.
pub const MIN_ZOOM: f64 = 10.0;
pub const MAX_ZOOM: f64 = 1000.0;
