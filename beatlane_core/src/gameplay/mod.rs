pub mod judge;
pub mod player;
pub mod session;

/// A tick whose elapsed time exceeds this (a scrub, a stalled frame, a loop
/// jump) suppresses hit sounds and the miss sweep for that tick.
pub const MAX_TICK_DELTA_MS: f64 = 50.0;
