use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use atomic_float::AtomicF64;

/// Source of "now" in milliseconds. Only differences between readings matter.
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Host-driven time, e.g. an audio callback publishing its playback position.
/// Clones share the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Arc<AtomicF64>,
}

impl ManualTimeSource {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Arc::new(AtomicF64::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.store(now_ms, Ordering::Release);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.fetch_add(delta_ms, Ordering::AcqRel);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> f64 {
        self.now.load(Ordering::Acquire)
    }
}

/// Pausable elapsed-time clock; the single time authority for gameplay.
#[derive(Debug, Clone)]
pub struct Clock<S: TimeSource = MonotonicSource> {
    source: S,
    origin_ms: f64,
    paused_ms: f64,
    running: bool,
}

impl Clock<MonotonicSource> {
    pub fn monotonic() -> Self {
        Self::new(MonotonicSource::new())
    }
}

impl<S: TimeSource> Clock<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            origin_ms: 0.0,
            paused_ms: 0.0,
            running: false,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resumes from the accumulated paused time. No-op while running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.origin_ms = self.source.now_ms() - self.paused_ms;
        self.running = true;
    }

    /// Freezes elapsed time. No-op while paused.
    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.paused_ms = self.source.now_ms() - self.origin_ms;
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.origin_ms = 0.0;
        self.paused_ms = 0.0;
        self.running = false;
    }

    /// Repositions elapsed time without changing the running state.
    pub fn seek(&mut self, time_ms: f64) {
        if self.running {
            self.origin_ms = self.source.now_ms() - time_ms;
        } else {
            self.paused_ms = time_ms;
        }
    }

    pub fn time_ms(&self) -> f64 {
        if self.running {
            self.source.now_ms() - self.origin_ms
        } else {
            self.paused_ms
        }
    }
}
