//! Frame scheduling abstraction
//!
//! The tick driver runs one logical tick per scheduled callback, cadenced to
//! whatever loop the host provides. The browser build implements
//! [`FrameScheduler`] over `requestAnimationFrame`; tests drive the same
//! state machine through [`ManualScheduler`].

/// A callback for one frame; receives the host timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Schedules at most one pending frame callback.
///
/// The loop body reschedules itself each frame while the game is running;
/// pausing simply stops rescheduling, and `cancel` guarantees no dangling
/// callback survives teardown.
pub trait FrameScheduler {
    /// Schedule `callback` for the next host frame, replacing any pending one.
    fn schedule_next(&mut self, callback: FrameCallback);
    /// Drop the pending callback, if any.
    fn cancel(&mut self);
}

/// Hand-cranked scheduler for tests and the native smoke run.
#[derive(Default)]
pub struct ManualScheduler {
    pending: Option<FrameCallback>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending callback so the caller can run it.
    ///
    /// Taken rather than run in place so a callback that reschedules itself
    /// does not re-enter the scheduler mid-call.
    pub fn take_scheduled(&mut self) -> Option<FrameCallback> {
        self.pending.take()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self, callback: FrameCallback) {
        self.pending = Some(callback);
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}
