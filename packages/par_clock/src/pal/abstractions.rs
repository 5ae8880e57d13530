use std::fmt::Debug;

pub(crate) trait Platform: Debug + Send + Sync + 'static {
    type Timer: PlatformTimer;

    /// Creates a timer that starts measuring immediately.
    fn new_timer(&self) -> Self::Timer;
}

/// The elapsed-time source of one clock, implemented once per build target.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait PlatformTimer: Debug + Send {
    /// Makes the current instant the reference point for later readings.
    fn reset(&mut self);

    /// Seconds elapsed since the last reset (or since creation), never negative.
    fn elapsed_seconds(&mut self) -> f64;
}
