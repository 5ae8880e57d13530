use crate::pal::PlatformTimer;
use crate::pal::unix::{Bindings, BindingsFacade, WallClockReading};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Measures elapsed time as the difference between two wall clock readings.
///
/// The wall clock may be stepped backward by the operating system, in which case we report
/// zero instead of a negative duration.
#[derive(Debug)]
pub(crate) struct TimerImpl {
    start: WallClockReading,

    bindings: BindingsFacade,
}

impl TimerImpl {
    pub(crate) fn new(bindings: BindingsFacade) -> Self {
        Self {
            start: bindings.gettimeofday(),
            bindings,
        }
    }
}

impl PlatformTimer for TimerImpl {
    fn reset(&mut self) {
        self.start = self.bindings.gettimeofday();
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "second counts are far below the 2^53 limit of exact f64 integers"
    )]
    fn elapsed_seconds(&mut self) -> f64 {
        let now = self.bindings.gettimeofday();

        let seconds = now.seconds.saturating_sub(self.start.seconds) as f64;
        let microseconds = now.microseconds.saturating_sub(self.start.microseconds) as f64;

        (seconds + microseconds / MICROS_PER_SECOND).max(0.0)
    }
}
