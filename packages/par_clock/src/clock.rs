use std::time::Duration;

use crate::pal::{Platform, PlatformFacade, PlatformTimer, TimerFacade};

const MILLIS_PER_SECOND: f64 = 1_000.0;

/// A stopwatch that measures the time elapsed since it was created or last reset.
///
/// The clock uses the highest-resolution time source of the operating system it was built
/// for. Readings are fractional seconds (or milliseconds) and never negative.
///
/// Each clock is an independent measurement. You can own one directly and pass it to the code
/// being timed, or use [`Clock::with_instance()`] to reach a clock belonging to the calling
/// thread from anywhere in the process.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use par_clock::Clock;
///
/// let mut clock = Clock::new();
///
/// std::thread::sleep(Duration::from_millis(10));
///
/// assert!(clock.milliseconds() >= 9.0);
///
/// clock.reset();
/// assert!(clock.seconds() < 1.0);
/// ```
#[derive(Debug)]
pub struct Clock {
    timer: TimerFacade,
}

impl Clock {
    /// Creates a clock that starts measuring immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::from_pal(&PlatformFacade::real())
    }

    #[must_use]
    pub(crate) fn from_pal(pal: &PlatformFacade) -> Self {
        Self {
            timer: pal.new_timer(),
        }
    }

    /// Makes the current instant the reference point for subsequent readings.
    pub fn reset(&mut self) {
        self.timer.reset();
    }

    /// Seconds elapsed since the last [`reset()`][Self::reset] or since the clock was created.
    #[must_use]
    pub fn seconds(&mut self) -> f64 {
        self.timer.elapsed_seconds()
    }

    /// Milliseconds elapsed since the last [`reset()`][Self::reset] or since the clock was
    /// created.
    ///
    /// This is exactly [`seconds()`][Self::seconds] multiplied by 1000.
    #[must_use]
    pub fn milliseconds(&mut self) -> f64 {
        self.seconds() * MILLIS_PER_SECOND
    }

    /// The same reading as [`seconds()`][Self::seconds], as a [`Duration`].
    #[must_use]
    pub fn elapsed(&mut self) -> Duration {
        Duration::from_secs_f64(self.seconds())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
