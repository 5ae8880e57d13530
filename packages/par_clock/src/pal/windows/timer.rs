use tracing::debug;

use crate::pal::windows::{Bindings, BindingsFacade};
use crate::pal::{PlatformTimer, leap_adjustment};

const MICROS_PER_SECOND: i128 = 1_000_000;

/// Measures elapsed time with the performance counter, guarded against counter leaps
/// by cross-checking with the coarse millisecond tick counter.
#[derive(Debug)]
pub(crate) struct TimerImpl {
    // Performance counter ticks per second, fixed at boot.
    frequency: i64,

    start_counter: i64,
    start_tick: u32,

    // Corrected elapsed ticks of the previous reading. Bounds the next leap correction.
    previous_elapsed_ticks: i64,

    bindings: BindingsFacade,
}

impl TimerImpl {
    pub(crate) fn new(bindings: BindingsFacade) -> Self {
        let frequency = bindings.query_performance_frequency();
        assert!(
            frequency > 0,
            "performance counter frequency is {frequency} - the platform is broken"
        );

        let mut timer = Self {
            frequency,
            start_counter: 0,
            start_tick: 0,
            previous_elapsed_ticks: 0,
            bindings,
        };

        timer.reset();
        timer
    }
}

impl PlatformTimer for TimerImpl {
    fn reset(&mut self) {
        self.start_counter = self.bindings.query_performance_counter();
        self.start_tick = self.bindings.get_tick_count();
        self.previous_elapsed_ticks = 0;
    }

    fn elapsed_seconds(&mut self) -> f64 {
        let counter = self.bindings.query_performance_counter();
        let mut elapsed_ticks = counter.saturating_sub(self.start_counter);

        // The tick counter is 32 bits wide, so a wrap during a measurement is routine.
        let coarse_elapsed_millis = self
            .bindings
            .get_tick_count()
            .wrapping_sub(self.start_tick);

        let adjustment = leap_adjustment(
            elapsed_ticks,
            self.frequency,
            coarse_elapsed_millis,
            self.previous_elapsed_ticks,
        );

        if adjustment != 0 {
            debug!(
                elapsed_ticks,
                coarse_elapsed_millis,
                adjustment_ticks = adjustment,
                "performance counter leap detected, moving start instant"
            );

            self.start_counter = self.start_counter.saturating_add(adjustment);
            elapsed_ticks = elapsed_ticks.saturating_sub(adjustment);
        }

        self.previous_elapsed_ticks = elapsed_ticks;

        ticks_to_seconds(elapsed_ticks, self.frequency)
    }
}

/// Converts ticks to seconds, truncated to whole microseconds.
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division,
    clippy::cast_precision_loss,
    reason = "widened to i128; microsecond counts stay far below the 2^53 limit of exact f64 integers"
)]
fn ticks_to_seconds(ticks: i64, frequency: i64) -> f64 {
    let micros = MICROS_PER_SECOND * i128::from(ticks) / i128::from(frequency);

    (micros as f64 / MICROS_PER_SECOND as f64).max(0.0)
}
