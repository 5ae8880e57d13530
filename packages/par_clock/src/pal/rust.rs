use std::time::Instant;

use crate::pal::{Platform, PlatformTimer};

/// We use this under Miri because Miri cannot talk to a real OS but Rust std time still works.
/// Targets that are neither Windows nor Unix also end up here.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

#[derive(Debug)]
pub(crate) struct BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    type Timer = TimerImpl;

    fn new_timer(&self) -> Self::Timer {
        TimerImpl {
            start: Instant::now(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct TimerImpl {
    start: Instant,
}

impl PlatformTimer for TimerImpl {
    fn reset(&mut self) {
        self.start = Instant::now();
    }

    fn elapsed_seconds(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
