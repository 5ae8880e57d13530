use std::fmt::Debug;

#[cfg(test)]
use crate::pal::MockPlatformTimer;
use crate::pal::{PlatformTimer, TimerImpl};

/// The timer owned by a single `Clock`. Exactly one real implementation exists per build target.
pub(crate) enum TimerFacade {
    Real(TimerImpl),

    // Boxed because mocks are much larger than any real timer.
    #[cfg(test)]
    Mock(Box<MockPlatformTimer>),
}

impl From<TimerImpl> for TimerFacade {
    fn from(timer: TimerImpl) -> Self {
        Self::Real(timer)
    }
}

#[cfg(test)]
impl From<MockPlatformTimer> for TimerFacade {
    fn from(timer: MockPlatformTimer) -> Self {
        Self::Mock(Box::new(timer))
    }
}

impl PlatformTimer for TimerFacade {
    fn reset(&mut self) {
        match self {
            Self::Real(timer) => timer.reset(),
            #[cfg(test)]
            Self::Mock(timer) => timer.reset(),
        }
    }

    fn elapsed_seconds(&mut self) -> f64 {
        match self {
            Self::Real(timer) => timer.elapsed_seconds(),
            #[cfg(test)]
            Self::Mock(timer) => timer.elapsed_seconds(),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl Debug for TimerFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(timer) => timer.fmt(f),
            #[cfg(test)]
            Self::Mock(timer) => timer.fmt(f),
        }
    }
}
