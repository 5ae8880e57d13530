use std::fmt::Debug;

/// A wall clock reading split into whole seconds and the microseconds within that second.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WallClockReading {
    pub(crate) seconds: i64,
    pub(crate) microseconds: i64,
}

/// Bindings for FFI calls into external libraries (either provided by operating system or not).
///
/// All PAL FFI calls must go through this trait, enabling them to be mocked.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    fn gettimeofday(&self) -> WallClockReading;
}
