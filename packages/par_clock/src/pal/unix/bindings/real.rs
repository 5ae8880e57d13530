use std::{io, mem, ptr};

use libc::timeval;

use crate::pal::unix::{Bindings, WallClockReading};

/// FFI bindings that target the real operating system that the build is targeting.
///
/// You would only use different bindings in PAL unit tests that need to use mock bindings.
/// Even then, whenever possible, unit tests should use real bindings for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

impl Bindings for BuildTargetBindings {
    /// Returns the current wall clock time with microsecond resolution.
    ///
    /// `gettimeofday` only fails for an invalid output pointer, which we never pass,
    /// so a failure here means the environment is broken beyond recovery.
    fn gettimeofday(&self) -> WallClockReading {
        // SAFETY: All-zero is a valid initial value for this type.
        let mut tv: timeval = unsafe { mem::zeroed() };

        // SAFETY: We are passing a valid output pointer and no timezone, no other safety requirements.
        let result = unsafe { libc::gettimeofday(&raw mut tv, ptr::null_mut()) };

        assert!(result == 0, "{}", io::Error::last_os_error());

        WallClockReading {
            seconds: i64::from(tv.tv_sec),
            microseconds: i64::from(tv.tv_usec),
        }
    }
}
