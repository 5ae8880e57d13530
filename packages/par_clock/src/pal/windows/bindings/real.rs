use windows::Win32::System::Performance::{QueryPerformanceCounter, QueryPerformanceFrequency};
use windows::Win32::System::SystemInformation::GetTickCount;

use crate::pal::windows::Bindings;

/// FFI bindings that target the real operating system that the build is targeting.
///
/// You would only use different bindings in PAL unit tests that need to use mock bindings.
/// Even then, whenever possible, unit tests should use real bindings for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

impl Bindings for BuildTargetBindings {
    fn query_performance_counter(&self) -> i64 {
        let mut value = 0_i64;

        // SAFETY: We are passing a valid output pointer, no other safety requirements.
        unsafe { QueryPerformanceCounter(&raw mut value) }
            .expect("QueryPerformanceCounter never fails on Windows XP or newer");

        value
    }

    fn query_performance_frequency(&self) -> i64 {
        let mut value = 0_i64;

        // SAFETY: We are passing a valid output pointer, no other safety requirements.
        unsafe { QueryPerformanceFrequency(&raw mut value) }
            .expect("QueryPerformanceFrequency never fails on Windows XP or newer");

        value
    }

    fn get_tick_count(&self) -> u32 {
        // SAFETY: No safety requirements.
        unsafe { GetTickCount() }
    }
}
