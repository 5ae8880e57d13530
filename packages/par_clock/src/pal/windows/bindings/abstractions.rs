use std::fmt::Debug;

/// Bindings for FFI calls into external libraries (either provided by operating system or not).
///
/// All PAL FFI calls must go through this trait, enabling them to be mocked.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    fn query_performance_counter(&self) -> i64;

    fn query_performance_frequency(&self) -> i64;

    // Milliseconds since boot, wraps around every 49.7 days.
    fn get_tick_count(&self) -> u32;
}
