use thiserror::Error;

/// Errors that can occur when reaching a clock through [`Clock::try_with_instance()`].
///
/// [`Clock::try_with_instance()`]: crate::Clock::try_with_instance
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The calling thread has a team index that does not fit in the per-thread clock table.
    ///
    /// This is a configuration defect: the worker pool is larger than the clock table was
    /// sized for. Retrying will fail the same way.
    #[error(
        "team index {index} exceeds the per-thread clock capacity of {max_threads} threads"
    )]
    ThreadBoundExceeded {
        /// Team index of the thread that requested a clock.
        index: usize,

        /// Number of slots in the per-thread clock table.
        max_threads: usize,
    },

    /// The clock of the calling thread is already lent out further up the call stack of the
    /// same thread, typically because a closure timing a parallel phase ran nested Rayon work
    /// that reached for the same clock.
    ///
    /// Waiting would never end because the clock is only returned once the outer closure
    /// completes on this very thread.
    #[error(
        "the clock of this thread is already in use further up the call stack - read the clock before and after nested parallel work, not around it"
    )]
    ClockInUse,
}

/// A specialized `Result` type for clock access, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
