#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! High-resolution elapsed-time measurement that is safe to use from parallel worker threads.
//!
//! A [`Clock`] is a stopwatch: it remembers a start instant and reports the time elapsed since
//! then, in fractional seconds or milliseconds. The start instant is set when the clock is
//! created and moved by [`Clock::reset()`].
//!
//! Clocks use the best time source the build target offers:
//!
//! - On Windows, the performance counter, cross-checked against the millisecond tick counter to
//!   filter out sporadic counter leaps that some hardware exhibits.
//! - On Unix, the microsecond-resolution wall clock (`gettimeofday`).
//! - Elsewhere, [`std::time::Instant`].
//!
//! # Per-thread clocks
//!
//! Code that is deep inside a parallel computation often has no clock passed to it. For that,
//! [`Clock::with_instance()`] provides a process-wide clock per calling thread. With the
//! (default) `rayon` feature, every Rayon worker gets a clock of its own, selected by its worker
//! index, so workers never disturb each other's measurements. Pools of up to [`MAX_THREADS`]
//! workers are supported. Threads outside Rayon pools share one process-wide clock.
//!
//! # Basic usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use par_clock::Clock;
//!
//! let mut clock = Clock::new();
//!
//! // Do some work...
//! std::thread::sleep(Duration::from_millis(10));
//!
//! println!("Operation took {} ms", clock.milliseconds());
//! ```
//!
//! # Timing parallel work
//!
//! ```rust
//! use par_clock::Clock;
//! use rayon::prelude::*;
//!
//! let sums: Vec<f64> = (0..8_u32)
//!     .into_par_iter()
//!     .map(|chunk| {
//!         Clock::with_instance(Clock::reset);
//!
//!         let sum = (0..10_000_u32).map(|i| f64::from(i * chunk)).sum::<f64>();
//!
//!         let seconds = Clock::with_instance(Clock::seconds);
//!         assert!(seconds >= 0.0);
//!
//!         sum
//!     })
//!     .collect();
//!
//! assert_eq!(sums.len(), 8);
//! ```

mod pal;

mod clock;
mod error;
mod instance;

pub use clock::*;
pub use error::Error;
pub use instance::MAX_THREADS;
