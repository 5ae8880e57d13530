use std::cell::RefCell;
use std::ptr;
use std::sync::{Mutex, OnceLock, PoisonError, TryLockError};

use crossbeam_utils::CachePadded;
use tracing::trace;

use crate::error::Result;
use crate::{Clock, Error};

/// Number of per-thread clocks available to [`Clock::with_instance()`].
///
/// A worker thread whose team index is equal to or greater than this cannot obtain a clock.
pub const MAX_THREADS: usize = 256;

// Each slot sits on its own cache line(s) because neighboring workers reset and read their
// clocks at high frequency. Within one pool a slot is only ever locked by the thread with the
// matching team index, so the mutex is only contended when several pools run at the same time.
type Slot = CachePadded<OnceLock<Mutex<Clock>>>;

static TEAM_SLOTS: [Slot; MAX_THREADS] =
    [const { CachePadded::new(OnceLock::new()) }; MAX_THREADS];

// Used by every thread that is not a member of a parallel team.
static SHARED: OnceLock<Mutex<Clock>> = OnceLock::new();

thread_local! {
    // Addresses of the slots whose clock the current thread has lent out to a closure.
    static LENT_SLOTS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

impl Clock {
    /// Calls `f` with the clock that belongs to the calling thread.
    ///
    /// When the crate is built with the `rayon` feature and the caller is a Rayon worker thread,
    /// every worker index gets its own clock that no other thread of the pool touches. Any
    /// other caller gets the single process-wide clock.
    ///
    /// Clocks are created on first access and live until the process exits. Repeated calls from
    /// the same thread always reach the same clock.
    ///
    /// Worker indexes are assigned per pool, so worker `N` of every Rayon pool reaches the same
    /// clock. If several pools (including the global one) time work at the same time, their
    /// same-index workers reset and read one shared clock. Pass an owned [`Clock`] to such work
    /// instead.
    ///
    /// The clock is lent to `f` for the duration of the call. If `f` reaches the same clock again
    /// on the same thread (directly, or because it runs nested Rayon work such as
    /// `rayon::join()` and the worker picks up a task that also calls `with_instance()`), the
    /// inner access fails instead of waiting for a clock that will never be returned. Read the
    /// clock before and after the parallel phase instead of around it.
    ///
    /// # Panics
    ///
    /// Panics if the Rayon worker index of the calling thread is [`MAX_THREADS`] or greater.
    /// This means the worker pool is larger than the process is provisioned for.
    ///
    /// Panics if the clock of the calling thread is already lent out further up the call stack
    /// of the same thread.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use par_clock::Clock;
    ///
    /// Clock::with_instance(Clock::reset);
    ///
    /// // Some work...
    ///
    /// let elapsed_millis = Clock::with_instance(Clock::milliseconds);
    /// assert!(elapsed_millis >= 0.0);
    /// ```
    pub fn with_instance<F, R>(f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        Self::try_with_instance(f).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Calls `f` with the clock that belongs to the calling thread, as
    /// [`with_instance()`][Self::with_instance] does, but returns an error instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThreadBoundExceeded`] without calling `f` if the Rayon worker index of
    /// the calling thread is [`MAX_THREADS`] or greater.
    ///
    /// Returns [`Error::ClockInUse`] without calling `f` if the clock of the calling thread is
    /// already lent out further up the call stack of the same thread.
    pub fn try_with_instance<F, R>(f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> R,
    {
        let slot = instance_for(team_index())?;

        with_clock(slot, f)
    }
}

#[cfg(feature = "rayon")]
fn team_index() -> Option<usize> {
    rayon::current_thread_index()
}

#[cfg(not(feature = "rayon"))]
fn team_index() -> Option<usize> {
    None
}

fn instance_for(team_index: Option<usize>) -> Result<&'static Mutex<Clock>> {
    match team_index {
        Some(index) => team_slot(index),
        None => Ok(SHARED.get_or_init(|| {
            trace!("creating shared process clock");
            Mutex::new(Clock::new())
        })),
    }
}

fn team_slot(index: usize) -> Result<&'static Mutex<Clock>> {
    let slot = TEAM_SLOTS.get(index).ok_or(Error::ThreadBoundExceeded {
        index,
        max_threads: MAX_THREADS,
    })?;

    Ok(slot.get_or_init(|| {
        trace!(index, "creating per-thread clock");
        Mutex::new(Clock::new())
    }))
}

fn with_clock<F, R>(slot: &Mutex<Clock>, f: F) -> Result<R>
where
    F: FnOnce(&mut Clock) -> R,
{
    let address = ptr::from_ref(slot).addr();

    // A panic in some earlier `f` cannot leave a clock in an invalid state.
    let mut clock = match slot.try_lock() {
        Ok(clock) => clock,
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        Err(TryLockError::WouldBlock) => {
            if LENT_SLOTS.with_borrow(|lent| lent.contains(&address)) {
                return Err(Error::ClockInUse);
            }

            // Held by another thread: a same-index worker of another pool, or another thread
            // outside any pool. It gives the clock back as soon as its closure returns.
            slot.lock().unwrap_or_else(PoisonError::into_inner)
        }
    };

    let _lease = Lease::new(address);

    Ok(f(&mut clock))
}

/// Marks a slot as lent out by the current thread until dropped.
struct Lease {
    address: usize,
}

impl Lease {
    fn new(address: usize) -> Self {
        LENT_SLOTS.with_borrow_mut(|lent| lent.push(address));

        Self { address }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        LENT_SLOTS.with_borrow_mut(|lent| lent.retain(|&a| a != self.address));
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::thread;
    use std::time::Duration;

    use super::*;

    // Slots are process-wide and tests run in parallel, so every test sticks to its own slots.

    #[test]
    fn slot_is_cache_line_aligned() {
        assert!(align_of::<Slot>() >= 64);
        assert_eq!(size_of::<Slot>() % 64, 0);
    }

    #[test]
    fn team_slot_is_stable() {
        let a = team_slot(200).unwrap();
        let b = team_slot(200).unwrap();

        assert!(ptr::eq(a, b));
    }

    #[test]
    fn team_slots_are_distinct() {
        let first = team_slot(201).unwrap();
        let last = team_slot(MAX_THREADS - 1).unwrap();

        assert!(!ptr::eq(first, last));
    }

    #[test]
    fn team_index_at_capacity_is_rejected() {
        for index in [MAX_THREADS, MAX_THREADS + 1, usize::MAX] {
            let error = team_slot(index).unwrap_err();

            assert!(matches!(
                error,
                Error::ThreadBoundExceeded {
                    index: i,
                    max_threads: MAX_THREADS,
                } if i == index
            ));
        }
    }

    #[test]
    fn no_team_index_means_shared_clock() {
        let a = instance_for(None).unwrap();
        let b = instance_for(None).unwrap();

        assert!(ptr::eq(a, b));
        assert!(!ptr::eq(a, team_slot(202).unwrap()));
    }

    #[test]
    #[cfg(not(miri))] // Miri cannot talk to the real platform.
    fn team_clocks_are_isolated() {
        let busy = team_slot(210).unwrap();
        let idle = team_slot(211).unwrap();

        with_clock(busy, Clock::reset).unwrap();
        with_clock(idle, Clock::reset).unwrap();

        thread::sleep(Duration::from_millis(50));

        with_clock(busy, Clock::reset).unwrap();

        let busy_seconds = with_clock(busy, Clock::seconds).unwrap();
        let idle_seconds = with_clock(idle, Clock::seconds).unwrap();

        assert!(busy_seconds < 0.045, "{busy_seconds}");
        assert!(idle_seconds >= 0.045, "{idle_seconds}");
    }

    #[test]
    #[cfg(not(miri))] // Miri cannot talk to the real platform.
    fn team_clock_read_right_after_reset_is_below_a_millisecond() {
        let slot = team_slot(212).unwrap();

        let fastest = (0..20)
            .map(|_| {
                with_clock(slot, |clock| {
                    clock.reset();
                    clock.seconds()
                })
                .unwrap()
            })
            .fold(f64::INFINITY, f64::min);

        assert!(fastest >= 0.0, "{fastest}");
        assert!(fastest < 0.001, "{fastest}");
    }

    #[test]
    fn poisoned_slot_remains_usable() {
        let slot = team_slot(220).unwrap();

        let result = catch_unwind(AssertUnwindSafe(|| {
            with_clock::<_, ()>(slot, |_| panic!("timed code failed")).unwrap();
        }));
        assert!(result.is_err());

        assert!(slot.is_poisoned());
        assert!(with_clock(slot, Clock::seconds).unwrap() >= 0.0);
    }

    #[test]
    fn nested_access_to_same_slot_fails_fast() {
        let slot = team_slot(230).unwrap();

        let inner = with_clock(slot, |outer| {
            outer.reset();
            with_clock(slot, Clock::seconds)
        })
        .unwrap();

        assert!(matches!(inner, Err(Error::ClockInUse)));

        // The clock is available again once the outer closure has returned.
        assert!(with_clock(slot, Clock::seconds).is_ok());
    }

    #[test]
    fn nested_access_to_other_slot_is_allowed() {
        let outer_slot = team_slot(231).unwrap();
        let inner_slot = team_slot(232).unwrap();

        let inner = with_clock(outer_slot, |_| with_clock(inner_slot, Clock::seconds)).unwrap();

        assert!(inner.is_ok());
    }

    #[test]
    fn lease_is_returned_after_panic() {
        let slot = team_slot(233).unwrap();

        let result = catch_unwind(AssertUnwindSafe(|| {
            with_clock::<_, ()>(slot, |_| panic!("timed code failed")).unwrap();
        }));
        assert!(result.is_err());

        let address = ptr::from_ref(slot).addr();
        assert!(!LENT_SLOTS.with_borrow(|lent| lent.contains(&address)));
        assert!(with_clock(slot, Clock::seconds).is_ok());
    }

    #[test]
    fn nested_with_instance_panics_instead_of_hanging() {
        let result = catch_unwind(|| Clock::with_instance(|_| Clock::with_instance(Clock::seconds)));

        assert!(result.is_err());
    }

    #[test]
    fn contended_slot_waits_for_other_thread() {
        let slot = team_slot(234).unwrap();

        let seconds = thread::scope(|s| {
            let (locked_tx, locked_rx) = std::sync::mpsc::channel();

            let holder = s.spawn(move || {
                with_clock(slot, |_| {
                    locked_tx.send(()).unwrap();
                    thread::sleep(Duration::from_millis(20));
                })
                .unwrap();
            });

            locked_rx.recv().unwrap();

            // Not lent out by this thread, so this waits rather than failing.
            let seconds = with_clock(slot, Clock::seconds);

            holder.join().unwrap();
            seconds
        });

        assert!(seconds.is_ok());
    }

    #[test]
    fn with_instance_outside_team_is_stable() {
        let a = Clock::with_instance(|clock| ptr::from_mut(clock).addr());
        let b = Clock::with_instance(|clock| ptr::from_mut(clock).addr());

        assert_eq!(a, b);
    }

    #[test]
    fn with_instance_threads_outside_team_share_clock() {
        let here = Clock::with_instance(|clock| ptr::from_mut(clock).addr());
        let there = thread::spawn(|| Clock::with_instance(|clock| ptr::from_mut(clock).addr()))
            .join()
            .unwrap();

        assert_eq!(here, there);
    }
}
