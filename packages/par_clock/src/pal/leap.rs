//! Detection of sporadic leaps in a high-resolution performance counter.
//!
//! Some chipsets make the performance counter jump forward by hundreds of milliseconds at
//! random. We cross-check it against a coarse millisecond tick counter that does not suffer
//! from this and treat any divergence beyond [`LEAP_TOLERANCE_MILLIS`] as a counter fault.

/// How far the two counters may disagree before the high-resolution one is considered faulty.
pub(crate) const LEAP_TOLERANCE_MILLIS: i128 = 100;

const MILLIS_PER_SECOND: i128 = 1_000;

/// Calculates how many performance counter ticks the start instant must move by to undo a leap.
///
/// * `elapsed_ticks` - performance counter ticks elapsed since the start instant.
/// * `frequency` - performance counter ticks per second.
/// * `coarse_elapsed_millis` - tick counter milliseconds elapsed since the start instant.
/// * `previous_elapsed_ticks` - the corrected `elapsed_ticks` of the previous reading.
///
/// Returns zero if the counters agree. Otherwise returns the divergence converted to ticks,
/// capped at the ticks elapsed since the previous reading so a correction can never take the
/// elapsed time below what was already reported. The caller adds the result to its start
/// instant and subtracts it from `elapsed_ticks`.
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division,
    reason = "widened to i128, no realistic counter values can overflow; truncation is intended"
)]
#[must_use]
pub(crate) fn leap_adjustment(
    elapsed_ticks: i64,
    frequency: i64,
    coarse_elapsed_millis: u32,
    previous_elapsed_ticks: i64,
) -> i64 {
    debug_assert!(frequency > 0, "performance counter frequency must be positive");

    let elapsed_ticks = i128::from(elapsed_ticks);
    let frequency = i128::from(frequency);

    let precise_elapsed_millis = MILLIS_PER_SECOND * elapsed_ticks / frequency;
    let divergence_millis = precise_elapsed_millis - i128::from(coarse_elapsed_millis);

    if divergence_millis.abs() <= LEAP_TOLERANCE_MILLIS {
        return 0;
    }

    let divergence_ticks = divergence_millis * frequency / MILLIS_PER_SECOND;
    let since_previous_ticks = elapsed_ticks - i128::from(previous_elapsed_ticks);

    saturate_to_i64(divergence_ticks.min(since_previous_ticks))
}

fn saturate_to_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
