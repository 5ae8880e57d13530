//! Times the phases of a small parallel computation, once with an explicitly owned clock
//! and once per worker thread through the per-thread clocks.

use par_clock::Clock;
use rayon::prelude::*;

fn main() {
    let mut total = Clock::new();

    let values: Vec<f64> = (0..2_000_000_u32).map(f64::from).collect();
    println!("Setup took {:.3} ms", total.milliseconds());

    total.reset();

    let worker_millis: Vec<f64> = values
        .par_chunks(100_000)
        .map(|chunk| {
            Clock::with_instance(Clock::reset);

            let sum: f64 = chunk.iter().map(|v| v.sqrt()).sum();
            std::hint::black_box(sum);

            Clock::with_instance(Clock::milliseconds)
        })
        .collect();

    println!("Parallel phase took {:.3} ms", total.milliseconds());

    for (chunk, millis) in worker_millis.iter().enumerate() {
        println!("  chunk {chunk}: {millis:.3} ms");
    }
}
