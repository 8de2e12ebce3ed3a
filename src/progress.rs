//! # Progress — Cross-Off Progress Meter
//!
//! Tracks how far a sieve run has advanced through its cross-off loop. The
//! work for a small prime `g` is proportional to the number of its multiples
//! in the region, i.e. to `1 / norm(g)`, so the meter weights each prime by
//! the reciprocal of its norm and reports whole-percent milestones to stderr
//! while the verbose flag is set.
//!
//! The sieve loop is serial (one cross-off at a time, ascending norm), so
//! the meter is a plain struct stepped inline — no atomics, no reporter
//! thread.

use crate::gint::GaussInt;
use std::time::Instant;
use tracing::info;

pub struct Progress {
    total: f64,
    done: f64,
    last_percent: u32,
    start: Instant,
}

impl Progress {
    /// Build a meter for a cross-off pass over `small_primes`.
    pub fn new(small_primes: &[GaussInt]) -> Self {
        let total = small_primes
            .iter()
            .map(|g| 1.0 / g.norm() as f64)
            .sum::<f64>()
            .max(f64::MIN_POSITIVE);
        Progress {
            total,
            done: 0.0,
            last_percent: 0,
            start: Instant::now(),
        }
    }

    /// Record the completed cross-off of `g`; log when a percent boundary
    /// is crossed.
    pub fn step(&mut self, g: GaussInt, verbose: bool) {
        self.done += 1.0 / g.norm() as f64;
        let percent = ((self.done / self.total) * 100.0) as u32;
        if verbose && percent > self.last_percent {
            self.last_percent = percent;
            info!(
                percent = percent.min(100),
                elapsed_secs = self.start.elapsed().as_secs_f64(),
                "sieving"
            );
        }
    }

    /// Fraction of the cross-off work completed, in [0, 1].
    pub fn fraction(&self) -> f64 {
        (self.done / self.total).min(1.0)
    }
}
