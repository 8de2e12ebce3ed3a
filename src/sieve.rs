//! # Sieve — Shared Sieve Skeleton
//!
//! Every sieve flavor runs the same three-phase pipeline over its own array
//! geometry:
//!
//! 1. **Small primes** — Gaussian primes of norm up to the square root of
//!    the region's largest norm, obtained from [`crate::smallprimes::bootstrap`]
//!    or injected by a driver that precomputed them (the moat explorers).
//! 2. **Cross-off** — for each small prime in ascending `(norm, a, b)` order,
//!    clear the cells of its multiples. Region-specific arithmetic lives in
//!    the concrete sieves; progress is weighted by `1/norm`.
//! 3. **Harvest** — survivors are the Gaussian primes of the region.
//!
//! The original class hierarchy (abstract base + cell-type template) is
//! re-cut as the [`Sieve`] trait over a shared [`SieveCore`] record. The
//! array stays private to each flavor; readers go through the region-checked
//! [`Sieve::survivor`] query.

use crate::gint::GaussInt;
use crate::progress::Progress;
use crate::smallprimes::{bootstrap, isqrt};
use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::RangeInclusive;
use tracing::info;

/// Largest admissible norm bound: coordinate squares must stay inside `i64`.
pub const MAX_NORM_BOUND: u64 = 1 << 62;

/// State shared by every sieve flavor.
pub struct SieveCore {
    pub max_norm: u64,
    pub verbose: bool,
    pub small_primes: Vec<GaussInt>,
    pub big_primes: Vec<GaussInt>,
}

impl SieveCore {
    pub fn new(max_norm: u64, verbose: bool) -> Result<Self> {
        ensure!(
            max_norm <= MAX_NORM_BOUND,
            "norm bound {} exceeds the machine-integer range (max {})",
            max_norm,
            MAX_NORM_BOUND
        );
        Ok(SieveCore {
            max_norm,
            verbose,
            small_primes: Vec::new(),
            big_primes: Vec::new(),
        })
    }

    /// Install a precomputed prime list, keeping the primes that can have a
    /// multiple in the region. Fails when the list does not reach the
    /// region's small-prime bound.
    pub fn inject_small_primes(&mut self, primes: &[GaussInt]) -> Result<()> {
        let bound = isqrt(self.max_norm);
        let last = primes.last().context("not enough sieving primes: empty list")?;
        ensure!(
            last.norm() >= bound,
            "not enough sieving primes: largest norm {} is below the bound {}",
            last.norm(),
            bound
        );
        self.small_primes = primes.iter().copied().filter(|g| g.norm() <= bound).collect();
        Ok(())
    }
}

/// The common surface of the sieve family.
///
/// `collect_big_primes` replaces any previous harvest; the array itself is
/// read-only after `run`.
pub trait Sieve {
    fn core(&self) -> &SieveCore;
    fn core_mut(&mut self) -> &mut SieveCore;

    /// Norm bound for the sieving primes of this region.
    fn small_prime_bound(&self) -> u64;

    /// Allocate and initialize the sieve array (all candidates set).
    fn allocate_sieve_array(&mut self);

    /// Clear the cells of all multiples of `g` inside the region.
    fn cross_off_multiples(&mut self, g: GaussInt);

    /// Harvest survivors into `core().big_primes` (array-scan order).
    fn collect_big_primes(&mut self);

    /// Region-checked readback: true iff `(a, b)` is in the region and its
    /// cell is still set. False everywhere outside the region.
    fn survivor(&self, a: i64, b: i64) -> bool;

    /// Inclusive bounding box of the region, for rendering and scans.
    fn extent(&self) -> (RangeInclusive<i64>, RangeInclusive<i64>);

    /// The three-phase pipeline: small primes, array, cross-off loop.
    fn run(&mut self) -> Result<()> {
        if self.core().small_primes.is_empty() {
            let bound = self.small_prime_bound();
            self.core_mut().small_primes = bootstrap(bound)?;
        }
        self.allocate_sieve_array();
        let primes = self.core().small_primes.clone();
        let verbose = self.core().verbose;
        if verbose {
            info!(
                small_primes = primes.len(),
                max_norm = self.core().max_norm,
                "starting cross-off"
            );
        }
        let mut progress = Progress::new(&primes);
        for g in primes {
            self.cross_off_multiples(g);
            progress.step(g, verbose);
        }
        Ok(())
    }

    /// Sort the harvest by `(norm, a, b)`.
    fn sort_big_primes(&mut self) {
        self.core_mut().big_primes.sort();
    }

    fn big_primes(&self) -> &[GaussInt] {
        &self.core().big_primes
    }

    /// Harvest, sort, and move the primes out of the sieve.
    fn take_big_primes_sorted(&mut self) -> Vec<GaussInt> {
        self.collect_big_primes();
        self.sort_big_primes();
        std::mem::take(&mut self.core_mut().big_primes)
    }

    /// Write one `a,b` line per harvested prime to `primes_<N>.csv` in the
    /// working directory; returns the file name.
    fn write_big_primes_csv(&self) -> Result<String> {
        let name = format!("primes_{}.csv", self.core().max_norm);
        let file = File::create(&name).with_context(|| format!("creating {}", name))?;
        let mut out = BufWriter::new(file);
        for g in self.big_primes() {
            writeln!(out, "{},{}", g.a, g.b)?;
        }
        out.flush()?;
        Ok(name)
    }

    /// ASCII rendering of the sieve array in complex-plane orientation:
    /// rows from the top `b` down to the bottom, `*` for a surviving cell,
    /// space for anything else.
    fn render_sieve_array(&self) -> String {
        let (a_range, b_range) = self.extent();
        let mut text = String::new();
        for b in (*b_range.start()..=*b_range.end()).rev() {
            for a in a_range.clone() {
                text.push(if self.survivor(a, b) { '*' } else { ' ' });
            }
            text.push('\n');
        }
        text
    }
}

/// Flat interleaved export `[a₀, b₀, a₁, b₁, …]` for numerical consumers.
pub fn primes_flat(primes: &[GaussInt]) -> Vec<i64> {
    let mut flat = Vec::with_capacity(2 * primes.len());
    for g in primes {
        flat.push(g.a);
        flat.push(g.b);
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_rejects_overflowing_bound() {
        assert!(SieveCore::new(MAX_NORM_BOUND, false).is_ok());
        assert!(SieveCore::new(MAX_NORM_BOUND + 1, false).is_err());
    }

    #[test]
    fn inject_rejects_short_lists() {
        let mut core = SieveCore::new(10_000, false).unwrap();
        // Largest norm 5 < isqrt(10_000) = 100: not enough.
        let short = vec![GaussInt::new(1, 1), GaussInt::new(2, 1)];
        assert!(core.inject_small_primes(&short).is_err());
        assert!(core.inject_small_primes(&[]).is_err());
    }

    #[test]
    fn inject_filters_to_the_bound() {
        let mut core = SieveCore::new(100, false).unwrap();
        let primes = crate::smallprimes::gaussian_primes_direct(400);
        core.inject_small_primes(&primes).unwrap();
        assert!(!core.small_primes.is_empty());
        assert!(core.small_primes.iter().all(|g| g.norm() <= 10));
    }

    #[test]
    fn flat_export_interleaves() {
        let primes = vec![GaussInt::new(1, 1), GaussInt::new(2, 1)];
        assert_eq!(primes_flat(&primes), vec![1, 1, 2, 1]);
    }
}
