//! # Gintsieve — Core Library
//!
//! Enumerates Gaussian primes — the irreducible elements of ℤ[i] — with a
//! family of two-dimensional sieves of Eratosthenes, and explores the
//! connected-component structure of the prime graph under bounded hops
//! (the Gaussian moat problem).
//!
//! ## Module Organization
//!
//! **Sieve flavors** (one region geometry each, behind the shared
//! [`sieve::Sieve`] trait):
//! - [`octant`] — the first octant `0 ≤ b ≤ a`, a fundamental domain up to
//!   units and conjugation
//! - [`sector`] — an angular sector `α ≤ arg ≤ β` inside the octant
//! - [`block`] — an axis-aligned rectangle `[x, x+dx) × [y, y+dy)`
//! - [`donut`] — octant and block variants on the mod-10 wheel: one `u32`
//!   per 10×10 tile, one bit per residue coprime to 10
//!
//! **Infrastructure**:
//! - [`gint`] — the Gaussian-integer value type
//! - [`smallprimes`] — integer roots, signed division rounding, the
//!   wheel-30 rational sieve, and the recursive sieve bootstrap
//! - [`sieve`] — the `SieveCore` record, the `Sieve` trait, output helpers
//! - [`progress`] — the `1/norm`-weighted cross-off progress meter
//! - [`moat`] — octant, vertical, and segmented moat explorers
//! - [`analysis`] — angular histograms and sector races
//!
//! ## Pipeline
//!
//! Every sieve follows **small primes → array → cross-off → harvest**: the
//! Gaussian primes of norm up to `√N` are computed recursively (donut sieve
//! above 10⁶, plain octant above 10⁴, the rational-prime classification
//! below), multiples of each are cleared in ascending norm order, and the
//! surviving cells are the primes of the region.

pub mod analysis;
pub mod block;
pub mod donut;
pub mod gint;
pub mod moat;
pub mod octant;
pub mod progress;
pub mod sector;
pub mod sieve;
pub mod smallprimes;

use anyhow::Result;

pub use gint::GaussInt;
pub use sieve::Sieve;

/// Gaussian primes (octant representatives) of norm ≤ `max_norm`, sorted by
/// `(norm, a, b)`. Runs the donut octant sieve, the fastest flavor.
pub fn gaussian_primes_to_norm(max_norm: u64) -> Result<Vec<GaussInt>> {
    let mut sieve = donut::OctantDonutSieve::new(max_norm, false)?;
    sieve.run()?;
    Ok(sieve.take_big_primes_sorted())
}

/// Count of octant-representative Gaussian primes of norm ≤ `max_norm`.
pub fn gaussian_primes_to_norm_count(max_norm: u64) -> Result<u64> {
    let mut sieve = donut::OctantDonutSieve::new(max_norm, false)?;
    sieve.run()?;
    sieve.collect_big_primes();
    Ok(sieve.big_primes().len() as u64)
}

/// Flat interleaved `[a₀, b₀, a₁, b₁, …]` form of the primes to `max_norm`,
/// for handing to a numerical front end.
pub fn gaussian_primes_to_norm_flat(max_norm: u64) -> Result<Vec<i64>> {
    Ok(sieve::primes_flat(&gaussian_primes_to_norm(max_norm)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_to_norm_small() {
        let primes = gaussian_primes_to_norm(100).unwrap();
        assert_eq!(primes.len(), 14);
        assert_eq!(primes[0], GaussInt::new(1, 1));
        assert_eq!(*primes.last().unwrap(), GaussInt::new(9, 4));
    }

    #[test]
    fn count_matches_list() {
        assert_eq!(
            gaussian_primes_to_norm_count(5_000).unwrap() as usize,
            gaussian_primes_to_norm(5_000).unwrap().len()
        );
    }

    #[test]
    fn flat_form_pairs_up() {
        let primes = gaussian_primes_to_norm(1_000).unwrap();
        let flat = gaussian_primes_to_norm_flat(1_000).unwrap();
        assert_eq!(flat.len(), 2 * primes.len());
        assert_eq!(flat[0], 1);
        assert_eq!(flat[1], 1);
    }
}
