//! # Analysis — Angular Distribution and Sector Races
//!
//! Statistics over the primes a sieve produces: a histogram of prime
//! arguments across the first octant, and the "race" between two disjoint
//! angular sectors — the cumulative difference of their prime counts as the
//! norm grows, the two-dimensional sibling of the classical π(x; 4, 3)
//! versus π(x; 4, 1) race.

use crate::donut::OctantDonutSieve;
use crate::gint::GaussInt;
use crate::sector::SectorSieve;
use crate::sieve::{primes_flat, Sieve};
use anyhow::{ensure, Result};
use std::f64::consts::FRAC_PI_4;
use tracing::info;

/// Histogram of prime arguments over `[0, π/4)` in `n_sectors` equal bins.
///
/// The diagonal prime `1 + i` sits exactly on the closed endpoint and falls
/// outside the last bin; inert primes at angle zero land in the first, which
/// gives it a visible bump.
pub fn angular_distribution(max_norm: u64, n_sectors: u32) -> Result<Vec<u64>> {
    ensure!(n_sectors >= 1, "need at least one sector bin");
    let mut sieve = OctantDonutSieve::new(max_norm, false)?;
    sieve.run()?;
    sieve.collect_big_primes();
    let mut sectors = vec![0u64; n_sectors as usize];
    for g in sieve.big_primes() {
        let bin = (n_sectors as f64 * g.arg() / FRAC_PI_4) as i64;
        if (0..n_sectors as i64).contains(&bin) {
            sectors[bin as usize] += 1;
        }
    }
    Ok(sectors)
}

/// Cumulative comparison of prime counts in two disjoint angular sectors.
pub struct SectorRace {
    max_norm: u64,
    n_bins: u64,
    first: Vec<GaussInt>,
    second: Vec<GaussInt>,
    norm_data: Vec<i64>,
}

impl SectorRace {
    pub fn new(
        max_norm: u64,
        n_bins: u64,
        (alpha, beta): (f64, f64),
        (gamma, delta): (f64, f64),
    ) -> Result<Self> {
        ensure!(n_bins >= 1, "need at least one norm bin");
        ensure!(
            beta <= gamma || delta <= alpha,
            "sectors [{}, {}] and [{}, {}] overlap",
            alpha,
            beta,
            gamma,
            delta
        );
        info!(max_norm, "running sector sieves for the race");
        let mut s1 = SectorSieve::new(max_norm, alpha, beta, false)?;
        s1.run()?;
        s1.collect_big_primes();
        let mut s2 = SectorSieve::new(max_norm, gamma, delta, false)?;
        s2.run()?;
        s2.collect_big_primes();
        let first = std::mem::take(&mut s1.core_mut().big_primes);
        let second = std::mem::take(&mut s2.core_mut().big_primes);

        let mut race = SectorRace {
            max_norm,
            n_bins,
            first,
            second,
            norm_data: Vec::new(),
        };
        race.set_norm_data();
        Ok(race)
    }

    /// Signed per-bin counts (+1 first sector, −1 second), overwritten by
    /// their cumulative sum.
    fn set_norm_data(&mut self) {
        let mut data = vec![0i64; self.n_bins as usize];
        let bin_of = |g: &GaussInt| -> usize {
            let ix = (g.norm() as u128 * self.n_bins as u128 / self.max_norm as u128) as usize;
            ix.min(self.n_bins as usize - 1)
        };
        for g in &self.first {
            data[bin_of(g)] += 1;
        }
        for g in &self.second {
            data[bin_of(g)] -= 1;
        }
        let mut running = 0i64;
        for slot in data.iter_mut() {
            running += *slot;
            *slot = running;
        }
        self.norm_data = data;
    }

    pub fn first_sector(&self) -> &[GaussInt] {
        &self.first
    }

    pub fn second_sector(&self) -> &[GaussInt] {
        &self.second
    }

    /// Flat interleaved views for a numerical front end.
    pub fn first_sector_flat(&self) -> Vec<i64> {
        primes_flat(&self.first)
    }

    pub fn second_sector_flat(&self) -> Vec<i64> {
        primes_flat(&self.second)
    }

    /// Cumulative signed counts per norm bin.
    pub fn norm_data(&self) -> &[i64] {
        &self.norm_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octant::OctantSieve;

    #[test]
    fn rejects_overlapping_sectors() {
        assert!(SectorRace::new(1000, 10, (0.0, 0.4), (0.3, 0.7)).is_err());
        assert!(SectorRace::new(1000, 10, (0.0, 0.4), (0.4, 0.7)).is_ok());
    }

    #[test]
    fn histogram_sums_to_octant_count_without_the_diagonal() {
        let bins = angular_distribution(10_000, 16).unwrap();
        let mut octant = OctantSieve::new(10_000, false).unwrap();
        octant.run().unwrap();
        let count = octant.take_big_primes_sorted().len() as u64;
        // 1 + i sits on the closed endpoint of the octant and is not binned.
        assert_eq!(bins.iter().sum::<u64>(), count - 1);
    }

    #[test]
    fn histogram_first_bin_holds_the_inert_primes() {
        let bins = angular_distribution(400, 4).unwrap();
        // Inert primes 3, 7, 11, 19 (norms 9, 49, 121, 361) have angle zero.
        let mut octant = OctantSieve::new(400, false).unwrap();
        octant.run().unwrap();
        let inert = octant
            .take_big_primes_sorted()
            .into_iter()
            .filter(|g| g.b == 0)
            .count() as u64;
        assert_eq!(inert, 4);
        assert!(bins[0] >= inert);
    }

    #[test]
    fn race_totals_match_sector_counts() {
        let race = SectorRace::new(10_000, 25, (0.0, 0.3), (0.45, FRAC_PI_4)).unwrap();
        let expected = race.first_sector().len() as i64 - race.second_sector().len() as i64;
        assert_eq!(*race.norm_data().last().unwrap(), expected);
        assert_eq!(race.norm_data().len(), 25);
    }

    #[test]
    fn flat_views_interleave() {
        let race = SectorRace::new(1_000, 4, (0.0, 0.2), (0.3, 0.5)).unwrap();
        let flat = race.first_sector_flat();
        assert_eq!(flat.len(), 2 * race.first_sector().len());
        for (i, g) in race.first_sector().iter().enumerate() {
            assert_eq!(flat[2 * i], g.a);
            assert_eq!(flat[2 * i + 1], g.b);
        }
    }
}
