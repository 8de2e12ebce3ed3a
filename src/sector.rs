//! # SectorSieve — Sieve Over an Angular Sector
//!
//! Array indexed by Gaussian integers with `a² + b² ≤ N` and
//! `α ≤ atan2(b, a) ≤ β`, for `0 ≤ α < β ≤ π/4`. Storage is a jagged map
//! keyed by the real part: column `a` covers `b ∈ [⌈a·tan α⌉, ⌊a·tan β⌋]`
//! clipped by the norm bound and the diagonal.
//!
//! Column bounds are seeded in double precision from `tan` and then nudged
//! against `atan2` so a half-ulp of rounding cannot leak a cell across the
//! sector boundary. Small primes come from the full-octant bootstrap; the
//! cross-off is the octant band, and a multiple whose product leaves the
//! sector simply misses the column range — no wrap-around.

use crate::gint::GaussInt;
use crate::sieve::{Sieve, SieveCore};
use crate::smallprimes::{div_ceil_i64, div_floor_i64, isqrt};
use anyhow::{ensure, Result};
use std::f64::consts::FRAC_PI_4;
use std::ops::RangeInclusive;

pub struct SectorSieve {
    core: SieveCore,
    alpha: f64,
    beta: f64,
    root: i64,
    b_lo: Vec<i64>,
    columns: Vec<Vec<bool>>,
}

impl SectorSieve {
    pub fn new(max_norm: u64, alpha: f64, beta: f64, verbose: bool) -> Result<Self> {
        ensure!(
            alpha >= 0.0 && beta <= FRAC_PI_4 + 1e-12 && alpha < beta,
            "invalid sector: need 0 <= alpha < beta <= pi/4, got [{}, {}]",
            alpha,
            beta
        );
        let core = SieveCore::new(max_norm, verbose)?;
        let root = isqrt(max_norm) as i64;
        Ok(SectorSieve {
            core,
            alpha,
            beta,
            root,
            b_lo: Vec::new(),
            columns: Vec::new(),
        })
    }

    fn angle(b: i64, a: i64) -> f64 {
        (b as f64).atan2(a as f64)
    }

    /// Inclusive `b` bounds of column `a`, or None for an empty column.
    fn column_bounds(&self, a: i64) -> Option<(i64, i64)> {
        let cap = (isqrt(self.core.max_norm - (a * a) as u64) as i64).min(a);
        let mut lo = ((a as f64 * self.alpha.tan()).ceil() as i64).clamp(0, cap + 1);
        // tan seeding can be off by one in either direction; settle with atan2.
        while lo > 0 && Self::angle(lo - 1, a) >= self.alpha {
            lo -= 1;
        }
        while lo <= cap && Self::angle(lo, a) < self.alpha {
            lo += 1;
        }
        let mut hi = ((a as f64 * self.beta.tan()).floor() as i64).clamp(-1, cap);
        while hi < cap && Self::angle(hi + 1, a) <= self.beta {
            hi += 1;
        }
        while hi >= lo && Self::angle(hi, a) > self.beta {
            hi -= 1;
        }
        if lo <= hi {
            Some((lo, hi))
        } else {
            None
        }
    }

    #[inline]
    fn clear(&mut self, a: i64, b: i64) {
        if a < 0 || (a as usize) >= self.columns.len() {
            return;
        }
        let lo = self.b_lo[a as usize];
        let col = &mut self.columns[a as usize];
        let ix = b - lo;
        if ix >= 0 && (ix as usize) < col.len() {
            col[ix as usize] = false;
        }
    }
}

impl Sieve for SectorSieve {
    fn core(&self) -> &SieveCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SieveCore {
        &mut self.core
    }

    fn small_prime_bound(&self) -> u64 {
        isqrt(self.core.max_norm)
    }

    fn allocate_sieve_array(&mut self) {
        let mut b_lo = Vec::with_capacity((self.root + 1) as usize);
        let mut columns = Vec::with_capacity((self.root + 1) as usize);
        for a in 0..=self.root {
            match self.column_bounds(a) {
                Some((lo, hi)) => {
                    let mut col = vec![true; (hi - lo + 1) as usize];
                    for b in lo..=hi {
                        if (a + b) % 2 == 0 && !(a == 1 && b == 1) {
                            col[(b - lo) as usize] = false;
                        }
                    }
                    b_lo.push(lo);
                    columns.push(col);
                }
                None => {
                    b_lo.push(0);
                    columns.push(Vec::new());
                }
            }
        }
        self.b_lo = b_lo;
        self.columns = columns;
    }

    fn cross_off_multiples(&mut self, g: GaussInt) {
        let (c, d) = (g.a, g.b);
        if c == 1 && d == 1 {
            return; // multiples of 1 + i are gone from initialization
        }
        let m = self.core.max_norm / g.norm();
        let u_max = isqrt(m) as i64;
        for u in 1..=u_max {
            let v_cap = isqrt(m - (u * u) as u64) as i64;
            let v_lo = div_ceil_i64(-u * (c + d), c - d).max(-v_cap);
            let v_hi = div_floor_i64(u * (c - d), c + d).min(v_cap);
            for v in v_lo..=v_hi {
                if u == 1 && v == 0 {
                    continue;
                }
                let re = c * u - d * v;
                let im = c * v + d * u;
                self.clear(re, im.abs());
            }
        }
    }

    fn collect_big_primes(&mut self) {
        self.core.big_primes.clear();
        for (a, col) in self.columns.iter().enumerate() {
            let lo = self.b_lo[a];
            for (ix, &alive) in col.iter().enumerate() {
                let g = GaussInt::new(a as i64, lo + ix as i64);
                if alive && g.norm() > 1 {
                    self.core.big_primes.push(g);
                }
            }
        }
    }

    fn survivor(&self, a: i64, b: i64) -> bool {
        if a < 0 || (a as usize) >= self.columns.len() {
            return false;
        }
        let ix = b - self.b_lo[a as usize];
        let col = &self.columns[a as usize];
        ix >= 0 && (ix as usize) < col.len() && col[ix as usize]
    }

    fn extent(&self) -> (RangeInclusive<i64>, RangeInclusive<i64>) {
        (0..=self.root, 0..=self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octant::OctantSieve;
    use crate::smallprimes::gaussian_primes_direct;

    fn run_sector(max_norm: u64, alpha: f64, beta: f64) -> Vec<GaussInt> {
        let mut sieve = SectorSieve::new(max_norm, alpha, beta, false).unwrap();
        sieve.run().unwrap();
        sieve.take_big_primes_sorted()
    }

    #[test]
    fn rejects_invalid_angles() {
        assert!(SectorSieve::new(100, 0.5, 0.2, false).is_err());
        assert!(SectorSieve::new(100, -0.1, 0.2, false).is_err());
        assert!(SectorSieve::new(100, 0.0, 1.0, false).is_err());
        assert!(SectorSieve::new(100, 0.3, 0.3, false).is_err());
    }

    #[test]
    fn full_sector_equals_octant() {
        let sector = run_sector(4096, 0.0, FRAC_PI_4);
        let mut octant = OctantSieve::new(4096, false).unwrap();
        octant.run().unwrap();
        assert_eq!(sector, octant.take_big_primes_sorted());
    }

    #[test]
    fn narrow_sector_matches_angle_filter() {
        let (alpha, beta) = (0.2, 0.5);
        let expected: Vec<GaussInt> = gaussian_primes_direct(100)
            .into_iter()
            .filter(|g| {
                let t = g.arg();
                (alpha..=beta).contains(&t)
            })
            .collect();
        assert_eq!(run_sector(100, alpha, beta), expected);
        assert_eq!(
            expected,
            vec![
                GaussInt::new(2, 1),
                GaussInt::new(4, 1),
                GaussInt::new(5, 2),
                GaussInt::new(7, 2),
                GaussInt::new(8, 3),
                GaussInt::new(9, 4),
            ]
        );
    }

    #[test]
    fn sector_partition_is_disjoint_union() {
        let cuts = [0.0, 0.25, 0.55, FRAC_PI_4];
        let mut united = Vec::new();
        for pair in cuts.windows(2) {
            united.extend(run_sector(10_000, pair[0], pair[1]));
        }
        united.sort();
        let before = united.len();
        united.dedup();
        assert_eq!(before, united.len(), "sectors overlapped");
        let mut octant = OctantSieve::new(10_000, false).unwrap();
        octant.run().unwrap();
        assert_eq!(united, octant.take_big_primes_sorted());
    }

    #[test]
    fn column_bounds_respect_the_boundary() {
        let sieve = SectorSieve::new(1_000_000, 0.1, 0.7, false).unwrap();
        for a in 1..=1000 {
            if let Some((lo, hi)) = sieve.column_bounds(a) {
                assert!(SectorSieve::angle(lo, a) >= 0.1);
                assert!(SectorSieve::angle(hi, a) <= 0.7);
                if lo > 0 {
                    assert!(SectorSieve::angle(lo - 1, a) < 0.1);
                }
            }
        }
    }
}
