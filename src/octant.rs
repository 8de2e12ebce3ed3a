//! # OctantSieve — Sieve Over the First Octant
//!
//! Array indexed by Gaussian integers `(a, b)` with `0 ≤ b ≤ a` and
//! `a² + b² ≤ N`: a fundamental domain for the action of the units and
//! conjugation, so one surviving cell stands for the whole associate orbit.
//!
//! Initialization already disposes of the ramified prime's multiples: a cell
//! with `a + b` even is a unit, `1 + i` itself, or divisible by `1 + i`, so
//! everything even-sum except `(1, 1)` starts cleared and the cross-off loop
//! skips `1 + i`.
//!
//! Cross-off of `g = c + di` enumerates co-factors `u + vi` with `u ≥ 1` in
//! the two-sided band `−u(c+d)/(c−d) ≤ v ≤ u(c−d)/(c+d)`, i.e. products in
//! the double octant `|arg| ≤ π/4`, and clears the cell `(Re, |Im|)` of the
//! product. Negative `v` is what reaches the multiples of the conjugate
//! prime: `5 = (2+i)(2−i)` and `4+3i = i(2−i)²` are crossed off from
//! `g = 2+i` this way. The co-factor `(1, 0)` is skipped so `g` itself
//! survives.

use crate::gint::GaussInt;
use crate::sieve::{Sieve, SieveCore};
use crate::smallprimes::{div_ceil_i64, div_floor_i64, isqrt};
use anyhow::Result;
use std::ops::RangeInclusive;

pub struct OctantSieve {
    core: SieveCore,
    root: i64,
    columns: Vec<Vec<bool>>,
}

impl OctantSieve {
    pub fn new(max_norm: u64, verbose: bool) -> Result<Self> {
        let core = SieveCore::new(max_norm, verbose)?;
        let root = isqrt(max_norm) as i64;
        Ok(OctantSieve {
            core,
            root,
            columns: Vec::new(),
        })
    }

    /// Region-guarded clear; indices outside the triangle are ignored.
    #[inline]
    fn clear(&mut self, a: i64, b: i64) {
        if a >= 0 && a <= self.root && b >= 0 {
            let col = &mut self.columns[a as usize];
            if (b as usize) < col.len() {
                col[b as usize] = false;
            }
        }
    }
}

impl Sieve for OctantSieve {
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
        let max_norm = self.core.max_norm;
        let mut columns = Vec::with_capacity((self.root + 1) as usize);
        for a in 0..=self.root {
            // Column a holds cells b ≤ a with a² + b² ≤ N.
            let cap = isqrt(max_norm - (a * a) as u64) as i64;
            let height = a.min(cap) + 1;
            let mut col = vec![true; height as usize];
            for b in 0..height {
                // Even-sum cells are units or multiples of 1 + i.
                if (a + b) % 2 == 0 && !(a == 1 && b == 1) {
                    col[b as usize] = false;
                }
            }
            columns.push(col);
        }
        self.columns = columns;
    }

    fn cross_off_multiples(&mut self, g: GaussInt) {
        let (c, d) = (g.a, g.b);
        if c == 1 && d == 1 {
            return; // handled by initialization
        }
        let m = self.core.max_norm / g.norm();
        let u_max = isqrt(m) as i64;
        for u in 1..=u_max {
            let v_cap = isqrt(m - (u * u) as u64) as i64;
            let v_lo = div_ceil_i64(-u * (c + d), c - d).max(-v_cap);
            let v_hi = div_floor_i64(u * (c - d), c + d).min(v_cap);
            for v in v_lo..=v_hi {
                if u == 1 && v == 0 {
                    continue; // g itself
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
            for (b, &alive) in col.iter().enumerate() {
                let g = GaussInt::new(a as i64, b as i64);
                if alive && g.norm() > 1 {
                    self.core.big_primes.push(g);
                }
            }
        }
    }

    fn survivor(&self, a: i64, b: i64) -> bool {
        if a < 0 || b < 0 || (a as usize) >= self.columns.len() {
            return false;
        }
        let col = &self.columns[a as usize];
        (b as usize) < col.len() && col[b as usize]
    }

    fn extent(&self) -> (RangeInclusive<i64>, RangeInclusive<i64>) {
        (0..=self.root, 0..=self.root)
    }
}
