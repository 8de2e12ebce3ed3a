//! # BlockSieve — Sieve Over a Rectangle
//!
//! Array indexed by Gaussian integers in `[x, x+dx) × [y, y+dy)` with
//! `x, y ≥ 0` and positive side lengths. Unlike the octant, a rectangle far
//! from the diagonal has no unit or conjugation symmetry to exploit, so the
//! full prime set of the region is emitted and every split sieving prime is
//! crossed off twice — once as `g = a + bi` and once as its conjugate
//! (`4 + 3i = (2−i)(1+2i)` has no co-factor against `2 + i`).
//!
//! Cross-off solves `x ≤ a·c − b·d ≤ x+dx−1`, `y ≤ b·c + a·d ≤ y+dy−1` for
//! the co-factor `c + di`: `c` is bounded by the rectangle's corner
//! projections, and for each `c` the `d` interval follows from the two
//! inequalities. Cells walk with the recurrences `u -= b, v += a` per `d`
//! step. All bounds use exact signed division rounding; the original's
//! floating-point `ceil` fallback is gone.

use crate::gint::GaussInt;
use crate::sieve::{Sieve, SieveCore};
use crate::smallprimes::{div_ceil_i64, div_floor_i64, isqrt};
use anyhow::{ensure, Result};
use std::ops::RangeInclusive;

pub struct BlockSieve {
    core: SieveCore,
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    grid: Vec<Vec<bool>>,
}

impl BlockSieve {
    pub fn new(x: i64, y: i64, dx: i64, dy: i64, verbose: bool) -> Result<Self> {
        ensure!(
            x >= 0 && y >= 0 && dx >= 1 && dy >= 1,
            "invalid block: need x, y >= 0 and dx, dy >= 1, got ({}, {}) {}x{}",
            x,
            y,
            dx,
            dy
        );
        let far = (x + dx - 1) as i128 * (x + dx - 1) as i128
            + (y + dy - 1) as i128 * (y + dy - 1) as i128;
        ensure!(
            far <= crate::sieve::MAX_NORM_BOUND as i128,
            "block corner norm {} exceeds the machine-integer range",
            far
        );
        let core = SieveCore::new(far as u64, verbose)?;
        Ok(BlockSieve {
            core,
            x,
            y,
            dx,
            dy,
            grid: Vec::new(),
        })
    }

    /// Build a block sieve from a precomputed prime list (the moat drivers
    /// sieve many blocks against one shared list).
    pub fn with_small_primes(
        x: i64,
        y: i64,
        dx: i64,
        dy: i64,
        primes: &[GaussInt],
    ) -> Result<Self> {
        let mut sieve = BlockSieve::new(x, y, dx, dy, false)?;
        sieve.core.inject_small_primes(primes)?;
        Ok(sieve)
    }

    #[inline]
    fn clear(&mut self, u: i64, v: i64) {
        if u >= 0 && u < self.dx && v >= 0 && v < self.dy {
            self.grid[u as usize][v as usize] = false;
        }
    }

    /// Cross off the multiples of one prime (no conjugate handling).
    fn cross_off_one(&mut self, g: GaussInt) {
        let (a, b) = (g.a, g.b);
        let q = g.norm() as i64;
        let x_max = self.x + self.dx - 1;
        let y_max = self.y + self.dy - 1;

        // c is the projection (a·Re + b·Im) / |g|²; take the rectangle
        // corners that extremize it for the sign of b.
        let (c_num_lo, c_num_hi) = if b >= 0 {
            (a * self.x + b * self.y, a * x_max + b * y_max)
        } else {
            (a * self.x + b * y_max, a * x_max + b * self.y)
        };
        let c_lo = div_ceil_i64(c_num_lo, q);
        let c_hi = div_floor_i64(c_num_hi, q);

        for c in c_lo..=c_hi {
            // Imaginary part: y <= b·c + a·d <= y_max  (a > 0 always).
            let mut d_lo = div_ceil_i64(self.y - b * c, a);
            let mut d_hi = div_floor_i64(y_max - b * c, a);
            // Real part: x <= a·c − b·d <= x_max.
            if b > 0 {
                d_lo = d_lo.max(div_ceil_i64(a * c - x_max, b));
                d_hi = d_hi.min(div_floor_i64(a * c - self.x, b));
            } else if b < 0 {
                d_lo = d_lo.max(div_ceil_i64(a * c - self.x, b));
                d_hi = d_hi.min(div_floor_i64(a * c - x_max, b));
            }
            if d_lo > d_hi {
                continue;
            }
            let mut u = a * c - b * d_lo - self.x;
            let mut v = b * c + a * d_lo - self.y;
            for d in d_lo..=d_hi {
                // Unit co-factors would clear the prime or an associate.
                if c * c + d * d != 1 {
                    self.clear(u, v);
                }
                u -= b;
                v += a;
            }
        }
    }
}

impl Sieve for BlockSieve {
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
        self.grid = vec![vec![true; self.dy as usize]; self.dx as usize];
    }

    fn cross_off_multiples(&mut self, g: GaussInt) {
        self.cross_off_one(g);
        // The conjugate is a different prime unless g is inert or ramified.
        if g.b > 0 && g.a != g.b {
            self.cross_off_one(g.conj());
        }
    }

    fn collect_big_primes(&mut self) {
        self.core.big_primes.clear();
        for (u, col) in self.grid.iter().enumerate() {
            for (v, &alive) in col.iter().enumerate() {
                let g = GaussInt::new(self.x + u as i64, self.y + v as i64);
                if alive && g.norm() > 1 {
                    self.core.big_primes.push(g);
                }
            }
        }
    }

    fn survivor(&self, a: i64, b: i64) -> bool {
        let (u, v) = (a - self.x, b - self.y);
        u >= 0
            && v >= 0
            && (u as usize) < self.grid.len()
            && (v as usize) < self.grid[u as usize].len()
            && self.grid[u as usize][v as usize]
    }

    fn extent(&self) -> (RangeInclusive<i64>, RangeInclusive<i64>) {
        (self.x..=self.x + self.dx - 1, self.y..=self.y + self.dy - 1)
    }
}
