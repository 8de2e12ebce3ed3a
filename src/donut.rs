//! # Donut — Mod-10 Wheel Machinery and the Donut Sieves
//!
//! ℤ[i] mod 10 has 100 residue classes, of which exactly 32 are coprime to
//! 10 — not divisible by `1 + i` or by the primes above 5. Each 10×10 tile
//! of the plane is packed into one `u32`, one bit per coprime residue, so a
//! donut array spends about 0.32 bits per Gaussian integer and never even
//! represents the multiples of 2 and 5.
//!
//! The wheel is driven by five constant tables, generated once offline and
//! hard-coded here:
//!
//! - `BIT_DONUT[a%10][b%10]` — bit index of a residue, or [`NOT_COPRIME`];
//! - `REAL_PART_DECOMPRESS` / `IMAG_PART_DECOMPRESS` — its inverse;
//! - `GAP_DONUT[c%10][d%10]` — distance from a valid `d` to the next valid
//!   `d` for a fixed `c` residue (always 2, 4 or 6);
//! - `D_START[c%10]` — the smallest valid `d` residue for a given `c`.
//!
//! Because the norm is multiplicative, a multiple of a sieving prime lands
//! in the wheel exactly when its co-factor does, so cross-off walks
//! co-factor imaginary parts with `D_START`/`GAP_DONUT` and touches nothing
//! else. The primes of norm 2 and 5 divide 10: their multiples are absent
//! by construction, they are skipped in the cross-off loop, and they are
//! re-added at harvest time.

use crate::gint::GaussInt;
use crate::sieve::{Sieve, SieveCore};
use crate::smallprimes::{div_ceil_i64, div_floor_i64, isqrt};
use anyhow::{ensure, Result};
use std::ops::RangeInclusive;

/// Sentinel for residues sharing a factor with 10.
pub const NOT_COPRIME: u8 = 99;

/// Bit index within a tile for each residue `(a mod 10, b mod 10)`.
pub const BIT_DONUT: [[u8; 10]; 10] = [
    [99, 0, 99, 1, 99, 99, 99, 2, 99, 3],
    [4, 99, 99, 99, 5, 99, 6, 99, 99, 99],
    [99, 99, 99, 7, 99, 8, 99, 9, 99, 99],
    [10, 99, 11, 99, 99, 99, 99, 99, 12, 99],
    [99, 13, 99, 99, 99, 14, 99, 99, 99, 15],
    [99, 99, 16, 99, 17, 99, 18, 99, 19, 99],
    [99, 20, 99, 99, 99, 21, 99, 99, 99, 22],
    [23, 99, 24, 99, 99, 99, 99, 99, 25, 99],
    [99, 99, 99, 26, 99, 27, 99, 28, 99, 99],
    [29, 99, 99, 99, 30, 99, 31, 99, 99, 99],
];

/// Gap to the next coprime `d` residue for a fixed `c` residue.
pub const GAP_DONUT: [[u8; 10]; 10] = [
    [0, 2, 0, 4, 0, 0, 0, 2, 0, 2],
    [4, 0, 0, 0, 2, 0, 4, 0, 0, 0],
    [0, 0, 0, 2, 0, 2, 0, 6, 0, 0],
    [2, 0, 6, 0, 0, 0, 0, 0, 2, 0],
    [0, 4, 0, 0, 0, 4, 0, 0, 0, 2],
    [0, 0, 2, 0, 2, 0, 2, 0, 4, 0],
    [0, 4, 0, 0, 0, 4, 0, 0, 0, 2],
    [2, 0, 6, 0, 0, 0, 0, 0, 2, 0],
    [0, 0, 0, 2, 0, 2, 0, 6, 0, 0],
    [4, 0, 0, 0, 2, 0, 4, 0, 0, 0],
];

/// Smallest coprime `d` residue for each `c` residue.
pub const D_START: [u8; 10] = [1, 0, 3, 0, 1, 2, 1, 0, 3, 0];

/// Bit index → `a mod 10`.
pub const REAL_PART_DECOMPRESS: [u8; 32] = [
    0, 0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 7, 7, 7, 8, 8, 8, 9, 9, 9,
];

/// Bit index → `b mod 10`.
pub const IMAG_PART_DECOMPRESS: [u8; 32] = [
    1, 3, 7, 9, 0, 4, 6, 3, 5, 7, 0, 2, 8, 1, 5, 9, 2, 4, 6, 8, 1, 5, 9, 0, 2, 8, 3, 5, 7, 0, 4, 6,
];

/// First coprime value ≥ `lower` in the `d` walk for the residue of `c`.
#[inline]
fn first_coprime_at_least(c: i64, lower: i64) -> i64 {
    let c_res = c.rem_euclid(10) as usize;
    let mut d = 10 * div_floor_i64(lower, 10) + D_START[c_res] as i64;
    while d < lower {
        d += GAP_DONUT[c_res][d.rem_euclid(10) as usize] as i64;
    }
    d
}

#[inline]
fn next_coprime(c: i64, d: i64) -> i64 {
    d + GAP_DONUT[c.rem_euclid(10) as usize][d.rem_euclid(10) as usize] as i64
}

/// The sieving primes the wheel already accounts for: those dividing 10.
fn wheel_primes() -> [GaussInt; 2] {
    [GaussInt::new(1, 1), GaussInt::new(2, 1)]
}

// ---------------------------------------------------------------------------
// Octant donut sieve
// ---------------------------------------------------------------------------

/// Donut-accelerated sieve over the first octant.
pub struct OctantDonutSieve {
    core: SieveCore,
    root: i64,
    tiles: Vec<Vec<u32>>,
}

impl OctantDonutSieve {
    pub fn new(max_norm: u64, verbose: bool) -> Result<Self> {
        let core = SieveCore::new(max_norm, verbose)?;
        let root = isqrt(max_norm) as i64;
        Ok(OctantDonutSieve {
            core,
            root,
            tiles: Vec::new(),
        })
    }

    #[inline]
    fn clear_bit(&mut self, a: i64, b: i64) {
        if a < 0 || b < 0 {
            return;
        }
        let (s, t) = ((a / 10) as usize, (b / 10) as usize);
        if s < self.tiles.len() && t < self.tiles[s].len() {
            let bit = BIT_DONUT[(a % 10) as usize][(b % 10) as usize];
            debug_assert_ne!(bit, NOT_COPRIME, "cross-off hit a wheel residue");
            if bit != NOT_COPRIME {
                self.tiles[s][t] &= !(1u32 << bit);
            }
        }
    }

    #[inline]
    fn bit_set(&self, a: i64, b: i64) -> bool {
        if a < 0 || b < 0 {
            return false;
        }
        let (s, t) = ((a / 10) as usize, (b / 10) as usize);
        if s >= self.tiles.len() || t >= self.tiles[s].len() {
            return false;
        }
        let bit = BIT_DONUT[(a % 10) as usize][(b % 10) as usize];
        bit != NOT_COPRIME && self.tiles[s][t] & (1u32 << bit) != 0
    }
}

impl Sieve for OctantDonutSieve {
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
        let mut tiles = Vec::with_capacity((self.root / 10 + 1) as usize);
        for s in 0..=self.root / 10 {
            // Largest b in column tile s: below the diagonal and the norm bound.
            let b_max = (10 * s + 9).min(isqrt(max_norm - (10 * s * 10 * s) as u64) as i64);
            tiles.push(vec![u32::MAX; (b_max / 10 + 1) as usize]);
        }
        self.tiles = tiles;
    }

    fn cross_off_multiples(&mut self, g: GaussInt) {
        let q = g.norm();
        if q == 2 || q == 5 {
            return; // the wheel never represents their multiples
        }
        let (c, d) = (g.a, g.b);
        let m = self.core.max_norm / q;
        let u_max = isqrt(m) as i64;
        for u in 1..=u_max {
            let v_cap = isqrt(m - (u * u) as u64) as i64;
            let v_lo = div_ceil_i64(-u * (c + d), c - d).max(-v_cap);
            let v_hi = div_floor_i64(u * (c - d), c + d).min(v_cap);
            // Only co-factors coprime to 10 can produce a wheel cell.
            let mut v = first_coprime_at_least(u, v_lo);
            while v <= v_hi {
                if !(u == 1 && v == 0) {
                    let re = c * u - d * v;
                    let im = c * v + d * u;
                    self.clear_bit(re, im.abs());
                }
                v = next_coprime(u, v);
            }
        }
    }

    fn collect_big_primes(&mut self) {
        self.core.big_primes.clear();
        // The wheel cannot hold the primes over 2 and 5; re-emit them here.
        for g in wheel_primes() {
            if g.norm() <= self.core.max_norm {
                self.core.big_primes.push(g);
            }
        }
        for (s, column) in self.tiles.iter().enumerate() {
            for (t, &word) in column.iter().enumerate() {
                if word == 0 {
                    continue;
                }
                for bit in 0..32 {
                    if word & (1u32 << bit) == 0 {
                        continue;
                    }
                    let a = 10 * s as i64 + REAL_PART_DECOMPRESS[bit] as i64;
                    let b = 10 * t as i64 + IMAG_PART_DECOMPRESS[bit] as i64;
                    let g = GaussInt::new(a, b);
                    if b <= a && g.norm() <= self.core.max_norm && g.norm() > 1 {
                        self.core.big_primes.push(g);
                    }
                }
            }
        }
    }

    fn survivor(&self, a: i64, b: i64) -> bool {
        if a < 0 || b < 0 || b > a {
            return false;
        }
        let g = GaussInt::new(a, b);
        if g.norm() > self.core.max_norm {
            return false;
        }
        self.bit_set(a, b)
    }

    fn extent(&self) -> (RangeInclusive<i64>, RangeInclusive<i64>) {
        (0..=self.root, 0..=self.root)
    }
}

// ---------------------------------------------------------------------------
// Block donut sieve
// ---------------------------------------------------------------------------

/// Donut-accelerated sieve over `[x, x+dx) × [y, y+dy)`.
///
/// Tiles live on the absolute 10-grid, so the requested block is expanded to
/// its 10-aligned bounding rectangle for sieving and filtered back down at
/// harvest. Arbitrary corners therefore work; aligned corners just waste no
/// boundary cells.
pub struct BlockDonutSieve {
    core: SieveCore,
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    ax: i64,
    ay: i64,
    tiles_wide: i64,
    tiles_high: i64,
    tiles: Vec<Vec<u32>>,
}

impl BlockDonutSieve {
    pub fn new(x: i64, y: i64, dx: i64, dy: i64, verbose: bool) -> Result<Self> {
        ensure!(
            x >= 0 && y >= 0 && dx >= 1 && dy >= 1,
            "invalid block: need x, y >= 0 and dx, dy >= 1, got ({}, {}) {}x{}",
            x,
            y,
            dx,
            dy
        );
        let ax = 10 * (x / 10);
        let ay = 10 * (y / 10);
        let tiles_wide = div_ceil_i64(x + dx - ax, 10);
        let tiles_high = div_ceil_i64(y + dy - ay, 10);
        let far_x = ax + 10 * tiles_wide - 1;
        let far_y = ay + 10 * tiles_high - 1;
        let far = far_x as i128 * far_x as i128 + far_y as i128 * far_y as i128;
        ensure!(
            far <= crate::sieve::MAX_NORM_BOUND as i128,
            "block corner norm {} exceeds the machine-integer range",
            far
        );
        let core = SieveCore::new(far as u64, verbose)?;
        Ok(BlockDonutSieve {
            core,
            x,
            y,
            dx,
            dy,
            ax,
            ay,
            tiles_wide,
            tiles_high,
            tiles: Vec::new(),
        })
    }

    pub fn with_small_primes(
        x: i64,
        y: i64,
        dx: i64,
        dy: i64,
        primes: &[GaussInt],
    ) -> Result<Self> {
        let mut sieve = BlockDonutSieve::new(x, y, dx, dy, false)?;
        sieve.core.inject_small_primes(primes)?;
        Ok(sieve)
    }

    #[inline]
    fn clear_bit(&mut self, a: i64, b: i64) {
        let (s, t) = ((a - self.ax) / 10, (b - self.ay) / 10);
        if a >= self.ax && b >= self.ay && s < self.tiles_wide && t < self.tiles_high {
            let bit = BIT_DONUT[(a % 10) as usize][(b % 10) as usize];
            debug_assert_ne!(bit, NOT_COPRIME, "cross-off hit a wheel residue");
            if bit != NOT_COPRIME {
                self.tiles[s as usize][t as usize] &= !(1u32 << bit);
            }
        }
    }

    fn cross_off_one(&mut self, g: GaussInt) {
        let (a, b) = (g.a, g.b);
        let q = g.norm() as i64;
        let x_min = self.ax;
        let y_min = self.ay;
        let x_max = self.ax + 10 * self.tiles_wide - 1;
        let y_max = self.ay + 10 * self.tiles_high - 1;

        let (c_num_lo, c_num_hi) = if b >= 0 {
            (a * x_min + b * y_min, a * x_max + b * y_max)
        } else {
            (a * x_min + b * y_max, a * x_max + b * y_min)
        };
        let c_lo = div_ceil_i64(c_num_lo, q);
        let c_hi = div_floor_i64(c_num_hi, q);

        for c in c_lo..=c_hi {
            let mut d_lo = div_ceil_i64(y_min - b * c, a);
            let mut d_hi = div_floor_i64(y_max - b * c, a);
            if b > 0 {
                d_lo = d_lo.max(div_ceil_i64(a * c - x_max, b));
                d_hi = d_hi.min(div_floor_i64(a * c - x_min, b));
            } else if b < 0 {
                d_lo = d_lo.max(div_ceil_i64(a * c - x_min, b));
                d_hi = d_hi.min(div_floor_i64(a * c - x_max, b));
            }
            if d_lo > d_hi {
                continue;
            }
            let mut d = first_coprime_at_least(c, d_lo);
            while d <= d_hi {
                if c * c + d * d != 1 {
                    self.clear_bit(a * c - b * d, b * c + a * d);
                }
                d = next_coprime(c, d);
            }
        }
    }

    fn in_block(&self, a: i64, b: i64) -> bool {
        a >= self.x && a < self.x + self.dx && b >= self.y && b < self.y + self.dy
    }
}

impl Sieve for BlockDonutSieve {
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
        self.tiles = vec![vec![u32::MAX; self.tiles_high as usize]; self.tiles_wide as usize];
    }

    fn cross_off_multiples(&mut self, g: GaussInt) {
        if g.norm() == 2 || g.norm() == 5 {
            return;
        }
        self.cross_off_one(g);
        if g.b > 0 && g.a != g.b {
            self.cross_off_one(g.conj());
        }
    }

    fn collect_big_primes(&mut self) {
        self.core.big_primes.clear();
        // Wheel residues exclude the primes over 2 and 5; their in-block
        // representatives (with nonnegative parts) are restored by hand.
        for g in [GaussInt::new(1, 1), GaussInt::new(2, 1), GaussInt::new(1, 2)] {
            if self.in_block(g.a, g.b) {
                self.core.big_primes.push(g);
            }
        }
        for (s, column) in self.tiles.iter().enumerate() {
            for (t, &word) in column.iter().enumerate() {
                if word == 0 {
                    continue;
                }
                for bit in 0..32 {
                    if word & (1u32 << bit) == 0 {
                        continue;
                    }
                    let a = self.ax + 10 * s as i64 + REAL_PART_DECOMPRESS[bit] as i64;
                    let b = self.ay + 10 * t as i64 + IMAG_PART_DECOMPRESS[bit] as i64;
                    let g = GaussInt::new(a, b);
                    if self.in_block(a, b) && g.norm() > 1 {
                        self.core.big_primes.push(g);
                    }
                }
            }
        }
    }

    fn survivor(&self, a: i64, b: i64) -> bool {
        if !self.in_block(a, b) {
            return false;
        }
        let (s, t) = (((a - self.ax) / 10) as usize, ((b - self.ay) / 10) as usize);
        if s >= self.tiles.len() || t >= self.tiles[s].len() {
            return false;
        }
        let bit = BIT_DONUT[(a % 10) as usize][(b % 10) as usize];
        bit != NOT_COPRIME && self.tiles[s][t] & (1u32 << bit) != 0
    }

    fn extent(&self) -> (RangeInclusive<i64>, RangeInclusive<i64>) {
        (self.x..=self.x + self.dx - 1, self.y..=self.y + self.dy - 1)
    }
}
