//! # Smallprimes — Integer Roots, Division Rounding, and the Sieve Bootstrap
//!
//! The arithmetic substrate under every sieve flavor:
//!
//! 1. **Integer square root** (`isqrt`) — exact Newton iteration on `u64`.
//! 2. **Signed division rounding** (`div_ceil_i64`, `div_floor_i64`) — one
//!    checked integer primitive instead of the mixed ceiling-trick /
//!    floating-point `ceil` arithmetic, so block cross-off bounds are exact
//!    for either sign of the numerator.
//! 3. **Rational primes** via a wheel-30 sieve of Eratosthenes (stores only
//!    residues coprime to {2, 3, 5}, one byte per 30 integers).
//! 4. **Direct Gaussian primes** — the classification of rational primes in
//!    ℤ[i]: `p = 2` ramifies as `(1+i)²·(−i)`; `p ≡ 1 (mod 4)` splits as
//!    `(a+bi)(a−bi)` with `a² + b² = p`; `p ≡ 3 (mod 4)` stays inert with
//!    norm `p²`. This replaces the original's on-disk rational-prime table
//!    as the recursion short-circuit.
//! 5. **Bootstrap** — the explicit flavor dispatch that hands a sieve its
//!    small primes: direct table for small bounds, plain octant sieve in the
//!    mid range, donut sieve above. Each recursion level shrinks the bound
//!    through `isqrt`, so the chain is finite by construction.

use crate::donut::OctantDonutSieve;
use crate::gint::GaussInt;
use crate::octant::OctantSieve;
use crate::sieve::Sieve;
use anyhow::Result;

/// Bounds at or below this use the direct rational-prime classification.
pub const DIRECT_BOUND: u64 = 10_000;

/// Bounds at or below this use the plain octant sieve; larger bounds go to
/// the donut sieve, whose own bootstrap re-enters here at `isqrt(bound)`.
pub const PLAIN_OCTANT_BOUND: u64 = 1_000_000;

/// Exact integer square root: the largest `r` with `r² ≤ n`.
pub fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut r = (n as f64).sqrt() as u64;
    // One float round-off in either direction is possible; settle exactly.
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
        r += 1;
    }
    r
}

/// Ceiling of `n / m` for signed `n` and nonzero `m`.
#[inline]
pub fn div_ceil_i64(n: i64, m: i64) -> i64 {
    let q = n / m;
    if n % m != 0 && (n < 0) == (m < 0) {
        q + 1
    } else {
        q
    }
}

/// Floor of `n / m` for signed `n` and nonzero `m`.
#[inline]
pub fn div_floor_i64(n: i64, m: i64) -> i64 {
    let q = n / m;
    if n % m != 0 && (n < 0) != (m < 0) {
        q - 1
    } else {
        q
    }
}

/// Residues coprime to 30; the positions tracked by the wheel.
const WHEEL_RESIDUES: [u8; 8] = [1, 7, 11, 13, 17, 19, 23, 29];

/// Residue → bit index within a wheel byte; 255 marks a residue divisible
/// by 2, 3 or 5.
const WHEEL_INDEX: [u8; 30] = [
    255, 0, 255, 255, 255, 255, 255, 1, 255, 255, 255, 2, 255, 3, 255, 255, 255, 4, 255, 5, 255,
    255, 255, 6, 255, 255, 255, 255, 255, 7,
];

/// All rational primes `p ≤ limit`, via a wheel-30 sieve.
///
/// One byte covers 30 consecutive integers (one bit per coprime residue),
/// so the table for the largest bootstrap bound stays well inside cache.
pub fn rational_primes(limit: u64) -> Vec<u64> {
    if limit < 7 {
        return [2, 3, 5].iter().copied().filter(|&p| p <= limit).collect();
    }

    let limit = limit as usize;
    let num_bytes = limit / 30 + 1;
    let mut wheel = vec![0xFFu8; num_bytes];
    wheel[0] &= !1; // 1 is not prime

    let root = isqrt(limit as u64) as usize;
    let mut n = 7;
    while n <= root {
        let idx = WHEEL_INDEX[n % 30];
        if idx != 255 && wheel[n / 30] & (1 << idx) != 0 {
            let mut m = n * n;
            while m <= limit {
                let mi = WHEEL_INDEX[m % 30];
                if mi != 255 {
                    wheel[m / 30] &= !(1 << mi);
                }
                m += n;
            }
        }
        n += 2;
    }

    let mut primes = vec![2, 3, 5];
    for (byte_ix, &byte) in wheel.iter().enumerate() {
        if byte == 0 {
            continue;
        }
        for (bit, &r) in WHEEL_RESIDUES.iter().enumerate() {
            if byte & (1 << bit) != 0 {
                let n = byte_ix * 30 + r as usize;
                if n > 5 && n <= limit {
                    primes.push(n as u64);
                }
            }
        }
    }
    primes
}

/// Find the canonical octant representative `(a, b)`, `a ≥ b ≥ 1`, with
/// `a² + b² = p` for a split rational prime `p ≡ 1 (mod 4)`.
fn split_prime_rep(p: u64) -> GaussInt {
    let mut b = 1u64;
    while 2 * b * b <= p {
        let rest = p - b * b;
        let a = isqrt(rest);
        if a * a == rest {
            return GaussInt::new(a as i64, b as i64);
        }
        b += 1;
    }
    // Fermat's two-square theorem guarantees a representation for p ≡ 1 (mod 4).
    unreachable!("no two-square decomposition found for split prime {}", p)
}

/// Gaussian primes (octant representatives) of norm ≤ `bound`, computed
/// directly from the rational primes, sorted by `(norm, a, b)`.
pub fn gaussian_primes_direct(bound: u64) -> Vec<GaussInt> {
    let mut primes = Vec::new();
    for p in rational_primes(bound) {
        match p % 4 {
            2 => primes.push(GaussInt::new(1, 1)),
            1 => primes.push(split_prime_rep(p)),
            _ => {
                // Inert: the Gaussian prime is p itself, with norm p².
                if p * p <= bound {
                    primes.push(GaussInt::new(p as i64, 0));
                }
            }
        }
    }
    primes.sort();
    primes
}

/// Produce the sieving primes for a sieve with small-prime bound `bound`:
/// all Gaussian primes of norm ≤ `bound`, ascending by `(norm, a, b)`.
///
/// The flavor is picked by fixed thresholds rather than by the caller, so
/// the mutual recursion of the original sieve hierarchy becomes an explicit
/// acyclic chain: donut → octant → direct table.
pub fn bootstrap(bound: u64) -> Result<Vec<GaussInt>> {
    if bound <= DIRECT_BOUND {
        return Ok(gaussian_primes_direct(bound));
    }
    if bound <= PLAIN_OCTANT_BOUND {
        let mut sieve = OctantSieve::new(bound, false)?;
        sieve.run()?;
        return Ok(sieve.take_big_primes_sorted());
    }
    let mut sieve = OctantDonutSieve::new(bound, false)?;
    sieve.run()?;
    Ok(sieve.take_big_primes_sorted())
}
