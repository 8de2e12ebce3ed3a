//! # GaussInt — Gaussian Integer Value Type
//!
//! The element `a + bi` of ℤ[i] with machine-integer parts. Everything the
//! sieves and the moat explorer need lives here: the multiplicative norm,
//! the folded argument, conjugation and the `flip` that swaps real and
//! imaginary parts, Gaussian multiplication, and the associate orbit under
//! the unit group {1, −1, i, −i} and complex conjugation.
//!
//! The total order is lexicographic by `(norm, a, b)`, which gives every
//! sieve flavor a reproducible output order.

use std::cmp::Ordering;

/// A Gaussian integer `a + bi`.
///
/// Coordinates are `i64`; norms are accumulated in `u64`. The sieves keep
/// norms at or below 2⁶², so `a² + b²` never overflows the signed product.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GaussInt {
    pub a: i64,
    pub b: i64,
}

impl GaussInt {
    pub const fn new(a: i64, b: i64) -> Self {
        GaussInt { a, b }
    }

    /// The multiplicative norm `a² + b²`.
    #[inline]
    pub fn norm(&self) -> u64 {
        (self.a * self.a + self.b * self.b) as u64
    }

    /// Argument in radians via `atan2`. Octant representatives land in
    /// `[0, π/4]`.
    #[inline]
    pub fn arg(&self) -> f64 {
        (self.b as f64).atan2(self.a as f64)
    }

    /// Swap real and imaginary parts: the reflection across the diagonal.
    #[inline]
    pub fn flip(&self) -> Self {
        GaussInt::new(self.b, self.a)
    }

    /// Complex conjugate `a − bi`.
    #[inline]
    pub fn conj(&self) -> Self {
        GaussInt::new(self.a, -self.b)
    }

    /// Gaussian product `(a + bi)(c + di) = (ac − bd) + (ad + bc)i`.
    #[inline]
    pub fn mul(&self, other: GaussInt) -> Self {
        GaussInt::new(
            self.a * other.a - self.b * other.b,
            self.a * other.b + self.b * other.a,
        )
    }

    #[inline]
    pub fn add(&self, other: GaussInt) -> Self {
        GaussInt::new(self.a + other.a, self.b + other.b)
    }

    /// Canonical first-octant representative `0 ≤ b ≤ a` of the orbit under
    /// units and conjugation.
    #[inline]
    pub fn octant_fold(&self) -> Self {
        let x = self.a.abs();
        let y = self.b.abs();
        GaussInt::new(x.max(y), x.min(y))
    }

    /// The full associate orbit under units and conjugation, deduplicated.
    ///
    /// Size 8 for `0 < b < a`, size 4 on the real axis and on the diagonal.
    pub fn associates(&self) -> Vec<GaussInt> {
        let (a, b) = (self.a, self.b);
        let mut orbit = vec![
            GaussInt::new(a, b),
            GaussInt::new(-b, a),
            GaussInt::new(-a, -b),
            GaussInt::new(b, -a),
            GaussInt::new(a, -b),
            GaussInt::new(-b, -a),
            GaussInt::new(-a, b),
            GaussInt::new(b, a),
        ];
        orbit.sort();
        orbit.dedup();
        orbit
    }

    pub fn as_pair(&self) -> (i64, i64) {
        (self.a, self.b)
    }
}

impl Ord for GaussInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.norm()
            .cmp(&other.norm())
            .then(self.a.cmp(&other.a))
            .then(self.b.cmp(&other.b))
    }
}

impl PartialOrd for GaussInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
