//! Property-based tests for the sieve family's arithmetic and geometry.
//!
//! These use `proptest` to check invariants over randomly drawn inputs
//! instead of hand-picked examples. Properties are organized by module:
//! the integer primitives in `smallprimes`, the associate structure of
//! `GaussInt`, and the agreement of independent sieve flavors on random
//! regions. The block property draws unaligned corners on purpose — the
//! donut tiles must cope with any rectangle, not just multiples of 10.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//! PROPTEST_CASES=1000 cargo test --test property_tests
//! ```

use gintsieve::block::BlockSieve;
use gintsieve::donut::BlockDonutSieve;
use gintsieve::gint::GaussInt;
use gintsieve::octant::OctantSieve;
use gintsieve::sieve::Sieve;
use gintsieve::smallprimes::{
    div_ceil_i64, div_floor_i64, gaussian_primes_direct, isqrt, rational_primes,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Octant primes to norm 20000, shared across cases.
fn octant_primes() -> &'static Vec<GaussInt> {
    static LIST: OnceLock<Vec<GaussInt>> = OnceLock::new();
    LIST.get_or_init(|| gaussian_primes_direct(20_000))
}

fn octant_prime_set() -> &'static HashSet<(i64, i64)> {
    static SET: OnceLock<HashSet<(i64, i64)>> = OnceLock::new();
    SET.get_or_init(|| octant_primes().iter().map(|g| (g.a, g.b)).collect())
}

fn is_rational_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

proptest! {
    /// isqrt returns the unique r with r² ≤ n < (r+1)².
    #[test]
    fn prop_isqrt_brackets(n in 0u64..u64::MAX) {
        let r = isqrt(n);
        prop_assert!(r.checked_mul(r).is_some_and(|sq| sq <= n));
        prop_assert!((r + 1).checked_mul(r + 1).map_or(true, |sq| sq > n));
    }

    /// Signed rounding division agrees with the floating-point reference
    /// and the two roundings bracket the exact quotient.
    #[test]
    fn prop_div_rounding_matches_reference(n in -100_000i64..100_000, m in -1_000i64..1_000) {
        prop_assume!(m != 0);
        let exact = n as f64 / m as f64;
        prop_assert_eq!(div_floor_i64(n, m), exact.floor() as i64);
        prop_assert_eq!(div_ceil_i64(n, m), exact.ceil() as i64);
        let gap = div_ceil_i64(n, m) - div_floor_i64(n, m);
        prop_assert_eq!(gap, if n % m == 0 { 0 } else { 1 });
    }

    /// Every rational sieve output survives trial division.
    #[test]
    fn prop_rational_primes_have_no_small_factors(limit in 2u64..20_000) {
        for p in rational_primes(limit) {
            prop_assert!(is_rational_prime(p), "{} is composite", p);
        }
    }

    /// Associate closure: every associate of an octant prime folds back to
    /// it, the orbit has size 8 off the axis and diagonal and 4 on them,
    /// and exactly one member is the canonical representative.
    #[test]
    fn prop_associate_closure(index in 0usize..10_000) {
        let primes = octant_primes();
        let g = primes[index % primes.len()];
        let orbit = g.associates();
        let expected = if g.b == 0 || g.a == g.b { 4 } else { 8 };
        prop_assert_eq!(orbit.len(), expected);
        prop_assert!(orbit.iter().all(|h| h.octant_fold() == g));
        prop_assert_eq!(orbit.iter().filter(|&&h| h == g).count(), 1);
    }

    /// A Gaussian integer anywhere in the plane is prime exactly when its
    /// octant fold is in the sieve output: the eight-fold symmetry loses
    /// nothing and invents nothing.
    #[test]
    fn prop_fold_decides_primality(a in -99i64..100, b in -99i64..100) {
        prop_assume!(a != 0 || b != 0);
        let g = GaussInt::new(a, b);
        let directly_prime = if a != 0 && b != 0 {
            is_rational_prime(g.norm())
        } else {
            let p = (a.abs() + b.abs()) as u64;
            p % 4 == 3 && is_rational_prime(p)
        };
        let rep = g.octant_fold();
        prop_assert_eq!(octant_prime_set().contains(&(rep.a, rep.b)), directly_prime);
    }

    /// Octant sieve output equals the rational-prime classification on
    /// random bounds.
    #[test]
    fn prop_octant_matches_direct_table(bound in 2u64..4_000) {
        let mut sieve = OctantSieve::new(bound, false).unwrap();
        sieve.run().unwrap();
        prop_assert_eq!(sieve.take_big_primes_sorted(), gaussian_primes_direct(bound));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Plain and donut block sieves agree on random rectangles, aligned or
    /// not, near the origin or far from it.
    #[test]
    fn prop_block_flavors_agree(
        x in 1i64..20_000,
        y in 0i64..20_000,
        dx in 20i64..60,
        dy in 20i64..60,
    ) {
        let mut plain = BlockSieve::new(x, y, dx, dy, false).unwrap();
        plain.run().unwrap();
        let mut donut = BlockDonutSieve::new(x, y, dx, dy, false).unwrap();
        donut.run().unwrap();
        prop_assert_eq!(
            plain.take_big_primes_sorted(),
            donut.take_big_primes_sorted(),
            "flavors disagree on block ({}, {}) {}x{}",
            x, y, dx, dy
        );
    }
}
