use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gintsieve::block::BlockSieve;
use gintsieve::donut::{BlockDonutSieve, OctantDonutSieve};
use gintsieve::octant::OctantSieve;
use gintsieve::sector::SectorSieve;
use gintsieve::sieve::Sieve;
use gintsieve::smallprimes::rational_primes;

fn bench_octant_sieve_2_pow_20(c: &mut Criterion) {
    c.bench_function("OctantSieve(2^20)", |b| {
        b.iter(|| {
            let mut sieve = OctantSieve::new(black_box(1 << 20), false).unwrap();
            sieve.run().unwrap();
            sieve.take_big_primes_sorted()
        });
    });
}

fn bench_octant_donut_sieve_2_pow_20(c: &mut Criterion) {
    c.bench_function("OctantDonutSieve(2^20)", |b| {
        b.iter(|| {
            let mut sieve = OctantDonutSieve::new(black_box(1 << 20), false).unwrap();
            sieve.run().unwrap();
            sieve.take_big_primes_sorted()
        });
    });
}

fn bench_block_sieve_reference_block(c: &mut Criterion) {
    c.bench_function("BlockSieve(30000, 10000, 150x150)", |b| {
        b.iter(|| {
            let mut sieve =
                BlockSieve::new(black_box(30_000), 10_000, 150, 150, false).unwrap();
            sieve.run().unwrap();
            sieve.take_big_primes_sorted()
        });
    });
}

fn bench_block_donut_sieve_reference_block(c: &mut Criterion) {
    c.bench_function("BlockDonutSieve(30000, 10000, 150x150)", |b| {
        b.iter(|| {
            let mut sieve =
                BlockDonutSieve::new(black_box(30_000), 10_000, 150, 150, false).unwrap();
            sieve.run().unwrap();
            sieve.take_big_primes_sorted()
        });
    });
}

fn bench_sector_sieve(c: &mut Criterion) {
    c.bench_function("SectorSieve(2^20, 0.1, 0.6)", |b| {
        b.iter(|| {
            let mut sieve =
                SectorSieve::new(black_box(1 << 20), 0.1, 0.6, false).unwrap();
            sieve.run().unwrap();
            sieve.take_big_primes_sorted()
        });
    });
}

fn bench_rational_wheel(c: &mut Criterion) {
    c.bench_function("rational_primes(1_000_000)", |b| {
        b.iter(|| rational_primes(black_box(1_000_000)));
    });
}

criterion_group!(
    benches,
    bench_octant_sieve_2_pow_20,
    bench_octant_donut_sieve_2_pow_20,
    bench_block_sieve_reference_block,
    bench_block_donut_sieve_reference_block,
    bench_sector_sieve,
    bench_rational_wheel,
);
criterion_main!(benches);
