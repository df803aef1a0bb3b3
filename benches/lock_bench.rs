// Benchmarks for the corpus lock under a read-heavy profile
//
// Run with: cargo bench --bench lock_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::thread;
use typo_suggest::RwcLock;

const READERS: usize = 8;
const READS_PER_READER: usize = 2_000;
const WRITES: usize = 4;

/// The slice of lock behaviour the workload needs
trait SharedVec: Sync {
    fn sum(&self) -> u64;
    fn bump(&self);
}

impl SharedVec for RwcLock<Vec<u64>> {
    fn sum(&self) -> u64 {
        self.read().iter().sum()
    }

    fn bump(&self) {
        self.write().iter_mut().for_each(|v| *v += 1);
    }
}

impl SharedVec for std::sync::RwLock<Vec<u64>> {
    fn sum(&self) -> u64 {
        self.read().map(|v| v.iter().sum()).unwrap_or_default()
    }

    fn bump(&self) {
        if let Ok(mut v) = self.write() {
            v.iter_mut().for_each(|v| *v += 1);
        }
    }
}

impl SharedVec for parking_lot::RwLock<Vec<u64>> {
    fn sum(&self) -> u64 {
        self.read().iter().sum()
    }

    fn bump(&self) {
        self.write().iter_mut().for_each(|v| *v += 1);
    }
}

/// Many short reads with a handful of writes interleaved
fn read_heavy(lock: &impl SharedVec) {
    thread::scope(|s| {
        for _ in 0..READERS {
            s.spawn(|| {
                for _ in 0..READS_PER_READER {
                    black_box(lock.sum());
                }
            });
        }
        s.spawn(|| {
            for _ in 0..WRITES {
                lock.bump();
                thread::yield_now();
            }
        });
    });
}

// ============================================================================
// Contended
// ============================================================================

fn bench_read_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("lock/read_heavy");

    for len in [16usize, 256] {
        let data = vec![1u64; len];

        let rwc = RwcLock::new(data.clone());
        group.bench_with_input(BenchmarkId::new("concurrent_rwlock", len), &(), |b, _| {
            b.iter(|| read_heavy(&rwc))
        });

        let std_lock = std::sync::RwLock::new(data.clone());
        group.bench_with_input(BenchmarkId::new("std_rwlock", len), &(), |b, _| {
            b.iter(|| read_heavy(&std_lock))
        });

        let pl = parking_lot::RwLock::new(data);
        group.bench_with_input(BenchmarkId::new("parking_lot_rwlock", len), &(), |b, _| {
            b.iter(|| read_heavy(&pl))
        });
    }

    group.finish();
}

// ============================================================================
// Uncontended
// ============================================================================

fn bench_single_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("lock/single_read");
    let data = vec![1u64; 16];

    let rwc = RwcLock::new(data.clone());
    group.bench_function("concurrent_rwlock", |b| b.iter(|| black_box(rwc.sum())));

    let std_lock = std::sync::RwLock::new(data.clone());
    group.bench_function("std_rwlock", |b| b.iter(|| black_box(std_lock.sum())));

    let pl = parking_lot::RwLock::new(data);
    group.bench_function("parking_lot_rwlock", |b| b.iter(|| black_box(pl.sum())));

    group.finish();
}

criterion_group!(benches, bench_read_heavy, bench_single_read);
criterion_main!(benches);
