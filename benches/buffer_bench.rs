//! Benchmarks for chunkpool.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use chunkpool::{BufferPool, PoolConfig};

fn bench_stage_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("stage_and_drain");

    for size in [64 * 1024, 1024 * 1024, 10 * 1024 * 1024] {
        // Deterministic pseudo-random data
        let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

        group.throughput(Throughput::Bytes(size as u64));

        // Pooled: storage is reclaimed and reused across chunks
        group.bench_with_input(
            format!("pooled_{}kb", size / 1024),
            &data,
            |b, data| {
                let pool = BufferPool::new(PoolConfig::new(64 * 1024).unwrap());
                b.iter(|| {
                    let mut total = 0usize;
                    let mut block = [0u8; 4096];
                    for buffer in pool.split(black_box(&data[..])) {
                        let mut buffer = buffer.unwrap();
                        loop {
                            let n = buffer.get_bytes(&mut block).unwrap();
                            if n == 0 {
                                break;
                            }
                            total += n;
                        }
                        buffer.release();
                    }
                    black_box(total)
                });
            },
        );

        // Unpooled: every chunk pays a fresh allocation
        group.bench_with_input(
            format!("unpooled_{}kb", size / 1024),
            &data,
            |b, data| {
                let config = PoolConfig::new(64 * 1024).unwrap().with_max_pooled(0);
                let pool = BufferPool::new(config);
                b.iter(|| {
                    let mut total = 0usize;
                    let mut block = [0u8; 4096];
                    for buffer in pool.split(black_box(&data[..])) {
                        let mut buffer = buffer.unwrap();
                        loop {
                            let n = buffer.get_bytes(&mut block).unwrap();
                            if n == 0 {
                                break;
                            }
                            total += n;
                        }
                        buffer.release();
                    }
                    black_box(total)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_stage_and_drain);
criterion_main!(benches);
