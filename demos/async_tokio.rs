//! Async staging with parallel streams example.
//!
//! Demonstrates several tasks staging their own streams concurrently through
//! one shared pool. Each task owns one buffer at a time; the pool is the
//! shared resource and hands reclaimed storage to whichever task asks next.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io

use chunkpool::{BufferError, BufferPool, PoolConfig, split_async};
use futures_util::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create multiple data streams
    let streams: Vec<Vec<u8>> = vec![
        (0..50_000).map(|i| (i % 256) as u8).collect(),
        (50_000..100_000).map(|i| (i % 256) as u8).collect(),
        (100_000..150_000).map(|i| (i % 256) as u8).collect(),
    ];

    println!("Staging {} streams concurrently...\n", streams.len());

    let pool = BufferPool::new(PoolConfig::new(16 * 1024)?);

    // Stage each stream in its own task, sharing the pool
    let handles: Vec<_> = streams
        .into_iter()
        .enumerate()
        .map(|(stream_id, data)| {
            let pool = pool.clone();
            tokio::spawn(async move { stage_stream(stream_id, data, pool).await })
        })
        .collect();

    // Wait for all streams to complete
    for handle in handles {
        let (stream_id, chunk_count, total_bytes) = handle.await??;
        println!(
            "Stream {}: {} chunks, {} bytes",
            stream_id, chunk_count, total_bytes
        );
    }

    let stats = pool.stats();
    println!(
        "\nPool: {} allocations, {} reuses",
        stats.allocations, stats.reuses
    );

    Ok(())
}

async fn stage_stream(
    stream_id: usize,
    data: Vec<u8>,
    pool: BufferPool,
) -> Result<(usize, usize, usize), BufferError> {
    let mut stream = split_async(&pool, &data[..]);

    let mut chunk_count = 0;
    let mut total_bytes = 0;
    let mut block = [0u8; 8192];

    while let Some(buffer) = stream.next().await {
        let mut buffer = buffer?;
        chunk_count += 1;
        while buffer.has_remaining() {
            total_bytes += buffer.get_bytes(&mut block)?;
        }
        buffer.release();
    }

    Ok((stream_id, chunk_count, total_bytes))
}
