//! Basic synchronous staging example with the pooled buffer API.
//!
//! Run with:
//!     cargo run --example sync_basic

use chunkpool::{BufferPool, PoolConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create some sample data
    let data = vec![0u8; 1024 * 1024]; // 1 MB of zeros

    // Pool issuing 64 KiB buffers
    let pool = BufferPool::new(PoolConfig::new(64 * 1024)?);

    println!("Staging {} bytes of data...\n", data.len());

    let mut total_chunks = 0;
    let mut total_bytes = 0;
    let mut block = [0u8; 8192];

    for buffer in pool.split(&data[..]) {
        let mut buffer = buffer?;
        total_chunks += 1;

        println!(
            "Chunk {}: index={}, len={}",
            total_chunks,
            buffer.index(),
            buffer.len()
        );

        while buffer.has_remaining() {
            total_bytes += buffer.get_bytes(&mut block)?;
        }

        // Storage goes back to the pool for the next chunk
        buffer.release();
    }

    println!("\nTotal: {} chunks, {} bytes", total_chunks, total_bytes);

    let stats = pool.stats();
    println!(
        "Pool: {} allocations, {} reuses, {} reclaims",
        stats.allocations, stats.reuses, stats.reclaims
    );

    Ok(())
}
