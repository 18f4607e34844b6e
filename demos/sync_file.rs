//! File staging example.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/file

use std::env;
use std::fs::File;

use chunkpool::{BufferPool, PoolConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Staging file: {}\n", path);

    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    println!("File size: {} bytes\n", metadata.len());

    // Custom config for smaller chunks and a short free list
    let config = PoolConfig::new(16 * 1024)?.with_max_pooled(4);

    let pool = BufferPool::new(config);

    let mut total_chunks = 0;
    let mut total_bytes = 0;

    for buffer in pool.split(file) {
        let buffer = buffer?;
        total_chunks += 1;
        total_bytes += buffer.remaining();

        println!(
            "Chunk {}: index={:>4}, len={:>8}",
            total_chunks,
            buffer.index(),
            buffer.remaining()
        );
        buffer.release();
    }

    println!("\nTotal: {} chunks, {} bytes", total_chunks, total_bytes);

    Ok(())
}
