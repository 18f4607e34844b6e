//! Async file staging example.
//!
//! Demonstrates the runtime-agnostic async splitter over a tokio file,
//! adapted through `tokio_util::compat`.
//!
//! Run with:
//!     cargo run --example async_stream --features async-io -- /path/to/file

use std::env;

use chunkpool::{BufferPool, PoolConfig, split_async};
use futures_util::StreamExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Staging file: {}\n", path);

    let file = tokio::fs::File::open(&path).await?;
    let pool = BufferPool::new(PoolConfig::new(16 * 1024)?);

    let mut stream = split_async(&pool, file.compat());

    let mut total_chunks = 0;
    let mut total_bytes = 0;

    while let Some(buffer) = stream.next().await {
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
