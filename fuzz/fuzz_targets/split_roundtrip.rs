#![no_main]

use chunkpool::{BufferPool, PoolConfig};
use libfuzzer_sys::fuzz_target;

// Splitting a stream and draining the buffers in index order must reproduce
// the stream exactly, regardless of buffer capacity or processing order.
fuzz_target!(|data: &[u8]| {
    let Some((&first, payload)) = data.split_first() else {
        return;
    };
    let capacity = (first as usize % 32) + 1;
    let pool = BufferPool::new(PoolConfig::new(capacity).unwrap());

    let mut buffers: Vec<_> = pool
        .split(payload)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    // Framing: consecutive indices, every buffer but the last at capacity
    for (i, buffer) in buffers.iter().enumerate() {
        assert_eq!(buffer.index(), i as u64);
        assert!(buffer.remaining() <= capacity);
        if i + 1 < buffers.len() {
            assert_eq!(buffer.remaining(), capacity);
        }
    }

    // Scrambled arrival order must be recoverable by sorting on the index
    buffers.reverse();
    buffers.sort();

    let mut reassembled = Vec::with_capacity(payload.len());
    for mut buffer in buffers {
        let mut block = [0u8; 32];
        loop {
            let n = buffer.get_bytes(&mut block).unwrap();
            if n == 0 {
                break;
            }
            reassembled.extend_from_slice(&block[..n]);
        }
        buffer.release();
    }

    assert_eq!(reassembled, payload);
});
