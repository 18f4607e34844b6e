#![no_main]

use chunkpool::{BufferError, BufferPool, PoolConfig};
use libfuzzer_sys::fuzz_target;

// Drives a single buffer through an arbitrary op sequence and checks every
// outcome against a simple reference model: typed errors in the wrong phase,
// exact bytes in the right one.
fuzz_target!(|data: &[u8]| {
    let Some((&first, ops)) = data.split_first() else {
        return;
    };
    let capacity = (first as usize % 64) + 1;
    let pool = BufferPool::new(PoolConfig::new(capacity).unwrap());
    let mut buffer = pool.create(0).unwrap();

    // Reference model
    let mut written: Vec<u8> = Vec::new();
    let mut readable = false;
    let mut pos = 0usize;
    let mut mark: Option<usize> = None;

    for chunk in ops.chunks(2) {
        let op = chunk[0] % 6;
        let arg = *chunk.get(1).unwrap_or(&0);

        match op {
            0 => match buffer.put_byte(arg) {
                Ok(()) => {
                    assert!(!readable && written.len() < capacity);
                    written.push(arg);
                }
                Err(BufferError::BufferFull { .. }) => {
                    assert!(!readable);
                    assert_eq!(written.len(), capacity);
                }
                Err(BufferError::NotFillable) => assert!(readable),
                Err(e) => panic!("unexpected put_byte error: {e}"),
            },
            1 => match buffer.make_readable() {
                Ok(()) => {
                    assert!(!readable);
                    readable = true;
                    pos = 0;
                    mark = None;
                }
                Err(BufferError::NotFillable) => assert!(readable),
                Err(e) => panic!("unexpected make_readable error: {e}"),
            },
            2 => match buffer.get_byte() {
                Ok(byte) => {
                    assert!(readable && pos < written.len());
                    assert_eq!(byte, written[pos]);
                    pos += 1;
                }
                Err(BufferError::NotReadable) => assert!(!readable),
                Err(BufferError::Underflow) => {
                    assert!(readable);
                    assert_eq!(pos, written.len());
                }
                Err(e) => panic!("unexpected get_byte error: {e}"),
            },
            3 => {
                let mut dest = vec![0u8; arg as usize % 16];
                match buffer.get_bytes(&mut dest) {
                    Ok(n) => {
                        assert!(readable);
                        assert_eq!(n, dest.len().min(written.len() - pos));
                        assert_eq!(&dest[..n], &written[pos..pos + n]);
                        pos += n;
                    }
                    Err(BufferError::NotReadable) => assert!(!readable),
                    Err(e) => panic!("unexpected get_bytes error: {e}"),
                }
            }
            4 => match buffer.mark() {
                Ok(()) => {
                    assert!(readable);
                    mark = Some(pos);
                }
                Err(BufferError::NotReadable) => assert!(!readable),
                Err(e) => panic!("unexpected mark error: {e}"),
            },
            5 => match buffer.reset() {
                Ok(()) => {
                    assert!(readable);
                    pos = mark.expect("reset succeeded without a mark");
                }
                Err(BufferError::MarkNotSet) => {
                    assert!(readable);
                    assert!(mark.is_none());
                }
                Err(BufferError::NotReadable) => assert!(!readable),
                Err(e) => panic!("unexpected reset error: {e}"),
            },
            _ => unreachable!(),
        }

        assert_eq!(buffer.len(), written.len());
        assert_eq!(buffer.has_remaining(), readable && pos < written.len());
        assert_eq!(
            buffer.remaining(),
            if readable { written.len() - pos } else { 0 }
        );
    }

    buffer.release();
    assert_eq!(pool.available(), 1);
});
