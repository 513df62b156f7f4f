//! Chunked streaming copy.
//!
//! Reads from any `Read` into a fixed-size buffer and writes each chunk to the
//! sink, so memory use is bounded by `chunk_size` regardless of payload size.
//! The sink is flushed before returning; durability (fsync) is the caller's
//! concern and is handled when a staging file is committed.

use std::io::{self, Read, Write};

/// Buffer size for local file-to-file copies.
pub const LOCAL_COPY_CHUNK: usize = 1024 * 1024;

/// Copy `reader` into `writer` in `chunk_size` pieces. Returns bytes written.
pub fn copy_chunked<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
    writer.flush()?;
    Ok(total)
}
