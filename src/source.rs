use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::bufread::GzDecoder;

use crate::error::DecodeError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A forward-only byte source over a raw or gzip-compressed log stream.
///
/// Detects the gzip envelope by content (not filename) and decompresses it
/// transparently; `position()` reports the decompressed byte offset. No
/// backward seeking: every record's offset depends on the size of all
/// records before it, so the format is strictly sequential.
pub struct Source<R: BufRead> {
    inner: Inner<R>,
    pos: u64,
}

enum Inner<R: BufRead> {
    Plain(R),
    Gzip(GzDecoder<R>),
}

/// Open a log file, sniffing for gzip compression.
pub fn open_log(path: impl AsRef<Path>) -> Result<Source<BufReader<File>>, DecodeError> {
    let file = File::open(path)?;
    Source::new(BufReader::new(file))
}

impl<R: BufRead> Source<R> {
    /// Wrap an arbitrary buffered reader, sniffing for gzip compression.
    pub fn new(mut reader: R) -> Result<Self, DecodeError> {
        // fill_buf peeks without consuming, so the decompressor (or the raw
        // path) still sees the magic bytes.
        let head = reader.fill_buf()?;
        let inner = if head.len() >= 2 && head[..2] == GZIP_MAGIC {
            Inner::Gzip(GzDecoder::new(reader))
        } else {
            Inner::Plain(reader)
        };
        Ok(Source { inner, pos: 0 })
    }

    /// The number of (decompressed) bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.pos
    }

    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = match &mut self.inner {
            Inner::Plain(r) => r.read(buf)?,
            Inner::Gzip(r) => r.read(buf)?,
        };
        self.pos += n as u64;
        Ok(n)
    }

    /// Fill `buf` completely, failing with `Truncated` if the stream ends
    /// before `buf.len()` bytes have been read.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(DecodeError::Truncated {
                        offset: self.pos,
                        needed: buf.len() - filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                // A torn gzip envelope surfaces as UnexpectedEof from the
                // decompressor; that is still a truncated log.
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(DecodeError::Truncated {
                        offset: self.pos,
                        needed: buf.len() - filled,
                    })
                }
                Err(e) => return Err(DecodeError::Io(e)),
            }
        }
        Ok(())
    }

    /// Like `read_exact`, but a clean end of stream before the *first* byte
    /// returns `Ok(false)`. This is the record-boundary probe: zero bytes at
    /// a boundary is the only legitimate end of file, while a partial read
    /// is truncation.
    pub fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> Result<bool, DecodeError> {
        let mut filled = 0;
        while filled == 0 {
            match self.read(buf) {
                Ok(0) => return Ok(false),
                Ok(n) => filled = n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(false),
                Err(e) => return Err(DecodeError::Io(e)),
            }
        }
        self.read_exact(&mut buf[filled..])?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    #[test]
    fn test_plain_passthrough() {
        let data = b"abcdef".to_vec();
        let mut src = Source::new(std::io::Cursor::new(data)).unwrap();
        let mut buf = [0u8; 6];
        src.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abcdef");
        assert_eq!(src.position(), 6);
    }

    #[test]
    fn test_gzip_detected_by_content() {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"hello world").unwrap();
        let compressed = enc.finish().unwrap();

        let mut src = Source::new(std::io::Cursor::new(compressed)).unwrap();
        let mut buf = [0u8; 11];
        src.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello world");
        // Position tracks decompressed bytes.
        assert_eq!(src.position(), 11);
    }

    #[test]
    fn test_truncated_read() {
        let mut src = Source::new(std::io::Cursor::new(vec![1u8, 2, 3])).unwrap();
        let mut buf = [0u8; 8];
        match src.read_exact(&mut buf) {
            Err(DecodeError::Truncated { needed, .. }) => assert_eq!(needed, 5),
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn test_eof_probe_clean() {
        let mut src = Source::new(std::io::Cursor::new(Vec::new())).unwrap();
        let mut buf = [0u8; 4];
        assert!(!src.read_exact_or_eof(&mut buf).unwrap());
    }

    #[test]
    fn test_eof_probe_partial_is_truncated() {
        let mut src = Source::new(std::io::Cursor::new(vec![9u8, 9])).unwrap();
        let mut buf = [0u8; 4];
        match src.read_exact_or_eof(&mut buf) {
            Err(DecodeError::Truncated { .. }) => {}
            other => panic!("expected Truncated, got {other:?}"),
        }
    }
}
