// cursor.rs
//
// Copyright (c) 2026  gifprobe developers
//
use crate::error::{Error, Result};

/// Forward-only reader over a fixed byte source.
///
/// All reads and skips consume bytes strictly in order; no backward seek
/// is possible.  A cursor is single-use: one parse invocation consumes it.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor over a byte slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Read exactly `n` bytes, or fail with `TruncatedStream`.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::TruncatedStream);
        }
        let b = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(b)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    /// Read a little-endian 16-bit integer.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let b = self.read(2)?;
        Ok((b[1] as u16) << 8 | b[0] as u16)
    }

    /// Advance `n` bytes without materializing them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::TruncatedStream);
        }
        self.pos += n;
        Ok(())
    }

    /// Check whether no further bytes are available.
    pub fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Number of bytes left in the stream.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sequential_reads() {
        let mut c = Cursor::new(&[1, 2, 3, 4, 5]);
        assert_eq!(c.read_u8().unwrap(), 1);
        assert_eq!(c.read_u16_le().unwrap(), 0x0302);
        assert!(!c.at_end());
        c.skip(2).unwrap();
        assert!(c.at_end());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn truncated_read() {
        let mut c = Cursor::new(&[1, 2]);
        assert!(matches!(c.read(3), Err(Error::TruncatedStream)));
        // a failed read consumes nothing
        assert_eq!(c.remaining(), 2);
        assert!(matches!(c.skip(5), Err(Error::TruncatedStream)));
        assert_eq!(c.read(2).unwrap(), &[1, 2]);
    }
}
