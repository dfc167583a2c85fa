//! Little-endian cursor over firmware buffers.

use crate::error::CorruptFile;
use crate::firmware;

/// Reads fixed-width little-endian fields, tracking which structure is being
/// decoded so a short buffer reports where it ran out.
#[derive(Debug)]
pub struct LeCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    structure: &'static str,
}

impl<'a> LeCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            structure: "buffer",
        }
    }

    /// Name the structure that subsequent reads belong to.
    pub fn enter(&mut self, structure: &'static str) {
        self.structure = structure;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Move to an absolute offset. Seeking past the end is reported on the
    /// next read.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn take(&mut self, needed: usize) -> Result<&'a [u8], CorruptFile> {
        if self.remaining() < needed {
            return Err(CorruptFile::Truncated {
                structure: self.structure,
                offset: self.pos,
                needed,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    pub fn i16(&mut self) -> Result<i16, CorruptFile> {
        let mut raw = [0u8; 2];
        raw.copy_from_slice(self.take(2)?);
        Ok(i16::from_le_bytes(raw))
    }

    pub fn u16(&mut self) -> Result<u16, CorruptFile> {
        let mut raw = [0u8; 2];
        raw.copy_from_slice(self.take(2)?);
        Ok(u16::from_le_bytes(raw))
    }

    pub fn i32(&mut self) -> Result<i32, CorruptFile> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(i32::from_le_bytes(raw))
    }

    /// A fixed-width UTF-16LE text field of `chars` code units.
    pub fn utf16(&mut self, chars: usize) -> Result<String, CorruptFile> {
        let bytes = self.take(chars * firmware::SIZE_OF_CHAR)?;
        Ok(firmware::decode_string(bytes))
    }
}
