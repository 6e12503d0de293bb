//! A thin seam around a seekable byte source, so the decoder does not need to care whether it is
//! reading from a plain file, a cursor in a test, or anything else that is `Read + Seek`.
use lid_core::errors::LidError;
use std::io::{Read, Seek, SeekFrom};

/// Reads a page-or-header-sized chunk at a given offset from any `Read + Seek` source.
pub trait ByteSource {
    fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, LidError>;
    fn total_len(&mut self) -> Result<u64, LidError>;
}

impl<T: Read + Seek> ByteSource for T {
    fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, LidError> {
        self.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn total_len(&mut self) -> Result<u64, LidError> {
        let current = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(current))?;
        Ok(len)
    }
}
