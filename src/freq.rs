use std::{
    fs,
    io::{self, prelude::*},
    path::Path,
};

use crate::errors::{Error, Result};

/// Number of distinct symbols: one per byte value.
pub const SYMBOLS: usize = 0x100;

/// Size in bytes of the frequency table stored at the start of a compressed
/// file: 256 little-endian `u64` counts.
pub const HEADER_LEN: usize = SYMBOLS * 8;

/// How many times each byte value occurs in some input.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOLS],
}

impl FrequencyTable {
    /// Count every byte of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counts = [0u64; SYMBOLS];
        for &b in bytes {
            counts[b as usize] += 1;
        }
        Self { counts }
    }

    /// Read the whole of `path` into memory and count its bytes.
    ///
    /// Returns the file contents along with the table, so the caller doesn't
    /// have to read the file a second time.
    pub fn read_file(path: impl AsRef<Path>) -> Result<(Self, Vec<u8>)> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::from_read(e, path))?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());

        Ok((Self::from_bytes(&bytes), bytes))
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Sum of all counts, or `None` if it doesn't fit in a `u64`.
    ///
    /// For a table built by counting, this is the length of the input. A
    /// table parsed from a damaged header may overflow.
    pub fn checked_total(&self) -> Option<u64> {
        self.counts.iter().try_fold(0u64, |acc, &c| acc.checked_add(c))
    }

    /// Like [`checked_total`](Self::checked_total), saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Nonzero entries, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .map(|b| (b, self.counts[b as usize]))
            .filter(|&(_, c)| c != 0)
    }

    /// Write the table as a fixed-size header.
    pub fn write_to(&self, mut out: impl Write) -> io::Result<()> {
        for count in &self.counts {
            out.write_all(&count.to_le_bytes())?;
        }
        Ok(())
    }

    /// Parse the header at the start of `bytes`.
    ///
    /// Only checks that there are enough bytes; whether the counts make
    /// sense is up to the caller.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            let msg = format!(
                "expected a {HEADER_LEN} byte frequency table, found only {} bytes",
                bytes.len()
            );
            return Err(Error::MalformedHeader(msg));
        }

        let mut counts = [0u64; SYMBOLS];
        for (count, chunk) in counts.iter_mut().zip(bytes[..HEADER_LEN].chunks_exact(8)) {
            let mut buf = [0; 8];
            buf.copy_from_slice(chunk);
            *count = u64::from_le_bytes(buf);
        }

        Ok(Self { counts })
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; SYMBOLS],
        }
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
