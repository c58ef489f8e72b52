use bitvec::prelude::*;

/// Iterates over the valid bits of packed data, least significant bit first.
///
/// Every byte but the last contributes all 8 bits; the last contributes only
/// as many as the trailing marker says.
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Lsb0>,
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// `marker` must be in `1..=8`.
    pub fn new(data: &'a [u8], marker: u8) -> Self {
        debug_assert!((1..=8).contains(&marker));

        let valid = match data.len() {
            0 => 0,
            n => (n - 1) * 8 + marker as usize,
        };
        Self {
            bits: &data.view_bits::<Lsb0>()[..valid],
            pos: 0,
        }
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = *self.bits.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.len() - self.pos;
        (remaining, Some(remaining))
    }
}
