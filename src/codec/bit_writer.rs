use bitvec::prelude::*;

/// Accumulates codes into packed bytes, least significant bit first.
#[derive(Debug, Default)]
pub struct BitWriter {
    bits: BitVec<u8, Lsb0>,
}

impl BitWriter {
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(bits),
        }
    }

    pub fn write(&mut self, code: &BitSlice<u8, Lsb0>) {
        self.bits.extend_from_bitslice(code);
    }

    /// Number of bits written so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// The packed bytes, with any unused high bits of the last byte zeroed,
    /// and the trailing marker: how many bits of the last byte are valid.
    ///
    /// When the bits end exactly on a byte boundary the marker is 8.
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let marker = match self.bits.len() % 8 {
            0 => 8,
            n => n as u8,
        };
        self.bits.set_uninitialized(false);
        (self.bits.into_vec(), marker)
    }
}
