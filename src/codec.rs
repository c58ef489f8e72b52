//! The compressed file format:
//!
//! ```text
//! [256 x 8 bytes]  frequency table, little-endian u64 per byte value
//! [N bytes]        packed code bits, least significant bit first
//! [1 byte]         how many bits of the last packed byte are valid (1-8)
//! ```

mod bit_reader;
mod bit_writer;

use std::cmp::min;

use crate::{
    code_table::CodeTable,
    errors::{Error, Result},
    freq::{FrequencyTable, HEADER_LEN},
    tree::CodeTree,
};

use self::{bit_reader::BitReader, bit_writer::BitWriter};

/// Produce the complete compressed form of `input`.
///
/// `freq` is written as the header and must be the table `codes` was built
/// from; every byte of `input` needs a code.
pub fn encode(input: &[u8], freq: &FrequencyTable, codes: &CodeTable) -> Result<Vec<u8>> {
    let mut writer = BitWriter::with_capacity(codes.encoded_len(freq) as usize);
    for &b in input {
        let code = codes
            .get(b)
            .ok_or_else(|| Error::CorruptData(format!("no code for byte 0x{b:02X}")))?;
        writer.write(code);
    }
    let bit_len = writer.len();

    let (packed, marker) = writer.finish();
    log::debug!(
        "encoded {} bytes into {bit_len} bits ({} packed bytes, marker {marker})",
        input.len(),
        packed.len()
    );

    let mut out = Vec::with_capacity(HEADER_LEN + packed.len() + 1);
    freq.write_to(&mut out)?;
    out.extend_from_slice(&packed);
    out.push(marker);

    Ok(out)
}

/// Reverse [`encode`].
pub fn decode(compressed: &[u8]) -> Result<Vec<u8>> {
    if compressed.len() < HEADER_LEN + 1 {
        let msg = format!(
            "expected at least {} bytes, found {}",
            HEADER_LEN + 1,
            compressed.len()
        );
        return Err(Error::MalformedHeader(msg));
    }

    let freq = FrequencyTable::parse(compressed)?;
    let total = freq
        .checked_total()
        .ok_or_else(|| Error::MalformedHeader("frequency counts overflow".into()))?;
    if total == 0 {
        return Err(Error::MalformedHeader("frequency table is empty".into()));
    }

    let (&marker, data) = compressed[HEADER_LEN..]
        .split_last()
        .ok_or_else(|| Error::MalformedHeader("missing trailing marker".into()))?;
    if !(1..=8).contains(&marker) {
        let msg = format!("trailing marker must be between 1 and 8, got {marker}");
        return Err(Error::MalformedHeader(msg));
    }
    if data.is_empty() {
        return Err(Error::MalformedHeader("no packed data".into()));
    }

    let tree = CodeTree::build(&freq)?;
    let bits = BitReader::new(data, marker);

    // Every symbol costs at least one bit, so the bit count bounds the output
    // even if the header lies about the total.
    let mut out = Vec::with_capacity(min(total, bits.size_hint().0 as u64) as usize);
    let root = tree.root();
    let mut node = root;
    for bit in bits {
        node = tree.descend(node, bit);
        if tree.is_leaf(node) {
            out.push(tree.value(node));
            node = root;
        }
    }

    if node != root {
        return Err(Error::CorruptData("data ends in the middle of a code".into()));
    }
    if out.len() as u64 != total {
        let msg = format!("decoded {} bytes, but the header promises {total}", out.len());
        return Err(Error::CorruptData(msg));
    }

    log::debug!("decoded {} bytes from {} packed bytes", out.len(), data.len());

    Ok(out)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_chacha::{
        rand_core::{RngCore, SeedableRng},
        ChaCha8Rng,
    };
    use test_case::test_case;

    use super::*;

    fn compress(input: &[u8]) -> Vec<u8> {
        let freq = FrequencyTable::from_bytes(input);
        let tree = CodeTree::build(&freq).unwrap();
        encode(input, &freq, &CodeTable::build(&tree)).unwrap()
    }

    #[test_case(b"AAAAABBBCC")]
    #[test_case(b"Hello world!")]
    #[test_case(b"abc")]
    #[test_case(b"A")]
    #[test_case(b"\x00\x00\x00\x00\x00\x00\x00\x00\x00")]
    fn round_trip(input: &[u8]) {
        let compressed = compress(input);
        assert_eq!(decode(&compressed).unwrap(), input);
    }

    #[test]
    fn example_layout() {
        let compressed = compress(b"AAAAABBBCC");

        // A = 0, B = 11, C = 10: 5 + 6 + 4 = 15 bits.
        assert_eq!(compressed.len(), HEADER_LEN + 2 + 1);
        let data = &compressed[HEADER_LEN..];
        assert_eq!(data[0], 0b_1110_0000);
        assert_eq!(data[1], 0b_0010_1111);
        assert_eq!(data[2], 7);
    }

    #[test]
    fn byte_aligned_marker() {
        // A single symbol encodes as one bit per byte; 16 bytes fill 2 bytes.
        let compressed = compress(&[b'z'; 16]);
        assert_eq!(compressed.len(), HEADER_LEN + 2 + 1);
        assert_eq!(*compressed.last().unwrap(), 8);
        assert_eq!(decode(&compressed).unwrap(), [b'z'; 16]);
    }

    #[test]
    fn random_payload() -> anyhow::Result<()> {
        let mut payload = vec![0; 100_000];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        rng.fill_bytes(&mut payload);

        // Skew the distribution so codes have varied lengths.
        for b in payload.iter_mut().step_by(3) {
            *b %= 4;
        }

        let compressed = compress(&payload);
        assert!(compressed.len() < payload.len());
        assert_eq!(decode(&compressed)?, payload);
        Ok(())
    }

    #[test]
    fn deterministic() {
        let input = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(compress(input), compress(input));
    }

    #[test_case(0 ; "nothing")]
    #[test_case(HEADER_LEN ; "header only")]
    #[test_case(HEADER_LEN - 1 ; "short header")]
    fn truncated(len: usize) {
        let compressed = compress(b"Hello world!");
        let err = decode(&compressed[..len]).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)), "{err:?}");
    }

    #[test_case(0 ; "zero")]
    #[test_case(9 ; "nine")]
    fn bad_marker(marker: u8) {
        let mut compressed = compress(b"Hello world!");
        *compressed.last_mut().unwrap() = marker;
        let err = decode(&compressed).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)), "{err:?}");
    }

    #[test]
    fn empty_header() {
        let mut compressed = vec![0; HEADER_LEN];
        compressed.extend([0xaa, 8]);
        let err = decode(&compressed).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)), "{err:?}");
    }

    #[test]
    fn marker_without_data() {
        let mut compressed = compress(b"abc");
        compressed.truncate(HEADER_LEN);
        compressed.push(8);
        let err = decode(&compressed).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)), "{err:?}");
    }

    #[test]
    fn missing_data_byte() {
        let mut compressed = compress(b"AAAAABBBCC");
        // Drop the last packed byte but keep the marker.
        let marker = compressed.pop().unwrap();
        compressed.pop();
        compressed.push(marker);
        let err = decode(&compressed).unwrap_err();
        assert!(matches!(err, Error::CorruptData(_)), "{err:?}");
    }

    #[test]
    fn ends_mid_code() {
        // "AAAAABBBCC" ends with C = 10; cutting the last bit leaves a dangling 1.
        let mut compressed = compress(b"AAAAABBBCC");
        *compressed.last_mut().unwrap() = 6;
        let err = decode(&compressed).unwrap_err();
        assert!(matches!(err, Error::CorruptData(_)), "{err:?}");
    }

    proptest! {
        #[test]
        fn round_trip_any(input in prop::collection::vec(any::<u8>(), 1..4000)) {
            prop_assert_eq!(decode(&compress(&input)).unwrap(), input);
        }

        #[test]
        fn header_sums_to_input_length(input in prop::collection::vec(any::<u8>(), 1..4000)) {
            let compressed = compress(&input);
            let freq = FrequencyTable::parse(&compressed).unwrap();
            prop_assert_eq!(freq.checked_total(), Some(input.len() as u64));
        }

        #[test]
        fn marker_matches_bit_length(input in prop::collection::vec(any::<u8>(), 1..4000)) {
            let freq = FrequencyTable::from_bytes(&input);
            let codes = CodeTable::build(&CodeTree::build(&freq).unwrap());
            let bit_len = codes.encoded_len(&freq);

            let compressed = encode(&input, &freq, &codes).unwrap();
            let marker = *compressed.last().unwrap() as u64;
            let data_len = (compressed.len() - HEADER_LEN - 1) as u64;

            prop_assert_eq!(data_len, (bit_len + 7) / 8);
            if bit_len % 8 == 0 {
                prop_assert_eq!(marker, 8);
            } else {
                prop_assert_eq!(marker, bit_len % 8);
            }
        }
    }
}
