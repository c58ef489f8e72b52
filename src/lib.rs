//! Static Huffman compression of single files.
//!
//! A compressed file stores the byte frequency table of the original, so the
//! decompressor can rebuild exactly the same code tree. See [`codec`] for the
//! byte layout.

pub mod code_table;
pub mod codec;
mod errors;
pub mod freq;
pub mod tree;

use std::{
    ffi::OsStr,
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::code_table::{bits_to_string, CodeTable};
use crate::freq::FrequencyTable;
use crate::tree::CodeTree;

pub use crate::errors::{Error, Result};

/// Suffix given to compressed files (without the leading dot).
pub const EXTENSION: &str = "huf";

/// Compress a byte slice.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    let freq = FrequencyTable::from_bytes(input);
    let tree = CodeTree::build(&freq)?;
    let codes = CodeTable::build(&tree);
    codec::encode(input, &freq, &codes)
}

/// Decompress the output of [`compress`].
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    codec::decode(compressed)
}

/// What [`compress_file`] did.
#[derive(Debug, Clone)]
pub struct CompressionReport {
    pub bytes_read: u64,
    pub output: PathBuf,
    pub freq: FrequencyTable,
    pub codes: CodeTable,
}

/// Compress `path` into `path.huf`, overwriting any existing file.
///
/// Shorthand for [`start_compressing`] followed by [`PendingCompression::finish`].
pub fn compress_file(path: impl AsRef<Path>) -> Result<CompressionReport> {
    start_compressing(path)?.finish()
}

/// Read and count the input file, without writing anything yet.
///
/// The file is closed again before this returns.
pub fn start_compressing(path: impl AsRef<Path>) -> Result<PendingCompression> {
    let path = path.as_ref();
    let (freq, input) = FrequencyTable::read_file(path)?;

    Ok(PendingCompression {
        path: path.to_owned(),
        input,
        freq,
    })
}

/// An input file that has been read into memory, but not yet compressed.
pub struct PendingCompression {
    path: PathBuf,
    input: Vec<u8>,
    freq: FrequencyTable,
}

impl PendingCompression {
    pub fn bytes_read(&self) -> u64 {
        self.input.len() as u64
    }

    pub fn freq(&self) -> &FrequencyTable {
        &self.freq
    }

    /// Build the code and write the compressed file.
    ///
    /// Nothing is written if the input was empty.
    pub fn finish(self) -> Result<CompressionReport> {
        let Self { path, input, freq } = self;
        let bytes_read = input.len() as u64;

        let tree = CodeTree::build(&freq)?;
        let codes = CodeTable::build(&tree);
        let compressed = codec::encode(&input, &freq, &codes)?;

        let output = compressed_path(&path);
        fs::write(&output, &compressed)?;
        log::info!(
            "compressed {} ({bytes_read} bytes) into {} ({} bytes)",
            path.display(),
            output.display(),
            compressed.len()
        );

        Ok(CompressionReport {
            bytes_read,
            output,
            freq,
            codes,
        })
    }
}

/// Decompress `path`, which must contain `.huf`, into the same path with
/// everything from `.huf` onwards removed. Returns the output path.
pub fn decompress_file(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let output = decompressed_path(path)?;

    let compressed = fs::read(path).map_err(|e| Error::from_read(e, path))?;
    let decompressed = decompress(&compressed)?;

    fs::write(&output, &decompressed)?;
    log::info!(
        "decompressed {} into {} ({} bytes)",
        path.display(),
        output.display(),
        decompressed.len()
    );

    Ok(output)
}

/// `foo.txt` -> `foo.txt.huf`
pub fn compressed_path(path: impl AsRef<Path>) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// `foo.txt.huf` -> `foo.txt`
///
/// Cuts at the first occurrence of `.huf`, wherever it is. The search runs
/// on the raw path bytes, so names that aren't valid UTF-8 work too.
pub fn decompressed_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let suffix = format!(".{EXTENSION}");

    let name = path.as_os_str().as_encoded_bytes();
    let pos = name
        .windows(suffix.len())
        .position(|window| window == suffix.as_bytes())
        .ok_or_else(|| Error::InvalidExtension {
            path: path.to_owned(),
        })?;

    // SAFETY: `name` came from an `OsStr`, and `pos` is immediately before
    // the ASCII `.`, which is a valid place to split encoded bytes.
    let stem = unsafe { OsStr::from_encoded_bytes_unchecked(&name[..pos]) };
    Ok(PathBuf::from(stem))
}

impl fmt::Display for CompressionReport {
    /// The verbose report: every nonzero count, then every code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Frequency Table")?;
        for (b, count) in self.freq.iter() {
            writeln!(f, "0x{}: {count}", hex::encode_upper([b]))?;
        }
        writeln!(f)?;

        writeln!(f, "Dictionary")?;
        for (b, code) in self.codes.iter() {
            writeln!(f, "0x{}: {}", hex::encode_upper([b]), bits_to_string(code))?;
        }
        Ok(())
    }
}
