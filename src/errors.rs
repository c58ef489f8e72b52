use std::io;
use std::path::PathBuf;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid file path: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// The input had no bytes, so there is nothing to build a code from.
    #[error("File is empty")]
    EmptyInput,

    #[error("'huf -d' only works on files with '.huf' extension")]
    InvalidExtension { path: PathBuf },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The packed bits disagree with the frequency table in the header.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error from opening or reading `path`.
    pub(crate) fn from_read(e: io::Error, path: impl Into<PathBuf>) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound { path: path.into() },
            _ => Error::Io(e),
        }
    }

    /// Whether the command line tool should treat this as a benign exit.
    ///
    /// These are the "you asked for something that can't be done" cases, as
    /// opposed to the environment or the data failing us.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            Error::FileNotFound { .. } | Error::EmptyInput | Error::InvalidExtension { .. }
        )
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => e,
            Error::FileNotFound { .. } => io::Error::new(io::ErrorKind::NotFound, e),
            Error::EmptyInput | Error::InvalidExtension { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, e)
            }
            Error::MalformedHeader(_) | Error::CorruptData(_) => {
                io::Error::new(io::ErrorKind::InvalidData, e)
            }
        }
    }
}
