//! Crate-level error type

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parser::ParseError;

/// Result type for reading a DTD and writing its pages
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop page generation
#[derive(Error, Debug)]
pub enum Error {
    /// The DTD text is malformed; nothing has been written
    #[error("invalid DTD: {0}")]
    Parse(#[from] ParseError),

    /// Reading the DTD or writing the output failed
    #[error("cannot access '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
