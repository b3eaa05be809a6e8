//! Dataset loading error types.

use std::path::PathBuf;

use crate::domain::InvalidCode;

/// Errors that can occur when loading a dataset directory.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset directory itself could not be read
    #[error("cannot read dataset directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be opened or a row could not be parsed
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A file parsed but its contents make no sense
    #[error("malformed {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// A stop or line code in a file is not a valid code
    #[error("{path}: {source}")]
    InvalidCode {
        path: PathBuf,
        #[source]
        source: InvalidCode,
    },
}
