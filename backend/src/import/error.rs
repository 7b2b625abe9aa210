use thiserror::Error;

use crate::fixed_width::NormalizeError;

/// Why a whole upload failed.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no file name was given")]
    MissingFileName,
    #[error("file type not allowed: {file_name}")]
    DisallowedExtension { file_name: String },
    #[error("empty file")]
    EmptyFile,
    #[error("no valid record found in file")]
    NoValidRecord { line_errors: Vec<String> },
    /// Another import registered the same name between the check and the insert.
    #[error("file '{file_name}' was registered by a concurrent import")]
    ConcurrentImport { file_name: String },
    /// A line failed in a way that ended the whole transaction, taking any
    /// uncommitted records with it.
    #[error("line {line_number} aborted the import: {source}")]
    Aborted {
        line_number: usize,
        source: LineError,
    },
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("could not store the upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    /// True for problems with the upload itself rather than with the server.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFileName
                | Self::DisallowedExtension { .. }
                | Self::EmptyFile
                | Self::NoValidRecord { .. }
        )
    }

    pub fn line_errors(&self) -> &[String] {
        match self {
            Self::NoValidRecord { line_errors } => line_errors,
            _ => &[],
        }
    }
}

/// Why a single line produced no record.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("blank line")]
    Blank,
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("could not be stored: {0}")]
    Store(#[from] rusqlite::Error),
}
