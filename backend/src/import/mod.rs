//! Turns an uploaded dossier file into stored records.
//!
//! [`import_file`] and [`replace_file`] run the whole pipeline against a
//! [`UnitOfWork`](crate::store::UnitOfWork): duplicate check, file
//! registration, line-by-line decoding and storage with periodic commits,
//! and cleanup when nothing usable was found.

mod artifact;
mod content;
mod error;
mod guard;
mod pipeline;

#[cfg(test)]
mod tests;

pub use artifact::remove as remove_artifact;
pub use error::ImportError;
pub use pipeline::{import_file, replace_file, ImportOutcome, ImportReport, ImportSettings, Upload};
