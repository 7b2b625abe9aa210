//! Decoder for the supplier's fixed-width dossier lines.
//!
//! A line goes through two stages:
//! - [`decoder`] cuts it into trimmed text slices at the positions listed in
//!   [`schema::DOSSIER_LAYOUT`], tolerating lines that stop early.
//! - [`normalizer`] turns those slices into a typed [`common::model::donnee::DossierFields`],
//!   rejecting lines without a case number.
//!
//! Both stages are pure; storing the result is the import pipeline's job.

pub mod decoder;
pub mod normalizer;
pub mod schema;

pub use decoder::decode_line;
pub use normalizer::{normalize, NormalizeError, ValueMode};
pub use schema::{check_layout, DOSSIER_LAYOUT};
