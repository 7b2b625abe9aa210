//! Shared models for the dossier import backend.
//!
//! Everything here is plain serde data: the store, the import pipeline and the
//! HTTP layer exchange these types, and they define the JSON the API emits.

pub mod imports;
pub mod model;
pub mod requests;
