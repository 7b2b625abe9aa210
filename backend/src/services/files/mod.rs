//! Upload, reporting and deletion of imported files.
//!
//! Routes under `/api/files`:
//! - `POST /parse`: multipart upload (field `file`) imported as a new file.
//!   Answers `409` with the existing file's summary when the name is taken.
//! - `POST /replace`: same upload, replacing any file of that name.
//! - `GET /stats`: file and dossier counts, newest files first.
//! - `DELETE /{file_id}`: removes a file, its dossiers and its stored upload.

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

mod delete;
mod parse;
mod replace;
mod stats;
mod upload;

const API_PATH: &str = "/api/files";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/parse", post().to(parse::process))
        .route("/replace", post().to(replace::process))
        .route("/stats", get().to(stats::process))
        .route("/{file_id}", delete().to(delete::process))
}

#[cfg(test)]
mod tests;
