//! Routes under `/api/donnees-enqueteur`: the investigator annotation of a dossier.
//!
//! - `GET /{donnee_id}` returns the annotation.
//! - `POST /{donnee_id}` applies a partial update. Keys absent from the body
//!   are left alone; keys set to `null` are cleared. The annotation is
//!   created when the dossier has none yet.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod get;
mod update;

const API_PATH: &str = "/api/donnees-enqueteur";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{donnee_id}", get().to(get::process))
        .route("/{donnee_id}", post().to(update::process))
}

#[cfg(test)]
mod tests;
