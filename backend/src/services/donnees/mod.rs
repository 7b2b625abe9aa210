//! Routes under `/api/donnees`: listing, deletion and investigator assignment.

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

mod assign;
mod delete;
mod list;

const API_PATH: &str = "/api/donnees";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        // Optional `fichier_id` and `enqueteur_id` query filters.
        .route("", get().to(list::process))
        .route("/assign", post().to(assign::process))
        .route("/{id}", delete().to(delete::process))
}
