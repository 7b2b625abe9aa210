//! Routes under `/api/enqueteurs`: the investigators dossiers can be assigned to.

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

mod create;
mod delete;
mod list;

const API_PATH: &str = "/api/enqueteurs";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        // Dossiers assigned to the investigator are unassigned, not deleted.
        .route("/{id}", delete().to(delete::process))
}
