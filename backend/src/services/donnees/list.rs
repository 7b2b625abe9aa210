//! # Dossier Listing Service
//!
//! Backend logic for `GET /api/donnees`. The query string can restrict the list to
//! one file (`fichier_id`) or one investigator (`enqueteur_id`); without either,
//! every dossier is returned in import order.

use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::DonneeQuery;

use crate::config::Config;
use crate::services::with_store;
use crate::store::donnees;

/// Actix web handler for the `GET /api/donnees` endpoint.
///
/// # Arguments
/// * `query` - Optional filters taken from the query string.
///
/// # Returns
/// - `200 OK` with a JSON array of dossiers.
pub(crate) async fn process(
    query: web::Query<DonneeQuery>,
    config: web::Data<Config>,
) -> impl Responder {
    let query = query.into_inner();
    match with_store(&config, move |conn| Ok(donnees::list(conn, &query)?)).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => e.error_response(),
    }
}
