//! Import statistics for `GET /api/files/stats`.

use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::config::Config;
use crate::services::with_store;
use crate::store::fichiers;

/// Returns the number of files and dossiers and every file with its record
/// count, newest upload first.
pub(crate) async fn process(config: web::Data<Config>) -> impl Responder {
    match with_store(&config, |conn| Ok(fichiers::stats(conn)?)).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => e.error_response(),
    }
}
