//! Deletion of a single dossier and its annotation (`DELETE /api/donnees/{id}`).

use actix_web::{web, HttpResponse, Responder, ResponseError};
use log::info;
use serde_json::json;

use crate::config::Config;
use crate::services::{with_store, ServiceError};
use crate::store::donnees;

/// # Returns
/// - `200 OK` with a confirmation message.
/// - `404 Not Found` if the dossier does not exist.
pub(crate) async fn process(id: web::Path<i64>, config: web::Data<Config>) -> impl Responder {
    let id = id.into_inner();
    match delete_donnee(id, &config).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": format!("Record {} deleted", id) })),
        Err(e) => e.error_response(),
    }
}

async fn delete_donnee(id: i64, config: &Config) -> Result<(), ServiceError> {
    with_store(config, move |conn| {
        let tx = conn.transaction()?;
        let deleted = donnees::delete_cascade(&tx, id)?;
        tx.commit()?;
        if !deleted {
            return Err(ServiceError::NotFound(format!("record {} not found", id)));
        }
        info!("Deleted record {}", id);
        Ok(())
    })
    .await
}
