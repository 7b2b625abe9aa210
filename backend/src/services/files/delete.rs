//! # File Deletion Service
//!
//! Backend logic for `DELETE /api/files/{file_id}`. The file row, its dossiers and
//! their annotations are deleted in one transaction; the stored upload is removed
//! afterwards on a best-effort basis.

use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::fichier::Fichier;
use log::info;
use serde_json::json;
use std::path::Path;

use crate::config::Config;
use crate::import::remove_artifact;
use crate::services::{with_store, ServiceError};
use crate::store::fichiers;

/// Actix web handler for the `DELETE /api/files/{file_id}` endpoint.
///
/// # Arguments
/// * `file_id` - The file's id, extracted from the URL path.
///
/// # Returns
/// - `200 OK` with a confirmation message and the deleted id.
/// - `404 Not Found` if no file has that id.
pub(crate) async fn process(file_id: web::Path<i64>, config: web::Data<Config>) -> impl Responder {
    match delete_file(file_id.into_inner(), &config).await {
        Ok(fichier) => HttpResponse::Ok().json(json!({
            "message": format!("File '{}' deleted", fichier.nom),
            "id": fichier.id,
        })),
        Err(e) => e.error_response(),
    }
}

async fn delete_file(file_id: i64, config: &Config) -> Result<Fichier, ServiceError> {
    with_store(config, move |conn| {
        let tx = conn.transaction()?;
        let deleted = fichiers::delete_cascade(&tx, file_id)?;
        tx.commit()?;

        let fichier =
            deleted.ok_or_else(|| ServiceError::NotFound(format!("file {} not found", file_id)))?;
        if let Some(chemin) = fichier.chemin.as_deref() {
            remove_artifact(Path::new(chemin));
        }
        info!("Deleted file '{}' (id {})", fichier.nom, fichier.id);
        Ok(fichier)
    })
    .await
}
