//! # Annotation Update Service
//!
//! Backend logic for `POST /api/donnees-enqueteur/{donnee_id}`. The body is a
//! partial annotation: only the fields it carries are written, the others keep
//! their stored value. A dossier without an annotation gets one.

use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::enquete::{AnnotationPatch, DonneeEnqueteur};
use log::{debug, info};

use crate::config::Config;
use crate::services::{with_store, ServiceError};
use crate::store::{donnees, enquete};

/// Actix web handler for the `POST /api/donnees-enqueteur/{donnee_id}` endpoint.
///
/// # Arguments
/// * `donnee_id` - The dossier's id, extracted from the URL path.
/// * `payload` - The annotation fields to change.
///
/// # Returns
/// - `200 OK` with the annotation after the update.
/// - `404 Not Found` if the dossier does not exist.
pub(crate) async fn process(
    donnee_id: web::Path<i64>,
    payload: web::Json<AnnotationPatch>,
    config: web::Data<Config>,
) -> impl Responder {
    match update_annotation(donnee_id.into_inner(), payload.into_inner(), &config).await {
        Ok(annotation) => HttpResponse::Ok().json(annotation),
        Err(e) => e.error_response(),
    }
}

async fn update_annotation(
    donnee_id: i64,
    patch: AnnotationPatch,
    config: &Config,
) -> Result<DonneeEnqueteur, ServiceError> {
    if patch.is_empty() {
        debug!("Empty annotation patch for record {}", donnee_id);
    }
    with_store(config, move |conn| {
        let tx = conn.transaction()?;
        if !donnees::exists(&tx, donnee_id)? {
            return Err(ServiceError::NotFound(format!("record {} not found", donnee_id)));
        }
        let annotation = enquete::upsert_patch(&tx, donnee_id, patch)?;
        tx.commit()?;
        info!("Updated annotation of record {}", donnee_id);
        Ok(annotation)
    })
    .await
}
