//! # Annotation Retrieval Service
//!
//! Backend logic for `GET /api/donnees-enqueteur/{donnee_id}`. Every imported
//! dossier has exactly one annotation, created blank at import time; this returns
//! it as stored.

use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::enquete::DonneeEnqueteur;

use crate::config::Config;
use crate::services::{with_store, ServiceError};
use crate::store::{donnees, enquete};

/// Actix web handler for the `GET /api/donnees-enqueteur/{donnee_id}` endpoint.
///
/// # Arguments
/// * `donnee_id` - The dossier's id, extracted from the URL path.
///
/// # Returns
/// - `200 OK` with the annotation.
/// - `404 Not Found` if the dossier or its annotation does not exist.
pub(crate) async fn process(donnee_id: web::Path<i64>, config: web::Data<Config>) -> impl Responder {
    match get_annotation(donnee_id.into_inner(), &config).await {
        Ok(annotation) => HttpResponse::Ok().json(annotation),
        Err(e) => e.error_response(),
    }
}

async fn get_annotation(donnee_id: i64, config: &Config) -> Result<DonneeEnqueteur, ServiceError> {
    with_store(config, move |conn| {
        if !donnees::exists(conn, donnee_id)? {
            return Err(ServiceError::NotFound(format!("record {} not found", donnee_id)));
        }
        enquete::find_by_donnee(conn, donnee_id)?.ok_or_else(|| {
            ServiceError::NotFound(format!("record {} has no annotation", donnee_id))
        })
    })
    .await
}
