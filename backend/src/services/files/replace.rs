//! # File Replacement Service
//!
//! Backend logic for `POST /api/files/replace`. Works like `/parse`, except that a
//! file already registered under the same name is deleted first, together with its
//! dossiers, their annotations and its stored upload.
//!
//! The eviction and the new registration are committed together, so a failed
//! registration leaves the previous file in place. An empty upload is refused
//! before anything is deleted.

use actix_multipart::Multipart;
use actix_web::{web, Responder, ResponseError};

use super::upload::{import_response, read_upload};
use crate::config::Config;
use crate::import::{replace_file, ImportError, ImportOutcome, ImportReport};
use crate::services::{with_store, ServiceError};
use crate::store::UnitOfWork;

/// Actix web handler for the `POST /api/files/replace` endpoint.
///
/// # Arguments
/// * `payload` - The multipart body; its `file` part holds the new dossier file.
/// * `config` - Server configuration.
///
/// # Returns
/// - `200 OK` with an `ImportResponse` of status `ok`.
/// - `409 Conflict` if another import took the name while the old file was evicted.
/// - `400 Bad Request` for an unusable upload, `500` when the store fails.
pub(crate) async fn process(payload: Multipart, config: web::Data<Config>) -> impl Responder {
    match replace_upload(payload, &config).await {
        Ok(result) => import_response(result.map(ImportOutcome::Imported)),
        Err(e) => e.error_response(),
    }
}

async fn replace_upload(
    payload: Multipart,
    config: &Config,
) -> Result<Result<ImportReport, ImportError>, ServiceError> {
    let upload = read_upload(payload, config.max_upload_bytes()).await?;
    let settings = config.import_settings();
    with_store(config, move |conn| {
        Ok(replace_file(&mut UnitOfWork::new(conn), &upload, &settings))
    })
    .await
}
