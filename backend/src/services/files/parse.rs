//! # File Import Service
//!
//! Backend logic for `POST /api/files/parse`, the endpoint that turns an uploaded
//! dossier file into stored records.
//!
//! ## Workflow
//!
//! 1.  **Upload**: `read_upload` collects the multipart `file` part and refuses
//!     payloads above the configured size limit.
//!
//! 2.  **Import**: the upload is handed to [`import_file`] on the blocking pool,
//!     with a fresh connection wrapped in a `UnitOfWork`. The pipeline checks the
//!     name, looks for a file already registered under it, registers the new file
//!     and stores one dossier per valid line, committing in batches.
//!
//! 3.  **Response**: `import_response` maps the outcome onto the status code:
//!     `200` with the record count and line errors, `409` with the existing file
//!     when the name is taken, `400` for a bad upload and `500` otherwise.

use actix_multipart::Multipart;
use actix_web::{web, Responder, ResponseError};

use super::upload::{import_response, read_upload};
use crate::config::Config;
use crate::import::{import_file, ImportError, ImportOutcome};
use crate::services::{with_store, ServiceError};
use crate::store::UnitOfWork;

/// Actix web handler for the `POST /api/files/parse` endpoint.
///
/// # Arguments
/// * `payload` - The multipart body; its `file` part holds the dossier file.
/// * `config` - Server configuration, for the database, upload directory and limits.
///
/// # Returns
/// - `200 OK` with an `ImportResponse` of status `ok` when records were imported.
/// - `409 Conflict` with the existing file's name, upload date and record count.
/// - `400 Bad Request` when the upload is unusable, `500` when the store fails.
pub(crate) async fn process(payload: Multipart, config: web::Data<Config>) -> impl Responder {
    match parse_upload(payload, &config).await {
        Ok(result) => import_response(result),
        Err(e) => e.error_response(),
    }
}

async fn parse_upload(
    payload: Multipart,
    config: &Config,
) -> Result<Result<ImportOutcome, ImportError>, ServiceError> {
    let upload = read_upload(payload, config.max_upload_bytes()).await?;
    let settings = config.import_settings();
    with_store(config, move |conn| {
        Ok(import_file(&mut UnitOfWork::new(conn), &upload, &settings))
    })
    .await
}
