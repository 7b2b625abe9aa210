use actix_multipart::Multipart;
use actix_web::HttpResponse;
use common::imports::ImportResponse;
use futures_util::StreamExt;
use log::{error, info};

use crate::import::{ImportError, ImportOutcome, ImportReport, Upload};
use crate::services::ServiceError;

/// Collects the `file` part of a multipart upload, refusing payloads larger
/// than `limit` bytes. Other parts are drained and ignored.
pub(super) async fn read_upload(
    mut payload: Multipart,
    limit: usize,
) -> Result<Upload, ServiceError> {
    let mut upload: Option<Upload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ServiceError::BadRequest(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ServiceError::BadRequest(e.to_string()))?;
            }
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ServiceError::BadRequest(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(ServiceError::BadRequest(format!(
                    "file exceeds the {} MB upload limit",
                    limit / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        info!("Received upload '{}' ({} bytes)", file_name, bytes.len());
        upload = Some(Upload { file_name, bytes });
    }

    upload.ok_or_else(|| ServiceError::BadRequest("no file was sent".to_string()))
}

pub(super) fn imported_response(report: ImportReport) -> HttpResponse {
    let message = format!("{} records imported", report.records_processed);
    HttpResponse::Ok().json(ImportResponse::ok(
        report.fichier_id,
        report.records_processed,
        report.line_errors,
        message,
    ))
}

/// Maps an import result onto the status codes callers rely on:
/// `200` imported, `409` name taken, `400` bad upload, `500` otherwise.
pub(super) fn import_response(result: Result<ImportOutcome, ImportError>) -> HttpResponse {
    match result {
        Ok(ImportOutcome::Imported(report)) => imported_response(report),
        Ok(ImportOutcome::AlreadyExists(info)) => {
            HttpResponse::Conflict().json(ImportResponse::exists(info))
        }
        Err(err) => {
            let body = ImportResponse::error(err.to_string(), err.line_errors().to_vec());
            if err.is_input_error() {
                HttpResponse::BadRequest().json(body)
            } else if matches!(err, ImportError::ConcurrentImport { .. }) {
                HttpResponse::Conflict().json(body)
            } else {
                error!("Import failed: {}", err);
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}
