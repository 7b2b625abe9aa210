//! # Investigator Assignment Service
//!
//! Backend logic for `POST /api/donnees/assign`. The dossier is looked up by its
//! case number; when a number was imported more than once, the earliest dossier
//! is assigned. A null `enqueteurId` clears the assignment.

use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::donnee::Donnee;
use common::requests::AssignRequest;
use log::info;

use crate::config::Config;
use crate::services::{with_store, ServiceError};
use crate::store::{donnees, enqueteurs};

/// Actix web handler for the `POST /api/donnees/assign` endpoint.
///
/// # Arguments
/// * `payload` - The case number (`enqueteId`) and the investigator id, or null.
///
/// # Returns
/// - `200 OK` with the updated dossier.
/// - `404 Not Found` if the case number or the investigator is unknown.
pub(crate) async fn process(
    payload: web::Json<AssignRequest>,
    config: web::Data<Config>,
) -> impl Responder {
    match assign(payload.into_inner(), &config).await {
        Ok(donnee) => HttpResponse::Ok().json(donnee),
        Err(e) => e.error_response(),
    }
}

async fn assign(request: AssignRequest, config: &Config) -> Result<Donnee, ServiceError> {
    with_store(config, move |conn| {
        let tx = conn.transaction()?;
        if let Some(enqueteur_id) = request.enqueteur_id {
            if enqueteurs::find(&tx, enqueteur_id)?.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "investigator {} not found",
                    enqueteur_id
                )));
            }
        }
        let id = donnees::assign_enqueteur(&tx, &request.enquete_id, request.enqueteur_id)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("no record with case number {}", request.enquete_id))
            })?;
        let donnee = donnees::find(&tx, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;

        info!(
            "Record {} ({}) assigned to {:?}",
            id, request.enquete_id, request.enqueteur_id
        );
        Ok(donnee)
    })
    .await
}
