//! # Investigator Creation Service
//!
//! Backend logic for `POST /api/enqueteurs`. Names and email are trimmed, the
//! email is lower-cased and checked against a simple address pattern, and the
//! UNIQUE index on `email` rejects a second investigator with the same address.

use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::enqueteur::{Enqueteur, NewEnqueteur};
use log::info;
use regex::Regex;

use crate::config::Config;
use crate::services::{with_store, ServiceError};
use crate::store::{enqueteurs, is_unique_violation};

/// Actix web handler for the `POST /api/enqueteurs` endpoint.
///
/// # Arguments
/// * `payload` - The new investigator's names, email and optional phone number.
///
/// # Returns
/// - `201 Created` with the stored investigator.
/// - `400 Bad Request` for a missing name or a malformed email.
/// - `409 Conflict` if the email is already used.
pub(crate) async fn process(
    payload: web::Json<NewEnqueteur>,
    config: web::Data<Config>,
) -> impl Responder {
    match create_enqueteur(payload.into_inner(), &config).await {
        Ok(enqueteur) => HttpResponse::Created().json(enqueteur),
        Err(e) => e.error_response(),
    }
}

/// Trims the payload and checks the mandatory fields and the email shape.
fn validate(new: NewEnqueteur) -> Result<NewEnqueteur, ServiceError> {
    let new = NewEnqueteur {
        nom: new.nom.trim().to_string(),
        prenom: new.prenom.trim().to_string(),
        email: new.email.trim().to_lowercase(),
        telephone: new
            .telephone
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
    };
    if new.nom.is_empty() || new.prenom.is_empty() {
        return Err(ServiceError::BadRequest(
            "nom and prenom are required".to_string(),
        ));
    }

    let email_re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map_err(|e| ServiceError::Internal(format!("Regex error: {}", e)))?;
    if !email_re.is_match(&new.email) {
        return Err(ServiceError::BadRequest(format!(
            "invalid email address: {}",
            new.email
        )));
    }
    Ok(new)
}

async fn create_enqueteur(new: NewEnqueteur, config: &Config) -> Result<Enqueteur, ServiceError> {
    let new = validate(new)?;
    with_store(config, move |conn| match enqueteurs::insert(conn, &new) {
        Ok(enqueteur) => {
            info!("Created investigator {} ({})", enqueteur.id, enqueteur.email);
            Ok(enqueteur)
        }
        Err(err) if is_unique_violation(&err) => Err(ServiceError::Conflict(format!(
            "email {} is already used",
            new.email
        ))),
        Err(err) => Err(err.into()),
    })
    .await
}
