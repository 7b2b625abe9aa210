//! Deletion of an investigator (`DELETE /api/enqueteurs/{id}`). Dossiers assigned
//! to them are unassigned in the same transaction.

use actix_web::{web, HttpResponse, Responder, ResponseError};
use log::info;
use serde_json::json;

use crate::config::Config;
use crate::services::{with_store, ServiceError};
use crate::store::enqueteurs;

pub(crate) async fn process(id: web::Path<i64>, config: web::Data<Config>) -> impl Responder {
    let id = id.into_inner();
    match delete_enqueteur(id, &config).await {
        Ok(()) => {
            HttpResponse::Ok().json(json!({ "message": format!("Investigator {} deleted", id) }))
        }
        Err(e) => e.error_response(),
    }
}

async fn delete_enqueteur(id: i64, config: &Config) -> Result<(), ServiceError> {
    with_store(config, move |conn| {
        let tx = conn.transaction()?;
        if !enqueteurs::delete(&tx, id)? {
            return Err(ServiceError::NotFound(format!("investigator {} not found", id)));
        }
        tx.commit()?;
        info!("Deleted investigator {}", id);
        Ok(())
    })
    .await
}
