//! Lists every investigator (`GET /api/enqueteurs`).

use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::config::Config;
use crate::services::with_store;
use crate::store::enqueteurs;

pub(crate) async fn process(config: web::Data<Config>) -> impl Responder {
    match with_store(&config, |conn| Ok(enqueteurs::list(conn)?)).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => e.error_response(),
    }
}
