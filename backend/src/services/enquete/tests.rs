use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::model::donnee::DossierFields;
use common::model::enquete::DonneeEnqueteur;
use serde_json::json;
use tempfile::TempDir;

use super::configure_routes;
use crate::services::testing::config_in;
use crate::store::{self, donnees, fichiers};

#[actix_web::test]
async fn patch_creates_then_updates_the_annotation() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let record = {
        let conn = store::open(&config.database).unwrap();
        let fichier = fichiers::insert(&conn, "lot.ost", None).unwrap();
        let fields = DossierFields {
            numero_dossier: "D1".to_string(),
            ..Default::default()
        };
        donnees::insert(&conn, fichier, &fields).unwrap()
    };

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .service(configure_routes()),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/donnees-enqueteur/{record}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/donnees-enqueteur/{record}"))
        .set_json(json!({ "code_resultat": "P", "montant_facture": 42.5, "memo1": "note" }))
        .to_request();
    let created: DonneeEnqueteur = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created.donnee_id, record);
    assert_eq!(created.fields.code_resultat.as_deref(), Some("P"));

    let req = test::TestRequest::post()
        .uri(&format!("/api/donnees-enqueteur/{record}"))
        .set_json(json!({ "memo1": null }))
        .to_request();
    let updated: DonneeEnqueteur = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.fields.memo1, None);
    assert_eq!(updated.fields.montant_facture, Some(42.5));

    let req = test::TestRequest::get()
        .uri(&format!("/api/donnees-enqueteur/{record}"))
        .to_request();
    let fetched: DonneeEnqueteur = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.fields, updated.fields);

    let req = test::TestRequest::post()
        .uri("/api/donnees-enqueteur/999")
        .set_json(json!({ "memo1": "x" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
