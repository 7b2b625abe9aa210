use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use common::imports::{ImportResponse, ImportStatus};
use common::model::stats::Stats;
use tempfile::TempDir;

use super::configure_routes;
use crate::config::Config;
use crate::fixed_width::fixtures::dossier_line;
use crate::fixed_width::schema::field;
use crate::services::testing::config_in;

const BOUNDARY: &str = "eos-test-boundary";

fn multipart_body(file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, file_name: &str, content: &[u8]) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(file_name, content))
}

fn content(case_numbers: &[&str]) -> Vec<u8> {
    case_numbers
        .iter()
        .map(|numero| dossier_line(&[(field::NUMERO_DOSSIER, numero), (field::NOM, "DUPONT")]))
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}

#[actix_web::test]
async fn parse_then_duplicate_then_replace() {
    let dir = TempDir::new().unwrap();
    let config: Config = config_in(&dir);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .service(configure_routes()),
    )
    .await;

    let req = upload_request("/api/files/parse", "lot.ost", &content(&["D1", "D2", ""])).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ImportResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, ImportStatus::Ok);
    assert_eq!(body.records_processed, Some(2));

    let req = upload_request("/api/files/parse", "lot.ost", &content(&["D3"])).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: ImportResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, ImportStatus::Exists);
    assert_eq!(body.existing_file_info.unwrap().nombre_donnees, 2);

    let req = upload_request("/api/files/replace", "lot.ost", &content(&["D3"])).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: ImportResponse = test::read_body_json(resp).await;
    assert_eq!(replaced.records_processed, Some(1));

    let req = test::TestRequest::get().uri("/api/files/stats").to_request();
    let stats: Stats = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats.total_fichiers, 1);
    assert_eq!(stats.total_donnees, 1);

    let file_id = replaced.file_id.unwrap();
    let req = test::TestRequest::delete()
        .uri(&format!("/api/files/{file_id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::delete()
        .uri(&format!("/api/files/{file_id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn bad_uploads_are_rejected() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        max_upload_mb: 1,
        ..config_in(&dir)
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .service(configure_routes()),
    )
    .await;

    let req = upload_request("/api/files/parse", "lot.pdf", &content(&["D1"])).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ImportResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, ImportStatus::Error);

    let req = upload_request("/api/files/parse", "vide.ost", &content(&[""])).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ImportResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "no valid record found in file");
    assert_eq!(body.line_errors, vec!["Line 1: missing case number".to_string()]);

    let oversized = vec![b'x'; 1024 * 1024 + 1];
    let req = upload_request("/api/files/parse", "gros.ost", &oversized).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}
