use std::fs;

use rusqlite::Connection;
use tempfile::TempDir;

use super::*;
use crate::fixed_width::fixtures::dossier_line;
use crate::fixed_width::schema::field;
use crate::fixed_width::ValueMode;
use crate::store::{donnees, fichiers, open_in_memory, UnitOfWork};
use common::requests::DonneeQuery;

fn settings(dir: &TempDir) -> ImportSettings {
    ImportSettings {
        upload_dir: dir.path().join("uploads"),
        batch_size: 100,
        value_mode: ValueMode::Lenient,
        allowed_extensions: vec!["ost".to_string(), "txt".to_string()],
    }
}

fn dossier(numero: &str, nom: &str) -> String {
    dossier_line(&[
        (field::NUMERO_DOSSIER, numero),
        (field::NOM, nom),
        (field::DATE_NAISSANCE, "05/03/1980"),
        (field::VILLE, "PARIS"),
    ])
}

fn without_case_number(nom: &str) -> String {
    dossier_line(&[(field::NOM, nom), (field::VILLE, "PARIS")])
}

fn upload(file_name: &str, lines: &[String]) -> Upload {
    Upload {
        file_name: file_name.to_string(),
        bytes: lines.join("\r\n").into_bytes(),
    }
}

fn import(
    conn: &Connection,
    upload: &Upload,
    settings: &ImportSettings,
) -> Result<ImportOutcome, ImportError> {
    import_file(&mut UnitOfWork::new(conn), upload, settings)
}

fn imported(outcome: ImportOutcome) -> ImportReport {
    match outcome {
        ImportOutcome::Imported(report) => report,
        other => panic!("expected an import, got {:?}", other),
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

fn stored_uploads(settings: &ImportSettings) -> usize {
    match fs::read_dir(&settings.upload_dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[test]
fn malformed_line_is_reported_and_the_rest_imported() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let lines = vec![
        dossier("D000000001", "MARTIN"),
        dossier("D000000002", "BERNARD"),
        without_case_number("ORPHELIN"),
        dossier("D000000003", "PETIT"),
    ];

    let report = imported(import(&conn, &upload("lot.ost", &lines), &settings).unwrap());

    assert_eq!(report.records_processed, 3);
    assert_eq!(report.line_errors, vec!["Line 3: missing case number".to_string()]);
    let fichier = fichiers::find_by_name(&conn, "lot.ost").unwrap().unwrap();
    assert_eq!(fichier.id, report.fichier_id);
    assert_eq!(fichiers::count_donnees(&conn, fichier.id).unwrap(), 3);
    assert_eq!(stored_uploads(&settings), 1);
    let chemin = fichier.chemin.unwrap();
    assert_eq!(fs::read(&chemin).unwrap(), upload("lot.ost", &lines).bytes);

    let stored = donnees::list(&conn, &DonneeQuery::default()).unwrap();
    let noms: Vec<&str> = stored.iter().map(|d| d.fields.nom.as_str()).collect();
    assert_eq!(noms, vec!["MARTIN", "BERNARD", "PETIT"]);
    assert_eq!(stored[0].fields.ville, "PARIS");
    assert_eq!(
        stored[0].fields.date_naissance,
        chrono::NaiveDate::from_ymd_opt(1980, 3, 5)
    );
}

#[test]
fn file_without_any_valid_line_leaves_no_trace() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let lines = vec![without_case_number("A"), without_case_number("B")];

    let err = import(&conn, &upload("vide.ost", &lines), &settings).unwrap_err();

    match &err {
        ImportError::NoValidRecord { line_errors } => assert_eq!(line_errors.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_input_error());
    assert!(fichiers::find_by_name(&conn, "vide.ost").unwrap().is_none());
    assert_eq!(count(&conn, "fichiers"), 0);
    assert_eq!(count(&conn, "donnees"), 0);
    assert_eq!(stored_uploads(&settings), 0);
    assert!(conn.is_autocommit());
}

#[test]
fn duplicate_name_is_reported_and_nothing_changes() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let first = vec![dossier("D1", "MARTIN"), dossier("D2", "BERNARD")];
    imported(import(&conn, &upload("lot.ost", &first), &settings).unwrap());

    let second = vec![dossier("D9", "AUTRE")];
    let outcome = import(&conn, &upload("lot.ost", &second), &settings).unwrap();

    match outcome {
        ImportOutcome::AlreadyExists(info) => {
            assert_eq!(info.nom, "lot.ost");
            assert_eq!(info.nombre_donnees, 2);
        }
        other => panic!("expected a duplicate, got {other:?}"),
    }
    assert_eq!(count(&conn, "fichiers"), 1);
    assert_eq!(count(&conn, "donnees"), 2);
    assert_eq!(stored_uploads(&settings), 1);
}

#[test]
fn replace_swaps_the_previous_records() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let first = vec![dossier("D1", "A"), dossier("D2", "B"), dossier("D3", "C")];
    let old = imported(import(&conn, &upload("lot.ost", &first), &settings).unwrap());

    let second = vec![dossier("D4", "D"), without_case_number("E"), dossier("D5", "F")];
    let report = replace_file(
        &mut UnitOfWork::new(&conn),
        &upload("lot.ost", &second),
        &settings,
    )
    .unwrap();

    assert_eq!(report.records_processed, 2);
    assert_eq!(report.line_errors.len(), 1);
    assert_ne!(report.fichier_id, old.fichier_id);
    assert!(fichiers::find(&conn, old.fichier_id).unwrap().is_none());
    assert_eq!(fichiers::count_donnees(&conn, report.fichier_id).unwrap(), 2);
    assert_eq!(count(&conn, "donnees"), 2);
    assert_eq!(count(&conn, "donnees_enqueteur"), 2);
    assert_eq!(stored_uploads(&settings), 1);
}

#[test]
fn replace_of_an_unknown_name_imports_it() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);

    let report = replace_file(
        &mut UnitOfWork::new(&conn),
        &upload("nouveau.ost", &[dossier("D1", "A")]),
        &settings,
    )
    .unwrap();

    assert_eq!(report.records_processed, 1);
}

#[test]
fn replace_with_an_empty_upload_keeps_the_original() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    imported(import(&conn, &upload("lot.ost", &[dossier("D1", "A")]), &settings).unwrap());

    let empty = Upload {
        file_name: "lot.ost".to_string(),
        bytes: Vec::new(),
    };
    let err = replace_file(&mut UnitOfWork::new(&conn), &empty, &settings).unwrap_err();

    assert!(matches!(err, ImportError::EmptyFile));
    assert_eq!(count(&conn, "donnees"), 1);
    assert_eq!(stored_uploads(&settings), 1);
}

#[test]
fn every_record_gets_exactly_one_annotation() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let lines: Vec<String> = (1..=7)
        .map(|i| dossier(&format!("D{i:09}"), "NOM"))
        .collect();
    imported(import(&conn, &upload("lot.ost", &lines), &settings).unwrap());

    let unannotated: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM donnees d
             LEFT JOIN donnees_enqueteur a ON a.donnee_id = d.id
             WHERE a.id IS NULL",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(unannotated, 0);
    assert_eq!(count(&conn, "donnees"), 7);
    assert_eq!(count(&conn, "donnees_enqueteur"), 7);
}

#[test]
fn commits_in_batches_and_leaves_no_open_transaction() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&dir);
    settings.batch_size = 2;
    let lines: Vec<String> = (1..=5).map(|i| dossier(&format!("D{i}"), "NOM")).collect();

    let report = imported(import(&conn, &upload("lot.ost", &lines), &settings).unwrap());

    assert_eq!(report.records_processed, 5);
    assert!(conn.is_autocommit());
    assert_eq!(count(&conn, "donnees"), 5);
}

#[test]
fn store_failure_mid_import_removes_the_file_and_its_committed_batches() {
    let conn = open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE purged (numero TEXT);
         CREATE TRIGGER record_purge AFTER DELETE ON donnees
         BEGIN INSERT INTO purged VALUES (OLD.numero_dossier); END;
         CREATE TRIGGER abort_on_boom AFTER INSERT ON donnees
         WHEN NEW.numero_dossier = 'BOOM'
         BEGIN SELECT RAISE(ROLLBACK, 'disk gone'); END;",
    )
    .unwrap();
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&dir);
    settings.batch_size = 2;
    let lines = vec![
        dossier("D1", "A"),
        dossier("D2", "B"),
        dossier("BOOM", "C"),
        dossier("D4", "D"),
    ];

    let err = import(&conn, &upload("lot.ost", &lines), &settings).unwrap_err();

    match &err {
        ImportError::Aborted { line_number, .. } => assert_eq!(*line_number, 3),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("disk gone"), "{err}");
    assert!(!err.is_input_error());
    assert!(conn.is_autocommit());
    assert_eq!(count(&conn, "fichiers"), 0);
    assert_eq!(count(&conn, "donnees"), 0);
    assert_eq!(count(&conn, "donnees_enqueteur"), 0);
    assert_eq!(stored_uploads(&settings), 0);

    // The first batch was committed before line 3 and only removed by the cleanup.
    let mut stmt = conn.prepare("SELECT numero FROM purged ORDER BY numero").unwrap();
    let purged: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(purged, vec!["D1".to_string(), "D2".to_string()]);
}

#[test]
fn replace_losing_the_name_to_another_import_keeps_the_original() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let first = vec![dossier("D1", "A"), dossier("D2", "B")];
    let old = imported(import(&conn, &upload("lot.ost", &first), &settings).unwrap());
    // Another import takes the name as soon as the old file is evicted.
    conn.execute_batch(
        "CREATE TRIGGER take_name AFTER DELETE ON fichiers
         BEGIN INSERT INTO fichiers (nom, date_upload)
         VALUES (OLD.nom, '2024-01-01 00:00:00'); END;",
    )
    .unwrap();

    let err = replace_file(
        &mut UnitOfWork::new(&conn),
        &upload("lot.ost", &[dossier("D9", "Z")]),
        &settings,
    )
    .unwrap_err();

    match &err {
        ImportError::ConcurrentImport { file_name } => assert_eq!(file_name, "lot.ost"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(conn.is_autocommit());
    let kept = fichiers::find_by_name(&conn, "lot.ost").unwrap().unwrap();
    assert_eq!(kept.id, old.fichier_id);
    assert_eq!(count(&conn, "fichiers"), 1);
    assert_eq!(count(&conn, "donnees"), 2);
    assert_eq!(count(&conn, "donnees_enqueteur"), 2);
    assert_eq!(stored_uploads(&settings), 1);
    assert!(fs::metadata(kept.chemin.unwrap()).is_ok());
}

#[test]
fn files_are_keyed_by_their_sanitised_name() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    imported(import(&conn, &upload("lot.ost", &[dossier("D1", "A")]), &settings).unwrap());

    let outcome = import(&conn, &upload("../lot.ost", &[dossier("D2", "B")]), &settings).unwrap();
    match outcome {
        ImportOutcome::AlreadyExists(info) => assert_eq!(info.nom, "lot.ost"),
        other => panic!("expected a duplicate, got {other:?}"),
    }

    let report = imported(
        import(
            &conn,
            &upload("C:\\exports\\lot janvier.ost", &[dossier("D3", "C")]),
            &settings,
        )
        .unwrap(),
    );
    let stored = fichiers::find(&conn, report.fichier_id).unwrap().unwrap();
    assert_eq!(stored.nom, "lot_janvier.ost");
    assert_eq!(count(&conn, "fichiers"), 2);
    assert_eq!(stored_uploads(&settings), 2);
}

#[test]
fn input_errors_are_raised_before_anything_is_written() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);

    let empty = Upload {
        file_name: "lot.ost".to_string(),
        bytes: Vec::new(),
    };
    assert!(matches!(import(&conn, &empty, &settings), Err(ImportError::EmptyFile)));

    let unnamed = upload("  ", &[dossier("D1", "A")]);
    assert!(matches!(
        import(&conn, &unnamed, &settings),
        Err(ImportError::MissingFileName)
    ));

    let wrong_kind = upload("lot.csv", &[dossier("D1", "A")]);
    let err = import(&conn, &wrong_kind, &settings).unwrap_err();
    assert!(matches!(err, ImportError::DisallowedExtension { .. }));
    assert!(err.is_input_error());

    let upper_case = upload("LOT.OST", &[dossier("D1", "A")]);
    imported(import(&conn, &upper_case, &settings).unwrap());

    assert_eq!(count(&conn, "fichiers"), 1);
    assert_eq!(stored_uploads(&settings), 1);
}

#[test]
fn strict_mode_rejects_unreadable_dates() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&dir);
    let bad_date = dossier_line(&[
        (field::NUMERO_DOSSIER, "D2"),
        (field::DATE_NAISSANCE, "31/02/2024"),
    ]);
    let lines = vec![dossier("D1", "A"), bad_date];

    let lenient = imported(import(&conn, &upload("lenient.ost", &lines), &settings).unwrap());
    assert_eq!(lenient.records_processed, 2);

    settings.value_mode = ValueMode::Strict;
    let strict = imported(import(&conn, &upload("strict.ost", &lines), &settings).unwrap());
    assert_eq!(strict.records_processed, 1);
    assert_eq!(
        strict.line_errors,
        vec!["Line 2: invalid date in dateNaissance: '31/02/2024'".to_string()]
    );
}

#[test]
fn latin1_upload_keeps_column_positions() {
    let conn = open_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let line = dossier("D1", "HÉLOÏSE");
    let bytes: Vec<u8> = line.chars().map(|c| c as u32 as u8).collect();
    let upload = Upload {
        file_name: "latin1.txt".to_string(),
        bytes,
    };

    imported(import(&conn, &upload, &settings).unwrap());

    let stored = donnees::list(&conn, &DonneeQuery::default()).unwrap();
    assert_eq!(stored[0].fields.nom, "HÉLOÏSE");
    assert_eq!(stored[0].fields.ville, "PARIS");
}
