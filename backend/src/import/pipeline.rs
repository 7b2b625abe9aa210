use common::model::fichier::ExistingFileInfo;
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::content::{content_lines, decode_text};
use super::error::{ImportError, LineError};
use super::{artifact, guard};
use crate::fixed_width::{decode_line, normalize, ValueMode, DOSSIER_LAYOUT};
use crate::store::{donnees, enquete, fichiers, is_unique_violation, UnitOfWork};

/// Knobs of the import pipeline, usually taken from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub upload_dir: PathBuf,
    /// Successful records between two commits.
    pub batch_size: usize,
    pub value_mode: ValueMode,
    /// Lower-case extensions accepted for uploads. Empty accepts anything.
    pub allowed_extensions: Vec<String>,
}

/// An uploaded file as received from the transport.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A completed import. Lines that produced no record are listed in `line_errors`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub fichier_id: i64,
    pub records_processed: usize,
    pub line_errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported(ImportReport),
    /// The name is already taken; nothing was written.
    AlreadyExists(ExistingFileInfo),
}

struct Registered {
    fichier_id: i64,
    artifact: PathBuf,
}

/// Imports `upload` as a new file.
///
/// Files are keyed by their sanitised name, so `../lot.ost` and `lot.ost` are
/// the same file. A name that is already registered short-circuits with
/// [`ImportOutcome::AlreadyExists`] before the content is looked at.
pub fn import_file(
    uow: &mut UnitOfWork<'_>,
    upload: &Upload,
    settings: &ImportSettings,
) -> Result<ImportOutcome, ImportError> {
    check_name(&upload.file_name, &settings.allowed_extensions)?;
    let nom = artifact::sanitize(&upload.file_name);

    if let Some(existing) = guard::find_existing(uow.conn(), &nom)? {
        info!(
            "File '{}' already imported with {} records",
            existing.nom, existing.nombre_donnees
        );
        return Ok(ImportOutcome::AlreadyExists(existing));
    }
    if upload.bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let registered = match register(uow, &nom, &upload.bytes, settings) {
        Ok(registered) => registered,
        Err(ImportError::ConcurrentImport { file_name }) => return lost_race(uow, file_name),
        Err(err) => return Err(err),
    };

    ingest(uow, &nom, &upload.bytes, settings, registered).map(ImportOutcome::Imported)
}

/// Imports `upload`, first deleting any file already registered under its
/// name along with that file's dossiers, annotations and stored upload.
pub fn replace_file(
    uow: &mut UnitOfWork<'_>,
    upload: &Upload,
    settings: &ImportSettings,
) -> Result<ImportReport, ImportError> {
    check_name(&upload.file_name, &settings.allowed_extensions)?;
    if upload.bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }
    let nom = artifact::sanitize(&upload.file_name);

    uow.begin()?;
    let evicted = match guard::evict(uow.conn(), &nom) {
        Ok(evicted) => evicted,
        Err(err) => {
            rollback(uow);
            return Err(err.into());
        }
    };
    let registered = register(uow, &nom, &upload.bytes, settings)?;

    if let Some(old) = evicted {
        info!("Replaced file '{}' (previous id {})", old.nom, old.id);
        if let Some(chemin) = old.chemin.as_deref() {
            artifact::remove(Path::new(chemin));
        }
    }

    ingest(uow, &nom, &upload.bytes, settings, registered)
}

fn check_name(file_name: &str, allowed_extensions: &[String]) -> Result<(), ImportError> {
    if file_name.trim().is_empty() {
        return Err(ImportError::MissingFileName);
    }
    if allowed_extensions.is_empty() {
        return Ok(());
    }
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if allowed_extensions.iter().any(|allowed| *allowed == extension) {
        Ok(())
    } else {
        Err(ImportError::DisallowedExtension {
            file_name: file_name.to_string(),
        })
    }
}

/// Stores the upload on disk and commits its `fichiers` row, together with
/// whatever the open transaction already holds.
fn register(
    uow: &mut UnitOfWork<'_>,
    nom: &str,
    bytes: &[u8],
    settings: &ImportSettings,
) -> Result<Registered, ImportError> {
    let artifact = match artifact::store(&settings.upload_dir, nom, bytes) {
        Ok(path) => path,
        Err(err) => {
            rollback(uow);
            return Err(err.into());
        }
    };
    let chemin = artifact.to_string_lossy().into_owned();

    let committed = uow
        .begin()
        .and_then(|()| fichiers::insert(uow.conn(), nom, Some(&chemin)));
    let committed = match committed {
        Ok(fichier_id) => uow.commit().map(|()| fichier_id),
        Err(err) => Err(err),
    };

    match committed {
        Ok(fichier_id) => {
            info!("Registered file '{}' with id {}", nom, fichier_id);
            Ok(Registered {
                fichier_id,
                artifact,
            })
        }
        Err(err) => {
            rollback(uow);
            artifact::remove(&artifact);
            if is_unique_violation(&err) {
                warn!("File '{}' was registered concurrently", nom);
                Err(ImportError::ConcurrentImport {
                    file_name: nom.to_string(),
                })
            } else {
                Err(err.into())
            }
        }
    }
}

/// Settles an import whose registration lost to a concurrent one: the winner
/// is reported as the existing file.
fn lost_race(uow: &mut UnitOfWork<'_>, file_name: String) -> Result<ImportOutcome, ImportError> {
    match guard::find_existing(uow.conn(), &file_name)? {
        Some(existing) => {
            info!(
                "File '{}' was imported concurrently with {} records",
                existing.nom, existing.nombre_donnees
            );
            Ok(ImportOutcome::AlreadyExists(existing))
        }
        None => Err(ImportError::ConcurrentImport { file_name }),
    }
}

/// Runs the lines of a registered file through the pipeline and settles the
/// outcome: the file is kept when at least one record was stored.
fn ingest(
    uow: &mut UnitOfWork<'_>,
    nom: &str,
    bytes: &[u8],
    settings: &ImportSettings,
    registered: Registered,
) -> Result<ImportReport, ImportError> {
    let text = decode_text(bytes);
    let lines = content_lines(&text);
    info!(
        "Processing {} lines of '{}' (file id {})",
        lines.len(),
        nom,
        registered.fichier_id
    );

    match process_lines(uow, registered.fichier_id, &lines, settings) {
        Ok((0, line_errors)) => {
            error!(
                "No valid record in '{}' ({} rejected lines)",
                nom,
                line_errors.len()
            );
            discard(uow, &registered);
            Err(ImportError::NoValidRecord { line_errors })
        }
        Ok((records_processed, line_errors)) => {
            info!(
                "Imported {} records from '{}', {} lines rejected",
                records_processed,
                nom,
                line_errors.len()
            );
            Ok(ImportReport {
                fichier_id: registered.fichier_id,
                records_processed,
                line_errors,
            })
        }
        Err(err) => {
            error!("Import of '{}' failed: {}", nom, err);
            rollback(uow);
            discard(uow, &registered);
            Err(err)
        }
    }
}

fn process_lines(
    uow: &mut UnitOfWork<'_>,
    fichier_id: i64,
    lines: &[&str],
    settings: &ImportSettings,
) -> Result<(usize, Vec<String>), ImportError> {
    let batch_size = settings.batch_size.max(1);
    let mut processed = 0;
    let mut line_errors = Vec::new();

    uow.begin()?;
    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let stored = uow.savepoint("dossier_line", |conn| {
            store_line(conn, fichier_id, line, settings.value_mode)
        });
        match stored {
            Ok(_) => {
                processed += 1;
                if processed % batch_size == 0 {
                    uow.checkpoint()?;
                    info!("Committed {} records for file id {}", processed, fichier_id);
                }
            }
            Err(err) if !uow.is_open() => {
                error!("Line {} aborted the transaction: {}", line_number, err);
                return Err(ImportError::Aborted {
                    line_number,
                    source: err,
                });
            }
            Err(err) => {
                let message = format!("Line {}: {}", line_number, err);
                warn!("{}", message);
                line_errors.push(message);
            }
        }
    }
    uow.commit()?;

    Ok((processed, line_errors))
}

/// Stores one dossier and its blank annotation.
fn store_line(
    conn: &Connection,
    fichier_id: i64,
    line: &str,
    mode: ValueMode,
) -> Result<i64, LineError> {
    let raw = decode_line(line, DOSSIER_LAYOUT).ok_or(LineError::Blank)?;
    let fields = normalize(&raw, mode)?;
    let donnee_id = donnees::insert(conn, fichier_id, &fields)?;
    enquete::insert_blank(conn, donnee_id)?;
    Ok(donnee_id)
}

/// Best-effort removal of a registered file that must not survive.
fn discard(uow: &mut UnitOfWork<'_>, registered: &Registered) {
    let deleted = uow
        .begin()
        .and_then(|()| fichiers::delete_cascade(uow.conn(), registered.fichier_id))
        .and_then(|_| uow.commit());
    match deleted {
        Ok(()) => info!("Removed file id {}", registered.fichier_id),
        Err(err) => {
            rollback(uow);
            error!(
                "Could not remove file id {}: {}",
                registered.fichier_id, err
            );
        }
    }
    artifact::remove(&registered.artifact);
}

fn rollback(uow: &mut UnitOfWork<'_>) {
    if let Err(err) = uow.rollback() {
        error!("Rollback failed: {}", err);
    }
}
