use common::model::fichier::{ExistingFileInfo, Fichier};
use rusqlite::Connection;

use crate::store::fichiers;

/// Fast-path duplicate check run before anything is written.
///
/// The UNIQUE index on `fichiers.nom` stays the authority; a name that slips
/// past this check is caught again at registration.
pub(super) fn find_existing(
    conn: &Connection,
    file_name: &str,
) -> rusqlite::Result<Option<ExistingFileInfo>> {
    fichiers::existing_info(conn, file_name)
}

/// Deletes the file registered under `file_name` together with its dossiers.
/// Returns the evicted row so its artifact can be removed after commit.
pub(super) fn evict(conn: &Connection, file_name: &str) -> rusqlite::Result<Option<Fichier>> {
    match fichiers::find_by_name(conn, file_name)? {
        Some(existing) => fichiers::delete_cascade(conn, existing.id),
        None => Ok(None),
    }
}
