use common::model::fichier::{ExistingFileInfo, Fichier};
use common::model::stats::{FileStats, Stats};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Fichier> {
    Ok(Fichier {
        id: row.get("id")?,
        nom: row.get("nom")?,
        date_upload: row.get("date_upload")?,
        chemin: row.get("chemin")?,
    })
}

/// Registers a file. Fails with a UNIQUE violation when `nom` is taken.
pub fn insert(conn: &Connection, nom: &str, chemin: Option<&str>) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO fichiers (nom, date_upload, chemin) VALUES (?1, ?2, ?3)",
        params![nom, now(), chemin],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> rusqlite::Result<Option<Fichier>> {
    conn.query_row(
        "SELECT id, nom, date_upload, chemin FROM fichiers WHERE id = ?1",
        [id],
        from_row,
    )
    .optional()
}

pub fn find_by_name(conn: &Connection, nom: &str) -> rusqlite::Result<Option<Fichier>> {
    conn.query_row(
        "SELECT id, nom, date_upload, chemin FROM fichiers WHERE nom = ?1",
        [nom],
        from_row,
    )
    .optional()
}

pub fn count_donnees(conn: &Connection, fichier_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM donnees WHERE fichier_id = ?1",
        [fichier_id],
        |row| row.get(0),
    )
}

/// Summary of the file already registered under `nom`, if any.
pub fn existing_info(conn: &Connection, nom: &str) -> rusqlite::Result<Option<ExistingFileInfo>> {
    let Some(fichier) = find_by_name(conn, nom)? else {
        return Ok(None);
    };
    let nombre_donnees = count_donnees(conn, fichier.id)?;
    Ok(Some(ExistingFileInfo {
        nom: fichier.nom,
        date_upload: fichier.date_upload,
        nombre_donnees,
    }))
}

/// Deletes a file with its dossiers and their annotations.
///
/// Returns the deleted row, or `None` when there was nothing to delete. Must run
/// inside the caller's transaction for the three deletes to be atomic.
pub fn delete_cascade(conn: &Connection, id: i64) -> rusqlite::Result<Option<Fichier>> {
    let Some(fichier) = find(conn, id)? else {
        return Ok(None);
    };
    conn.execute(
        "DELETE FROM donnees_enqueteur
         WHERE donnee_id IN (SELECT id FROM donnees WHERE fichier_id = ?1)",
        [id],
    )?;
    conn.execute("DELETE FROM donnees WHERE fichier_id = ?1", [id])?;
    conn.execute("DELETE FROM fichiers WHERE id = ?1", [id])?;
    Ok(Some(fichier))
}

/// Every file with its dossier count, newest upload first.
pub fn list_with_counts(conn: &Connection) -> rusqlite::Result<Vec<FileStats>> {
    let mut stmt = conn.prepare(
        "SELECT f.id, f.nom, f.date_upload, COUNT(d.id) AS nombre_donnees
         FROM fichiers f
         LEFT JOIN donnees d ON d.fichier_id = f.id
         GROUP BY f.id
         ORDER BY f.date_upload DESC, f.id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(FileStats {
            id: row.get("id")?,
            nom: row.get("nom")?,
            date_upload: row.get("date_upload")?,
            nombre_donnees: row.get("nombre_donnees")?,
        })
    })?;
    rows.collect()
}

pub fn stats(conn: &Connection) -> rusqlite::Result<Stats> {
    let total_fichiers = conn.query_row("SELECT COUNT(*) FROM fichiers", [], |row| row.get(0))?;
    let total_donnees = conn.query_row("SELECT COUNT(*) FROM donnees", [], |row| row.get(0))?;
    Ok(Stats {
        total_fichiers,
        total_donnees,
        derniers_fichiers: list_with_counts(conn)?,
    })
}
