use common::model::enqueteur::{Enqueteur, NewEnqueteur};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::now;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Enqueteur> {
    Ok(Enqueteur {
        id: row.get("id")?,
        nom: row.get("nom")?,
        prenom: row.get("prenom")?,
        email: row.get("email")?,
        telephone: row.get("telephone")?,
        date_creation: row.get("date_creation")?,
    })
}

/// All investigators, sorted by name.
pub fn list(conn: &Connection) -> rusqlite::Result<Vec<Enqueteur>> {
    let mut stmt = conn.prepare(
        "SELECT id, nom, prenom, email, telephone, date_creation
         FROM enqueteurs ORDER BY nom, prenom, id",
    )?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

pub fn find(conn: &Connection, id: i64) -> rusqlite::Result<Option<Enqueteur>> {
    conn.query_row(
        "SELECT id, nom, prenom, email, telephone, date_creation FROM enqueteurs WHERE id = ?1",
        [id],
        from_row,
    )
    .optional()
}

/// Stores a new investigator. A reused email fails with a UNIQUE violation.
pub fn insert(conn: &Connection, new: &NewEnqueteur) -> rusqlite::Result<Enqueteur> {
    let date_creation = now();
    conn.execute(
        "INSERT INTO enqueteurs (nom, prenom, email, telephone, date_creation)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![new.nom, new.prenom, new.email, new.telephone, date_creation],
    )?;
    Ok(Enqueteur {
        id: conn.last_insert_rowid(),
        nom: new.nom.clone(),
        prenom: new.prenom.clone(),
        email: new.email.clone(),
        telephone: new.telephone.clone(),
        date_creation,
    })
}

/// Unassigns the investigator's dossiers, then deletes it.
/// Returns false when no such investigator exists.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.execute(
        "UPDATE donnees SET enqueteur_id = NULL, updated_at = ?1 WHERE enqueteur_id = ?2",
        params![now(), id],
    )?;
    Ok(conn.execute("DELETE FROM enqueteurs WHERE id = ?1", [id])? > 0)
}
