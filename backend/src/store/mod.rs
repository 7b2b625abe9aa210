//! SQLite persistence for files, dossiers, annotations and investigators.
//!
//! Functions take a plain `&Connection` and never open transactions
//! themselves; callers wrap multi-statement work in a [`UnitOfWork`] or a
//! rusqlite transaction. Deletes that must cascade do so explicitly, table by
//! table, so the cascade is visible here rather than implied by the schema.

pub mod donnees;
pub mod enquete;
pub mod enqueteurs;
pub mod fichiers;
mod unit_of_work;

pub use unit_of_work::UnitOfWork;

use chrono::{NaiveDateTime, Utc};
use rusqlite::Connection;
use std::path::Path;

const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS fichiers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL,
    date_upload TEXT NOT NULL,
    chemin TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_fichiers_nom ON fichiers(nom);

CREATE TABLE IF NOT EXISTS enqueteurs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL,
    prenom TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    telephone TEXT,
    date_creation TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS donnees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fichier_id INTEGER NOT NULL REFERENCES fichiers(id),
    enqueteur_id INTEGER REFERENCES enqueteurs(id),
    numero_dossier TEXT NOT NULL CHECK (length(trim(numero_dossier)) > 0),
    reference_dossier TEXT NOT NULL DEFAULT '',
    numero_interlocuteur TEXT NOT NULL DEFAULT '',
    guid_interlocuteur TEXT NOT NULL DEFAULT '',
    type_demande TEXT NOT NULL DEFAULT '',
    numero_demande TEXT NOT NULL DEFAULT '',
    numero_demande_contestee TEXT NOT NULL DEFAULT '',
    numero_demande_initiale TEXT NOT NULL DEFAULT '',
    forfait_demande TEXT NOT NULL DEFAULT '',
    date_retour_espere TEXT,
    qualite TEXT NOT NULL DEFAULT '',
    nom TEXT NOT NULL DEFAULT '',
    prenom TEXT NOT NULL DEFAULT '',
    date_naissance TEXT,
    lieu_naissance TEXT NOT NULL DEFAULT '',
    code_postal_naissance TEXT NOT NULL DEFAULT '',
    pays_naissance TEXT NOT NULL DEFAULT '',
    nom_patronymique TEXT NOT NULL DEFAULT '',
    adresse1 TEXT NOT NULL DEFAULT '',
    adresse2 TEXT NOT NULL DEFAULT '',
    adresse3 TEXT NOT NULL DEFAULT '',
    adresse4 TEXT NOT NULL DEFAULT '',
    ville TEXT NOT NULL DEFAULT '',
    code_postal TEXT NOT NULL DEFAULT '',
    pays_residence TEXT NOT NULL DEFAULT '',
    telephone_personnel TEXT NOT NULL DEFAULT '',
    telephone_employeur TEXT NOT NULL DEFAULT '',
    telecopie_employeur TEXT NOT NULL DEFAULT '',
    nom_employeur TEXT NOT NULL DEFAULT '',
    banque_domiciliation TEXT NOT NULL DEFAULT '',
    libelle_guichet TEXT NOT NULL DEFAULT '',
    titulaire_compte TEXT NOT NULL DEFAULT '',
    code_banque TEXT NOT NULL DEFAULT '',
    code_guichet TEXT NOT NULL DEFAULT '',
    numero_compte TEXT NOT NULL DEFAULT '',
    rib_compte TEXT NOT NULL DEFAULT '',
    date_envoi TEXT,
    element_demandes TEXT NOT NULL DEFAULT '',
    element_obligatoires TEXT NOT NULL DEFAULT '',
    element_contestes TEXT NOT NULL DEFAULT '',
    code_motif TEXT NOT NULL DEFAULT '',
    motif_de_contestation TEXT NOT NULL DEFAULT '',
    cumul_montants_precedents REAL,
    code_societe TEXT NOT NULL DEFAULT '',
    urgence TEXT NOT NULL DEFAULT '',
    commentaire TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_donnees_fichier ON donnees(fichier_id);
CREATE INDEX IF NOT EXISTS idx_donnees_numero_dossier ON donnees(numero_dossier);
CREATE INDEX IF NOT EXISTS idx_donnees_enqueteur ON donnees(enqueteur_id);

CREATE TABLE IF NOT EXISTS donnees_enqueteur (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    donnee_id INTEGER NOT NULL UNIQUE REFERENCES donnees(id),
    code_resultat TEXT,
    elements_retrouves TEXT,
    flag_etat_civil_errone TEXT,
    date_retour TEXT,
    adresse1 TEXT,
    adresse2 TEXT,
    adresse3 TEXT,
    adresse4 TEXT,
    code_postal TEXT,
    ville TEXT,
    pays_residence TEXT,
    telephone_personnel TEXT,
    telephone_chez_employeur TEXT,
    nom_employeur TEXT,
    telephone_employeur TEXT,
    telecopie_employeur TEXT,
    adresse1_employeur TEXT,
    adresse2_employeur TEXT,
    adresse3_employeur TEXT,
    adresse4_employeur TEXT,
    code_postal_employeur TEXT,
    ville_employeur TEXT,
    pays_employeur TEXT,
    banque_domiciliation TEXT,
    libelle_guichet TEXT,
    titulaire_compte TEXT,
    code_banque TEXT,
    code_guichet TEXT,
    date_deces TEXT,
    numero_acte_deces TEXT,
    code_insee_deces TEXT,
    code_postal_deces TEXT,
    localite_deces TEXT,
    commentaires_revenus TEXT,
    montant_salaire REAL,
    periode_versement_salaire INTEGER,
    frequence_versement_salaire TEXT,
    nature_revenu1 TEXT,
    montant_revenu1 REAL,
    periode_versement_revenu1 INTEGER,
    frequence_versement_revenu1 TEXT,
    nature_revenu2 TEXT,
    montant_revenu2 REAL,
    periode_versement_revenu2 INTEGER,
    frequence_versement_revenu2 TEXT,
    nature_revenu3 TEXT,
    montant_revenu3 REAL,
    periode_versement_revenu3 INTEGER,
    frequence_versement_revenu3 TEXT,
    numero_facture TEXT,
    date_facture TEXT,
    montant_facture REAL,
    tarif_applique REAL,
    cumul_montants_precedents REAL,
    reprise_facturation REAL,
    remise_eventuelle REAL,
    memo1 TEXT,
    memo2 TEXT,
    memo3 TEXT,
    memo4 TEXT,
    memo5 TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Opens the database at `path` and makes sure the schema exists.
pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    prepare(&conn)?;
    Ok(conn)
}

#[cfg(test)]
pub(crate) fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA_SQL)
}

/// Current UTC time, the clock used for every stored timestamp.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// True when `err` is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
