use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::format::timestamp;

/// One imported source file. Owns every `Donnee` created from its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fichier {
    pub id: i64,
    /// Original upload name; unique, used as the duplicate key.
    pub nom: String,
    #[serde(with = "timestamp")]
    pub date_upload: NaiveDateTime,
    /// Location of the stored upload on disk, when one was kept.
    pub chemin: Option<String>,
}

/// What the caller is shown when an upload name is already taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingFileInfo {
    pub nom: String,
    #[serde(with = "timestamp")]
    pub date_upload: NaiveDateTime,
    pub nombre_donnees: i64,
}
