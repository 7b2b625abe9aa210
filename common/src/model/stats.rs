use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::format::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStats {
    pub id: i64,
    pub nom: String,
    #[serde(with = "timestamp")]
    pub date_upload: NaiveDateTime,
    pub nombre_donnees: i64,
}

/// Aggregated counts for the dashboard; files are listed newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_fichiers: i64,
    pub total_donnees: i64,
    pub derniers_fichiers: Vec<FileStats>,
}
