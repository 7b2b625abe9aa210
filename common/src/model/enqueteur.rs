use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::format::timestamp;

/// Investigator who can be assigned to dossiers. Referenced, never owned, by `Donnee`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enqueteur {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    #[serde(with = "timestamp")]
    pub date_creation: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEnqueteur {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    #[serde(default)]
    pub telephone: Option<String>,
}
