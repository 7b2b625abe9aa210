use serde::Deserialize;

/// Payload of the assignment endpoint: `enqueteId` is the dossier's case number.
/// A `null` investigator clears the assignment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub enquete_id: String,
    #[serde(default)]
    pub enqueteur_id: Option<i64>,
}

/// Optional filters for listing dossiers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonneeQuery {
    pub fichier_id: Option<i64>,
    pub enqueteur_id: Option<i64>,
}
