use serde::{Deserialize, Serialize};

use crate::model::fichier::ExistingFileInfo;

/// Overall result of an upload, as seen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Ok,
    /// The file name is already imported; the caller may retry with a replace.
    Exists,
    Error,
}

/// Body returned by the upload endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub status: ImportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_processed: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_file_info: Option<ExistingFileInfo>,
    pub message: String,
}

impl ImportResponse {
    pub fn ok(
        file_id: i64,
        records_processed: usize,
        line_errors: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: ImportStatus::Ok,
            file_id: Some(file_id),
            records_processed: Some(records_processed),
            line_errors,
            existing_file_info: None,
            message: message.into(),
        }
    }

    pub fn exists(info: ExistingFileInfo) -> Self {
        Self {
            status: ImportStatus::Exists,
            file_id: None,
            records_processed: None,
            line_errors: Vec::new(),
            message: format!(
                "File '{}' already exists. Use replace to overwrite it.",
                info.nom
            ),
            existing_file_info: Some(info),
        }
    }

    pub fn error(message: impl Into<String>, line_errors: Vec<String>) -> Self {
        Self {
            status: ImportStatus::Error,
            file_id: None,
            records_processed: None,
            line_errors,
            existing_file_info: None,
            message: message.into(),
        }
    }
}
