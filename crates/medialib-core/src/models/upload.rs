use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::content::ContentKind;
use crate::AppError;

/// Message returned for any upload missing `file`, `fileName` or `fileType`.
pub const MISSING_UPLOAD_FIELDS: &str = "Missing required fields";

/// Raw upload body as sent by clients.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Base64-encoded file contents
    pub file: Option<String>,
    pub file_name: Option<String>,
    /// MIME type stored with the object
    pub file_type: Option<String>,
    /// `"audio"` stores under the audio folder, anything else under video,
    /// including non-string values
    #[schema(value_type = Option<String>)]
    pub content_type: Option<Value>,
}

/// An upload with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub file: String,
    pub file_name: String,
    pub file_type: String,
    pub folder: ContentKind,
}

impl UploadRequest {
    pub fn validate(self) -> Result<ValidatedUpload, AppError> {
        let (file, file_name, file_type) = match (
            non_empty(self.file),
            non_empty(self.file_name),
            non_empty(self.file_type),
        ) {
            (Some(file), Some(file_name), Some(file_type)) => (file, file_name, file_type),
            _ => return Err(AppError::InvalidInput(MISSING_UPLOAD_FIELDS.to_string())),
        };

        let folder = match self.content_type {
            Some(Value::String(kind)) if kind == "audio" => ContentKind::Audio,
            _ => ContentKind::Video,
        };

        Ok(ValidatedUpload {
            file,
            file_name,
            file_type,
            folder,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub file_name: String,
}
