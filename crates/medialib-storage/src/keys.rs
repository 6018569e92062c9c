//! Storage key generation for uploaded files.
//!
//! Key format: `{kind}/{uuid}.{extension}`.

use medialib_core::models::ContentKind;
use uuid::Uuid;

/// Extension of `file_name`: the text after its last `.`, or an empty
/// string when the name has no dot.
pub fn file_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .unwrap_or("")
}

/// Key for an upload with a fresh random id.
pub fn generate_upload_key(folder: ContentKind, file_name: &str) -> String {
    upload_key(folder, Uuid::new_v4(), file_name)
}

/// Key for an upload with a known id.
pub fn upload_key(folder: ContentKind, id: Uuid, file_name: &str) -> String {
    format!("{}/{}.{}", folder.as_str(), id, file_extension(file_name))
}
