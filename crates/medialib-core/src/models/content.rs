use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use crate::AppError;

/// Which content table a request targets.
///
/// Parsed from the `type` query parameter and the `contentType` body field.
/// Unknown values are rejected rather than mapped to a fallback table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Audio,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Audio => "audio",
            ContentKind::Video => "video",
        }
    }

    /// Table holding rows of this kind, without schema qualification.
    pub fn table_name(&self) -> &'static str {
        match self {
            ContentKind::Audio => "audio_content",
            ContentKind::Video => "video_content",
        }
    }

    /// Parse an optional discriminator, defaulting to audio when absent.
    pub fn parse_or_default(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None => Ok(ContentKind::default()),
            Some(raw) => raw.parse(),
        }
    }
}

impl FromStr for ContentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(ContentKind::Audio),
            "video" => Ok(ContentKind::Video),
            other => Err(AppError::InvalidInput(format!(
                "Invalid content type: {}",
                other
            ))),
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A row of the audio table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct AudioContent {
    pub id: i64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Length in seconds
    pub duration: Option<i32>,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row of the video table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct VideoContent {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Length in seconds
    pub duration: Option<i32>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of listing one table. Serializes as a plain JSON array of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentList {
    Audio(Vec<AudioContent>),
    Video(Vec<VideoContent>),
}

impl ContentList {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentList::Audio(_) => ContentKind::Audio,
            ContentList::Video(_) => ContentKind::Video,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ContentList::Audio(rows) => rows.len(),
            ContentList::Video(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fields accepted when creating an audio row. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAudio {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<i32>,
    pub audio_url: Option<String>,
}

/// Fields accepted when creating a video row. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<i32>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// A create request, carrying only the fields of its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NewContent {
    Audio(NewAudio),
    Video(NewVideo),
}

impl NewContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            NewContent::Audio(_) => ContentKind::Audio,
            NewContent::Video(_) => ContentKind::Video,
        }
    }

    /// Build a create request from a parsed JSON body.
    ///
    /// `contentType` must be `"audio"` or `"video"`; the remaining fields are
    /// read according to that kind and unknown fields are ignored.
    pub fn from_json(body: serde_json::Value) -> Result<Self, AppError> {
        let kind = match body.get("contentType") {
            Some(serde_json::Value::String(raw)) => raw.parse::<ContentKind>()?,
            Some(serde_json::Value::Null) | None => {
                return Err(AppError::InvalidInput("Missing contentType".to_string()))
            }
            Some(other) => {
                return Err(AppError::InvalidInput(format!(
                    "Invalid content type: {}",
                    other
                )))
            }
        };

        let content = match kind {
            ContentKind::Audio => NewContent::Audio(serde_json::from_value(body)?),
            ContentKind::Video => NewContent::Video(serde_json::from_value(body)?),
        };
        Ok(content)
    }
}

/// What a delete removed: the kind and the stored file URLs the row referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedContent {
    pub kind: ContentKind,
    pub id: i64,
    pub file_urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateContentResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Accepts an integer, a numeric string (form inputs submit strings), an
/// empty string or null.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Int(i64),
        Text(String),
    }

    match Option::<RawDuration>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDuration::Int(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("duration out of range: {}", n))),
        Some(RawDuration::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i32>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid duration: {}", text)))
        }
    }
}
