//! Typed views of the raw records returned by a Subsonic server.
//!
//! Every display field is optional here; fallbacks are applied during translation
//! in [`crate::catalog::translate`]. Required fields are limited to identifiers.

use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level JSON document wrapping the response envelope.
#[derive(Debug, Deserialize)]
pub struct ResponseDocument {
    #[serde(rename = "subsonic-response")]
    pub response: SubsonicResponse,
}

/// Response envelope. `status` is the per-response success marker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsonicResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorRecord>,
    #[serde(default)]
    pub indexes: Option<IndexesRecord>,
    #[serde(default)]
    pub artists: Option<IndexesRecord>,
    #[serde(default)]
    pub artist: Option<ArtistRecord>,
    #[serde(default)]
    pub album: Option<AlbumRecord>,
    #[serde(default)]
    pub song: Option<ChildRecord>,
    #[serde(default)]
    pub directory: Option<DirectoryRecord>,
    #[serde(default)]
    pub playlists: Option<PlaylistsRecord>,
    #[serde(default)]
    pub playlist: Option<PlaylistRecord>,
    #[serde(default)]
    pub album_list2: Option<AlbumListRecord>,
    #[serde(default)]
    pub random_songs: Option<SongsRecord>,
    #[serde(default)]
    pub search_result3: Option<SearchResultRecord>,
}

pub const RESPONSE_OK: &str = "ok";

impl SubsonicResponse {
    /// An empty successful envelope.
    pub fn ok() -> Self {
        Self {
            status: RESPONSE_OK.to_string(),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RESPONSE_OK
    }

    /// Human-readable reason for a non-ok status.
    pub fn failure_reason(&self) -> String {
        match &self.error {
            Some(error) => format!(
                "status '{}' (code {}): {}",
                self.status,
                error.code,
                error.message.as_deref().unwrap_or("no message")
            ),
            None => format!("status '{}'", self.status),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorRecord {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Alphabetical index, used both by `getIndexes` and `getArtists`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexesRecord {
    #[serde(default, deserialize_with = "one_or_many")]
    pub index: Vec<IndexRecord>,
    /// Songs sitting directly at the top of the music folders (`getIndexes` only).
    #[serde(default, deserialize_with = "one_or_many")]
    pub child: Vec<ChildRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub artist: Vec<ArtistRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub album_count: Option<u32>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<AlbumRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub artist_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub song_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub year: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub song: Vec<ChildRecord>,
}

/// A directory entry or song (the Subsonic `Child` shape).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub parent: Option<String>,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub album: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub album_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub artist_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub track: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub disc_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub year: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: Option<String>,
    /// Duration in seconds.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub bit_rate: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub child: Vec<ChildRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistsRecord {
    #[serde(default, deserialize_with = "one_or_many")]
    pub playlist: Vec<PlaylistRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub song_count: Option<u32>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub entry: Vec<ChildRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumListRecord {
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<AlbumRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongsRecord {
    #[serde(default, deserialize_with = "one_or_many")]
    pub song: Vec<ChildRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResultRecord {
    #[serde(default, deserialize_with = "one_or_many")]
    pub artist: Vec<ArtistRecord>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<AlbumRecord>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub song: Vec<ChildRecord>,
}

/// Accepts identifiers sent either as strings or as JSON numbers.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Numbers that some servers send as strings; unparseable values become `None`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Display text; numbers are kept as their decimal text, anything else becomes `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn record_from_value<T>(item: Value) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    match serde_json::from_value(item) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!("Skipping malformed subsonic record: {}", err);
            None
        }
    }
}

/// Lists that a server collapses to a single object when they hold one element.
///
/// Elements that do not decode are skipped so the rest of the list survives.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(record_from_value).collect(),
        Some(item @ Value::Object(_)) => record_from_value(item).into_iter().collect(),
        _ => Vec::new(),
    })
}
