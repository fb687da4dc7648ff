//! Remote Subsonic API abstraction and concrete implementations.

pub mod opensubsonic;
pub mod records;

use crate::error::ApiError;
use records::SubsonicResponse;

/// Connection details for a Subsonic server.
#[derive(Debug, Clone)]
pub struct ServerAuth {
    /// Base URL without the `/rest` suffix.
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Send the password as `p=enc:<hex>` instead of a salted md5 token.
    pub legacy_auth: bool,
    pub api_version: String,
    pub client_name: String,
}

/// Per-entity result caps for a combined search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCaps {
    pub artists: u32,
    pub albums: u32,
    pub songs: u32,
}

impl SearchCaps {
    pub fn uniform(count: u32) -> Self {
        Self {
            artists: count,
            albums: count,
            songs: count,
        }
    }

    pub fn artists_only(count: u32) -> Self {
        Self {
            artists: count,
            albums: 0,
            songs: 0,
        }
    }
}

/// Target of a `createPlaylist` call: a new named playlist or a full replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistTarget<'a> {
    New { name: &'a str },
    Replace { playlist_id: &'a str },
}

/// Blocking RPC surface of a Subsonic server.
///
/// Implementations return the response envelope untouched; checking its status
/// marker is the caller's job. `Err` is reserved for transport and decode failures.
pub trait SubsonicApi: Send + Sync {
    fn ping(&self) -> Result<SubsonicResponse, ApiError>;
    fn search(&self, query: &str, caps: SearchCaps) -> Result<SubsonicResponse, ApiError>;
    /// Folder-based index of the top-level music directories.
    fn get_indexes(&self) -> Result<SubsonicResponse, ApiError>;
    /// Tag-based artist list, grouped alphabetically.
    fn get_artists(&self) -> Result<SubsonicResponse, ApiError>;
    fn get_artist(&self, id: &str) -> Result<SubsonicResponse, ApiError>;
    fn get_album(&self, id: &str) -> Result<SubsonicResponse, ApiError>;
    fn get_song(&self, id: &str) -> Result<SubsonicResponse, ApiError>;
    fn get_music_directory(&self, id: &str) -> Result<SubsonicResponse, ApiError>;
    fn get_playlists(&self) -> Result<SubsonicResponse, ApiError>;
    fn get_playlist(&self, id: &str) -> Result<SubsonicResponse, ApiError>;
    fn create_playlist(
        &self,
        target: PlaylistTarget<'_>,
        song_ids: &[String],
    ) -> Result<SubsonicResponse, ApiError>;
    fn delete_playlist(&self, id: &str) -> Result<SubsonicResponse, ApiError>;
    fn get_album_list(
        &self,
        list_type: &str,
        size: u32,
        offset: u32,
    ) -> Result<SubsonicResponse, ApiError>;
    fn get_random_songs(&self, size: u32) -> Result<SubsonicResponse, ApiError>;
    /// Stream URL for a song; `censored` masks every credential parameter.
    fn stream_url(&self, song_id: &str, censored: bool) -> String;
    fn cover_art_url(&self, cover_id: &str, censored: bool) -> String;
    /// Server base URL, for diagnostics.
    fn endpoint(&self) -> &str;
}
