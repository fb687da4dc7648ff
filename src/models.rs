//! Normalized catalog entities handed to consumers.
//!
//! All entities are transient values built per request from remote records.

use serde::Serialize;

pub const UNKNOWN_SONG: &str = "Unknown Song";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Kind of a browse reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    Directory,
    Artist,
    Album,
    Track,
    Playlist,
}

/// Lightweight `{kind, uri, name}` reference returned by browse operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ref {
    pub kind: RefKind,
    pub uri: String,
    pub name: String,
}

impl Ref {
    pub fn directory(uri: String, name: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Directory,
            uri,
            name: name.into(),
        }
    }

    pub fn artist(uri: String, name: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Artist,
            uri,
            name: name.into(),
        }
    }

    pub fn album(uri: String, name: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Album,
            uri,
            name: name.into(),
        }
    }

    pub fn track(uri: String, name: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Track,
            uri,
            name: name.into(),
        }
    }

    pub fn playlist(uri: String, name: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Playlist,
            uri,
            name: name.into(),
        }
    }
}

/// Artist entity. `uri` is absent for artist references the server did not identify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub uri: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Album {
    pub uri: Option<String>,
    pub name: String,
    pub artists: Vec<Artist>,
    pub num_tracks: Option<u32>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    /// `subidy:song:<id>`; resolved to a playable URL at playback time.
    pub uri: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Album,
    /// Length in milliseconds.
    pub length: Option<u64>,
    pub track_no: Option<u32>,
    pub disc_no: Option<u32>,
    pub genre: Option<String>,
    /// Release year as free text.
    pub date: Option<String>,
    pub bitrate: Option<u32>,
}

/// A remote directory with its children in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directory {
    pub uri: String,
    pub name: String,
    pub children: Vec<Ref>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub uri: String,
    pub name: String,
    pub tracks: Vec<Track>,
}

/// Unified result of a search strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub uri: Option<String>,
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub tracks: Vec<Track>,
}

impl SearchResult {
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    pub fn from_artists(artists: Vec<Artist>) -> Self {
        Self {
            artists,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.albums.is_empty() && self.tracks.is_empty()
    }
}

/// One resolved item of a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Artist(Artist),
    Track(Track),
}

impl Entity {
    pub fn as_track(&self) -> Option<&Track> {
        match self {
            Entity::Track(track) => Some(track),
            Entity::Artist(_) => None,
        }
    }
}
