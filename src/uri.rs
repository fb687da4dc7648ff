//! Opaque `subidy:` URI scheme shared by every catalog entity.
//!
//! A URI has the shape `subidy:<kind>[:<identifier>]`. The identifier is opaque and
//! may itself contain `:`, so decoding takes everything after the second delimiter.

use std::fmt;

use crate::library::virtual_dirs::VirtualDirectoryId;

/// Namespace literal identifying URIs owned by this backend.
pub const NAMESPACE: &str = "subidy";

const DELIMITER: char = ':';

/// Entity kind encoded in the second URI segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UriKind {
    Song,
    Artist,
    Album,
    Directory,
    Playlist,
    VirtualDirectory,
    Search,
}

impl UriKind {
    pub const ALL: [UriKind; 7] = [
        UriKind::Song,
        UriKind::Artist,
        UriKind::Album,
        UriKind::Directory,
        UriKind::Playlist,
        UriKind::VirtualDirectory,
        UriKind::Search,
    ];

    /// Literal used on the wire for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            UriKind::Song => "song",
            UriKind::Artist => "artist",
            UriKind::Album => "album",
            UriKind::Directory => "directory",
            UriKind::Playlist => "playlist",
            UriKind::VirtualDirectory => "vdir",
            UriKind::Search => "search",
        }
    }

    fn parse(literal: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == literal)
    }
}

impl fmt::Display for UriKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded form of a `subidy:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUri {
    pub kind: UriKind,
    /// Remote identifier; empty when the URI carried none.
    pub id: String,
}

/// Encodes a kind and identifier into a URI.
pub fn encode(kind: UriKind, id: &str) -> String {
    format!("{NAMESPACE}{DELIMITER}{}{DELIMITER}{id}", kind.as_str())
}

/// Decodes a URI, returning `None` for anything outside this backend's scheme.
///
/// Grammar: `namespace ":" kind [":" identifier]`. The identifier runs greedily to the
/// end of the string. Virtual-directory identifiers must name a known entry and may
/// not carry extra segments.
pub fn decode(uri: &str) -> Option<MediaUri> {
    let rest = uri.strip_prefix(NAMESPACE)?.strip_prefix(DELIMITER)?;
    let (kind_literal, id) = match rest.split_once(DELIMITER) {
        Some((kind_literal, id)) => (kind_literal, id),
        None => (rest, ""),
    };
    let kind = UriKind::parse(kind_literal)?;
    if kind == UriKind::VirtualDirectory && VirtualDirectoryId::parse(id).is_none() {
        return None;
    }
    Some(MediaUri {
        kind,
        id: id.to_string(),
    })
}

/// Returns the identifier when `uri` decodes to `kind` with a non-empty identifier.
///
/// Foreign URIs and kind mismatches both yield `None`; callers cannot tell them apart.
pub fn decode_expecting(uri: &str, kind: UriKind) -> Option<String> {
    decode(uri)
        .filter(|decoded| decoded.kind == kind && !decoded.id.is_empty())
        .map(|decoded| decoded.id)
}

/// Returns `true` when `uri` belongs to this backend's scheme.
pub fn is_uri(uri: &str) -> bool {
    decode(uri).is_some()
}

pub fn song_uri(id: &str) -> String {
    encode(UriKind::Song, id)
}

pub fn artist_uri(id: &str) -> String {
    encode(UriKind::Artist, id)
}

pub fn album_uri(id: &str) -> String {
    encode(UriKind::Album, id)
}

pub fn directory_uri(id: &str) -> String {
    encode(UriKind::Directory, id)
}

pub fn playlist_uri(id: &str) -> String {
    encode(UriKind::Playlist, id)
}

pub fn search_uri(query: &str) -> String {
    encode(UriKind::Search, query)
}

pub fn vdir_uri(id: VirtualDirectoryId) -> String {
    encode(UriKind::VirtualDirectory, id.as_str())
}
