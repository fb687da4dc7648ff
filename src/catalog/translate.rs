//! Record → entity translation with fixed fallback values.

use crate::backends::records::{AlbumRecord, ArtistRecord, ChildRecord, PlaylistRecord};
use crate::models::{
    Album, Artist, Playlist, Ref, Track, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_SONG,
};
use crate::uri;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

pub fn song_name(song: &ChildRecord) -> String {
    non_empty(song.title.as_deref())
        .unwrap_or(UNKNOWN_SONG)
        .to_string()
}

/// Album display name: `title`, then `name`, then the fallback.
pub fn album_name(album: &AlbumRecord) -> String {
    non_empty(album.title.as_deref())
        .or_else(|| non_empty(album.name.as_deref()))
        .unwrap_or(UNKNOWN_ALBUM)
        .to_string()
}

pub fn artist_name(artist: &ArtistRecord) -> String {
    non_empty(artist.name.as_deref())
        .unwrap_or(UNKNOWN_ARTIST)
        .to_string()
}

fn artist_reference(name: Option<&str>, id: Option<&str>) -> Artist {
    Artist {
        uri: id.map(uri::artist_uri),
        name: non_empty(name).unwrap_or(UNKNOWN_ARTIST).to_string(),
    }
}

pub fn song_to_track(song: &ChildRecord) -> Track {
    let artist = artist_reference(song.artist.as_deref(), song.artist_id.as_deref());
    Track {
        uri: uri::song_uri(&song.id),
        name: song_name(song),
        artists: vec![artist.clone()],
        album: Album {
            uri: song.album_id.as_deref().map(uri::album_uri),
            name: non_empty(song.album.as_deref())
                .unwrap_or(UNKNOWN_ALBUM)
                .to_string(),
            artists: vec![artist],
            num_tracks: None,
            date: None,
        },
        length: song.duration.map(|seconds| u64::from(seconds) * 1000),
        track_no: song.track,
        disc_no: song.disc_number,
        genre: song.genre.clone(),
        date: song.year.map(|year| year.to_string()),
        bitrate: song.bit_rate,
    }
}

pub fn song_to_ref(song: &ChildRecord) -> Ref {
    Ref::track(uri::song_uri(&song.id), song_name(song))
}

/// Directory entries become directory refs, everything else track refs.
pub fn child_to_ref(child: &ChildRecord) -> Ref {
    if child.is_dir {
        Ref::directory(
            uri::directory_uri(&child.id),
            non_empty(child.title.as_deref()).unwrap_or(&child.id),
        )
    } else {
        song_to_ref(child)
    }
}

pub fn album_to_album(album: &AlbumRecord) -> Album {
    Album {
        uri: Some(uri::album_uri(&album.id)),
        name: album_name(album),
        artists: vec![artist_reference(
            album.artist.as_deref(),
            album.artist_id.as_deref(),
        )],
        num_tracks: album.song_count,
        date: album.year.map(|year| year.to_string()),
    }
}

pub fn album_to_ref(album: &AlbumRecord) -> Ref {
    Ref::album(uri::album_uri(&album.id), album_name(album))
}

pub fn artist_to_artist(artist: &ArtistRecord) -> Artist {
    Artist {
        uri: Some(uri::artist_uri(&artist.id)),
        name: artist_name(artist),
    }
}

pub fn artist_to_ref(artist: &ArtistRecord) -> Ref {
    Ref::artist(uri::artist_uri(&artist.id), artist_name(artist))
}

/// Top-level music folders are browsed as directories.
pub fn index_artist_to_directory_ref(artist: &ArtistRecord) -> Ref {
    Ref::directory(uri::directory_uri(&artist.id), artist_name(artist))
}

pub fn playlist_name(playlist: &PlaylistRecord) -> String {
    playlist.name.clone().unwrap_or_default()
}

pub fn playlist_to_ref(playlist: &PlaylistRecord) -> Ref {
    Ref::playlist(uri::playlist_uri(&playlist.id), playlist_name(playlist))
}

pub fn playlist_to_playlist(playlist: &PlaylistRecord) -> Playlist {
    Playlist {
        uri: uri::playlist_uri(&playlist.id),
        name: playlist_name(playlist),
        tracks: playlist.entry.iter().map(song_to_track).collect(),
    }
}
