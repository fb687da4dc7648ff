//! Catalog gateway: the single seam between remote records and normalized entities.
//!
//! Every remote read issues one call and checks the response status marker. A
//! transport failure or a non-ok status is logged at warn level and turned into an
//! empty list or `None`. Callers cannot tell a remote fault from a legitimately empty
//! answer; that ambiguity is kept on purpose so browsing never fails hard.

pub mod flatten;
pub mod sorting;
pub mod translate;

use std::sync::Arc;

use log::{debug, warn};

use crate::backends::records::{
    AlbumRecord, ArtistRecord, ChildRecord, DirectoryRecord, PlaylistRecord, SearchResultRecord,
    SubsonicResponse,
};
use crate::backends::{PlaylistTarget, SearchCaps, SubsonicApi};
use crate::error::ApiError;
use crate::models::{Album, Artist, Directory, Playlist, Ref, SearchResult, Track};
use crate::uri;
use flatten::DirectoryTracks;

/// List type used when paging through every album.
const ALBUM_LIST_TYPE: &str = "alphabeticalByName";

/// Tunables for gateway queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSettings {
    pub album_page_size: u32,
    pub random_songs: u32,
    pub search_max_results: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            album_page_size: 500,
            random_songs: 50,
            search_max_results: 100,
        }
    }
}

/// Issues logical catalog queries and translates the answers.
pub struct CatalogGateway {
    api: Arc<dyn SubsonicApi>,
    settings: CatalogSettings,
}

impl CatalogGateway {
    pub fn new(api: Arc<dyn SubsonicApi>, settings: CatalogSettings) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> CatalogSettings {
        self.settings
    }

    /// Applies the degrade-to-empty policy to one remote answer.
    fn checked(
        &self,
        action: &str,
        result: Result<SubsonicResponse, ApiError>,
    ) -> Option<SubsonicResponse> {
        match result {
            Ok(response) if response.is_ok() => Some(response),
            Ok(response) => {
                warn!(
                    "Got non-okay response from subsonic when {}: {}",
                    action,
                    response.failure_reason()
                );
                None
            }
            Err(err) => {
                warn!("Connecting to subsonic failed when {}: {}", action, err);
                None
            }
        }
    }

    // Raw record access.

    /// All artists from the alphabetical artist index, flattened.
    pub fn get_raw_artists(&self) -> Vec<ArtistRecord> {
        let Some(response) = self.checked("loading list of artists", self.api.get_artists())
        else {
            return Vec::new();
        };
        let artists: Vec<ArtistRecord> = response
            .artists
            .map(|artists| {
                artists
                    .index
                    .into_iter()
                    .flat_map(|letter| letter.artist)
                    .collect()
            })
            .unwrap_or_default();
        if artists.is_empty() {
            warn!("Subsonic does not seem to have any artists in its library.");
        }
        artists
    }

    /// Top-level music folder entries (as directories) and loose top-level songs.
    pub fn get_raw_rootdirs(&self) -> (Vec<ArtistRecord>, Vec<ChildRecord>) {
        let Some(response) = self.checked("loading root directories", self.api.get_indexes())
        else {
            return (Vec::new(), Vec::new());
        };
        let Some(indexes) = response.indexes else {
            return (Vec::new(), Vec::new());
        };
        let folders = indexes
            .index
            .into_iter()
            .flat_map(|letter| letter.artist)
            .collect();
        (folders, indexes.child)
    }

    pub fn get_raw_artist(&self, artist_id: &str) -> Option<ArtistRecord> {
        self.checked("loading artist by id", self.api.get_artist(artist_id))?
            .artist
    }

    pub fn get_raw_album(&self, album_id: &str) -> Option<AlbumRecord> {
        self.checked("loading album by id", self.api.get_album(album_id))?
            .album
    }

    pub fn get_raw_song(&self, song_id: &str) -> Option<ChildRecord> {
        self.checked("loading song by id", self.api.get_song(song_id))?
            .song
    }

    /// Directory with its children naturally sorted.
    pub fn get_raw_dir(&self, directory_id: &str) -> Option<DirectoryRecord> {
        let mut directory = self
            .checked(
                "listing content of music directory",
                self.api.get_music_directory(directory_id),
            )?
            .directory?;
        sorting::sort_entries(&mut directory.child);
        Some(directory)
    }

    pub(crate) fn get_raw_dir_children(&self, directory_id: &str) -> Vec<ChildRecord> {
        self.get_raw_dir(directory_id)
            .map(|directory| directory.child)
            .unwrap_or_default()
    }

    /// Albums of one artist, in server order.
    pub fn get_raw_artist_albums(&self, artist_id: &str) -> Vec<AlbumRecord> {
        self.get_raw_artist(artist_id)
            .map(|artist| artist.album)
            .unwrap_or_default()
    }

    /// Songs of one album, in server order.
    pub fn get_raw_songs(&self, album_id: &str) -> Vec<ChildRecord> {
        self.get_raw_album(album_id)
            .map(|album| album.song)
            .unwrap_or_default()
    }

    /// Every album on the server.
    ///
    /// The remote list does not report a total, so pages are requested until one comes
    /// back shorter than the page size. A failing page ends the walk; albums from
    /// earlier pages are kept.
    pub fn get_raw_album_list(&self) -> Vec<AlbumRecord> {
        let page_size = self.settings.album_page_size.max(1);
        let mut offset = 0u32;
        let mut albums = Vec::new();
        loop {
            let Some(response) = self.checked(
                "loading album list",
                self.api.get_album_list(ALBUM_LIST_TYPE, page_size, offset),
            ) else {
                break;
            };
            let page = response
                .album_list2
                .map(|list| list.album)
                .unwrap_or_default();
            let page_len = page.len();
            albums.extend(page);
            debug!(
                "Loaded album page at offset {} ({} albums)",
                offset, page_len
            );
            if page_len < page_size as usize {
                break;
            }
            offset = offset.saturating_add(page_size);
        }
        albums
    }

    pub fn get_raw_random_songs(&self) -> Vec<ChildRecord> {
        self.checked(
            "loading random songs",
            self.api.get_random_songs(self.settings.random_songs),
        )
        .and_then(|response| response.random_songs)
        .map(|songs| songs.song)
        .unwrap_or_default()
    }

    pub fn get_raw_playlists(&self) -> Vec<PlaylistRecord> {
        let Some(response) =
            self.checked("loading list of playlists", self.api.get_playlists())
        else {
            return Vec::new();
        };
        let playlists = response
            .playlists
            .map(|playlists| playlists.playlist)
            .unwrap_or_default();
        if playlists.is_empty() {
            warn!("Subsonic does not seem to have any playlists in its library.");
        }
        playlists
    }

    pub fn get_raw_playlist(&self, playlist_id: &str) -> Option<PlaylistRecord> {
        self.checked("loading playlist", self.api.get_playlist(playlist_id))?
            .playlist
    }

    pub fn find_raw(&self, query: &str, caps: SearchCaps) -> Option<SearchResultRecord> {
        Some(
            self.checked("searching", self.api.search(query, caps))?
                .search_result3
                .unwrap_or_default(),
        )
    }

    // Entity-level queries.

    pub fn get_artists_as_refs(&self) -> Vec<Ref> {
        self.get_raw_artists()
            .iter()
            .map(translate::artist_to_ref)
            .collect()
    }

    pub fn get_artists_as_artists(&self) -> Vec<Artist> {
        self.get_raw_artists()
            .iter()
            .map(translate::artist_to_artist)
            .collect()
    }

    pub fn get_rootdirs_as_refs(&self) -> Vec<Ref> {
        let (folders, songs) = self.get_raw_rootdirs();
        folders
            .iter()
            .map(translate::index_artist_to_directory_ref)
            .chain(songs.iter().map(translate::song_to_ref))
            .collect()
    }

    /// Albums of `artist_id`, or every album when no artist is given.
    pub fn get_albums_as_refs(&self, artist_id: Option<&str>) -> Vec<Ref> {
        self.albums_for(artist_id)
            .iter()
            .map(translate::album_to_ref)
            .collect()
    }

    pub fn get_albums_as_albums(&self, artist_id: Option<&str>) -> Vec<Album> {
        self.albums_for(artist_id)
            .iter()
            .map(translate::album_to_album)
            .collect()
    }

    fn albums_for(&self, artist_id: Option<&str>) -> Vec<AlbumRecord> {
        match artist_id {
            Some(artist_id) => self.get_raw_artist_albums(artist_id),
            None => self.get_raw_album_list(),
        }
    }

    pub fn get_songs_as_refs(&self, album_id: &str) -> Vec<Ref> {
        self.get_raw_songs(album_id)
            .iter()
            .map(translate::song_to_ref)
            .collect()
    }

    pub fn get_songs_as_tracks(&self, album_id: &str) -> Vec<Track> {
        self.get_raw_songs(album_id)
            .iter()
            .map(translate::song_to_track)
            .collect()
    }

    pub fn get_random_songs_as_refs(&self) -> Vec<Ref> {
        self.get_raw_random_songs()
            .iter()
            .map(translate::song_to_ref)
            .collect()
    }

    pub fn get_random_songs_as_tracks(&self) -> Vec<Track> {
        self.get_raw_random_songs()
            .iter()
            .map(translate::song_to_track)
            .collect()
    }

    pub fn get_song_by_id(&self, song_id: &str) -> Option<Track> {
        self.get_raw_song(song_id)
            .map(|song| translate::song_to_track(&song))
    }

    pub fn get_album_by_id(&self, album_id: &str) -> Option<Album> {
        self.get_raw_album(album_id)
            .map(|album| translate::album_to_album(&album))
    }

    pub fn get_artist_by_id(&self, artist_id: &str) -> Option<Artist> {
        self.get_raw_artist(artist_id)
            .map(|artist| translate::artist_to_artist(&artist))
    }

    /// Every track of every album of an artist, album by album.
    pub fn get_artist_tracks(&self, artist_id: &str) -> Vec<Track> {
        self.get_raw_artist_albums(artist_id)
            .iter()
            .flat_map(|album| self.get_songs_as_tracks(&album.id))
            .collect()
    }

    pub fn get_directory(&self, directory_id: &str) -> Option<Directory> {
        let directory = self.get_raw_dir(directory_id)?;
        Some(Directory {
            uri: uri::directory_uri(&directory.id),
            name: directory.name.clone().unwrap_or_default(),
            children: directory.child.iter().map(translate::child_to_ref).collect(),
        })
    }

    pub fn get_diritems_as_refs(&self, directory_id: &str) -> Vec<Ref> {
        self.get_directory(directory_id)
            .map(|directory| directory.children)
            .unwrap_or_default()
    }

    /// Lazy depth-first track sequence of a directory subtree.
    pub fn flatten_directory_to_tracks(&self, directory_id: &str) -> DirectoryTracks<'_> {
        DirectoryTracks::new(self, directory_id)
    }

    pub fn find_as_search_result(&self, query: &str, caps: SearchCaps) -> Option<SearchResult> {
        let result = self.find_raw(query, caps)?;
        Some(SearchResult {
            uri: Some(uri::search_uri(query)),
            artists: result.artist.iter().map(translate::artist_to_artist).collect(),
            albums: result.album.iter().map(translate::album_to_album).collect(),
            tracks: result.song.iter().map(translate::song_to_track).collect(),
        })
    }

    /// Default caps for a combined search.
    pub fn search_caps(&self) -> SearchCaps {
        SearchCaps::uniform(self.settings.search_max_results)
    }

    pub fn get_playlists_as_refs(&self) -> Vec<Ref> {
        self.get_raw_playlists()
            .iter()
            .map(translate::playlist_to_ref)
            .collect()
    }

    pub fn get_playlist_as_playlist(&self, playlist_id: &str) -> Option<Playlist> {
        self.get_raw_playlist(playlist_id)
            .map(|playlist| translate::playlist_to_playlist(&playlist))
    }

    pub fn get_playlist_songs_as_refs(&self, playlist_id: &str) -> Option<Vec<Ref>> {
        self.get_raw_playlist(playlist_id)
            .map(|playlist| playlist.entry.iter().map(translate::song_to_ref).collect())
    }

    // Playlist writes.

    /// Creates an empty playlist. `Some(None)` means the server accepted the request
    /// without echoing the new playlist.
    pub fn create_playlist(&self, name: &str) -> Option<Option<Playlist>> {
        let response = self.checked(
            "creating playlist",
            self.api
                .create_playlist(PlaylistTarget::New { name }, &[]),
        )?;
        Some(
            response
                .playlist
                .map(|playlist| translate::playlist_to_playlist(&playlist)),
        )
    }

    /// Replaces the full contents of a playlist. Returns `true` on success.
    pub fn replace_playlist_songs(&self, playlist_id: &str, song_ids: &[String]) -> bool {
        self.checked(
            "saving playlist",
            self.api
                .create_playlist(PlaylistTarget::Replace { playlist_id }, song_ids),
        )
        .is_some()
    }

    pub fn delete_playlist(&self, playlist_id: &str) -> bool {
        self.checked("deleting playlist", self.api.delete_playlist(playlist_id))
            .is_some()
    }

    // Media URLs.

    pub fn get_song_stream_uri(&self, song_id: &str) -> String {
        self.api.stream_url(song_id, false)
    }

    /// Stream URL with credentials masked, for logging only.
    pub fn get_censored_song_stream_uri(&self, song_id: &str) -> String {
        self.api.stream_url(song_id, true)
    }

    pub fn get_cover_art_uri(&self, cover_id: &str) -> String {
        self.api.cover_art_url(cover_id, false)
    }

    pub fn get_censored_cover_art_uri(&self, cover_id: &str) -> String {
        self.api.cover_art_url(cover_id, true)
    }
}
