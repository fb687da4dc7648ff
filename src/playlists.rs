//! Remote playlist listing and mutation.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::catalog::{translate, CatalogGateway};
use crate::models::{Playlist, Ref};
use crate::uri::{self, UriKind};

/// Lists, reads, creates, deletes and saves playlists on the server.
pub struct PlaylistManager {
    gateway: Arc<CatalogGateway>,
}

impl PlaylistManager {
    pub fn new(gateway: Arc<CatalogGateway>) -> Self {
        Self { gateway }
    }

    /// Playlist references as currently listed by the server.
    pub fn as_list(&self) -> Vec<Ref> {
        self.gateway.get_playlists_as_refs()
    }

    /// Re-reads the remote playlist list. Nothing is kept between calls.
    pub fn refresh(&self) -> Vec<Ref> {
        let playlists = self.as_list();
        info!("Refreshed playlists: {} found", playlists.len());
        playlists
    }

    /// Full playlist with tracks expanded.
    pub fn lookup(&self, playlist_uri: &str) -> Option<Playlist> {
        let playlist_id = uri::decode_expecting(playlist_uri, UriKind::Playlist)?;
        self.gateway.get_playlist_as_playlist(&playlist_id)
    }

    /// Track references of a playlist without full track details.
    pub fn get_items(&self, playlist_uri: &str) -> Option<Vec<Ref>> {
        let playlist_id = uri::decode_expecting(playlist_uri, UriKind::Playlist)?;
        self.gateway.get_playlist_songs_as_refs(&playlist_id)
    }

    /// Creates an empty playlist named `name`.
    ///
    /// When the server does not echo the new playlist, the list is re-read and the first
    /// playlist with the same name is returned.
    pub fn create(&self, name: &str) -> Option<Playlist> {
        match self.gateway.create_playlist(name)? {
            Some(created) => Some(created),
            None => {
                debug!("Server did not echo playlist '{}', re-listing", name);
                self.gateway
                    .get_raw_playlists()
                    .iter()
                    .find(|playlist| translate::playlist_name(playlist) == name)
                    .map(translate::playlist_to_playlist)
            }
        }
    }

    /// Deletes a playlist. The outcome is only logged.
    pub fn delete(&self, playlist_uri: &str) {
        let Some(playlist_id) = uri::decode_expecting(playlist_uri, UriKind::Playlist) else {
            debug!("Not deleting {}: not a playlist uri", playlist_uri);
            return;
        };
        if self.gateway.delete_playlist(&playlist_id) {
            info!("Deleted playlist {}", playlist_uri);
        }
    }

    /// Overwrites the remote playlist with the tracks of `playlist`, in order.
    ///
    /// Tracks whose URI is not a song of this backend are left out. Returns the input
    /// playlist on success.
    pub fn save(&self, playlist: &Playlist) -> Option<Playlist> {
        let Some(playlist_id) = uri::decode_expecting(&playlist.uri, UriKind::Playlist) else {
            warn!("Cannot save {}: not a playlist uri", playlist.uri);
            return None;
        };
        let song_ids: Vec<String> = playlist
            .tracks
            .iter()
            .filter_map(|track| {
                let song_id = uri::decode_expecting(&track.uri, UriKind::Song);
                if song_id.is_none() {
                    warn!("Skipping {} while saving playlist: not a song uri", track.uri);
                }
                song_id
            })
            .collect();
        if !self.gateway.replace_playlist_songs(&playlist_id, &song_ids) {
            return None;
        }
        info!(
            "Saved playlist {} with {} tracks",
            playlist.uri,
            song_ids.len()
        );
        Some(playlist.clone())
    }

    /// Overwrites the remote playlist with the given song URIs, in order, without
    /// resolving them first.
    ///
    /// Nothing is submitted unless every URI is a song of this backend. Returns the
    /// playlist as the server holds it after the write.
    pub fn save_track_uris(&self, playlist_uri: &str, track_uris: &[String]) -> Option<Playlist> {
        let Some(playlist_id) = uri::decode_expecting(playlist_uri, UriKind::Playlist) else {
            warn!("Cannot save {}: not a playlist uri", playlist_uri);
            return None;
        };
        let mut song_ids = Vec::with_capacity(track_uris.len());
        for track_uri in track_uris {
            let Some(song_id) = uri::decode_expecting(track_uri, UriKind::Song) else {
                warn!("Not saving {}: {} is not a song uri", playlist_uri, track_uri);
                return None;
            };
            song_ids.push(song_id);
        }
        if !self.gateway.replace_playlist_songs(&playlist_id, &song_ids) {
            return None;
        }
        info!(
            "Saved playlist {} with {} tracks",
            playlist_uri,
            song_ids.len()
        );
        self.gateway.get_playlist_as_playlist(&playlist_id)
    }
}
