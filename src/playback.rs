//! Song URI to playable stream URL resolution.

use std::sync::Arc;

use log::debug;

use crate::catalog::CatalogGateway;
use crate::uri::{self, UriKind};

/// Hands credentialed media URLs to the audio collaborator.
pub struct PlaybackResolver {
    gateway: Arc<CatalogGateway>,
}

impl PlaybackResolver {
    pub fn new(gateway: Arc<CatalogGateway>) -> Self {
        Self { gateway }
    }

    /// Playable stream URL for a song URI. Only the censored form is logged.
    pub fn resolve_stream_uri(&self, song_uri: &str) -> Option<String> {
        let song_id = uri::decode_expecting(song_uri, UriKind::Song)?;
        debug!(
            "Resolved {} to {}",
            song_uri,
            self.gateway.get_censored_song_stream_uri(&song_id)
        );
        Some(self.gateway.get_song_stream_uri(&song_id))
    }

    /// Cover art URL for a remote cover art id, passed through untranslated.
    pub fn resolve_cover_art_uri(&self, cover_id: &str) -> Option<String> {
        if cover_id.trim().is_empty() {
            return None;
        }
        debug!(
            "Cover art {} at {}",
            cover_id,
            self.gateway.get_censored_cover_art_uri(cover_id)
        );
        Some(self.gateway.get_cover_art_uri(cover_id))
    }
}
