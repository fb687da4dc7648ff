//! Subsonic/OpenSubsonic client backed by `ureq`.

use std::time::Duration;

use log::{debug, warn};

use crate::backends::records::{ResponseDocument, SubsonicResponse};
use crate::backends::{PlaylistTarget, SearchCaps, ServerAuth, SubsonicApi};
use crate::error::ApiError;

const CENSORED: &str = "*****";

/// Blocking Subsonic client. One instance per server connection.
pub struct OpenSubsonicClient {
    http_client: ureq::Agent,
    auth: ServerAuth,
}

impl OpenSubsonicClient {
    /// Creates a client for the given server credentials.
    pub fn new(mut auth: ServerAuth) -> Self {
        auth.endpoint = Self::endpoint_base(&auth.endpoint);
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();
        Self { http_client, auth }
    }

    fn make_salt() -> String {
        let mut bytes = [0u8; 8];
        if let Err(err) = getrandom::fill(&mut bytes) {
            warn!("Failed to generate a random auth salt: {}", err);
        }
        bytes.iter().map(|value| format!("{value:02x}")).collect()
    }

    fn hex_encode(text: &str) -> String {
        text.bytes().map(|byte| format!("{byte:02x}")).collect()
    }

    fn auth_params(&self, censored: bool) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(6);
        if censored {
            params.push(("u".to_string(), CENSORED.to_string()));
            if self.auth.legacy_auth {
                params.push(("p".to_string(), CENSORED.to_string()));
            } else {
                params.push(("t".to_string(), CENSORED.to_string()));
                params.push(("s".to_string(), CENSORED.to_string()));
            }
        } else {
            params.push(("u".to_string(), self.auth.username.clone()));
            if self.auth.legacy_auth {
                params.push((
                    "p".to_string(),
                    format!("enc:{}", Self::hex_encode(&self.auth.password)),
                ));
            } else {
                let salt = Self::make_salt();
                let token = format!(
                    "{:x}",
                    md5::compute(format!("{}{}", self.auth.password, salt))
                );
                params.push(("t".to_string(), token));
                params.push(("s".to_string(), salt));
            }
        }
        params.push(("v".to_string(), self.auth.api_version.clone()));
        params.push(("c".to_string(), self.auth.client_name.clone()));
        params
    }

    fn endpoint_base(endpoint: &str) -> String {
        endpoint.trim().trim_end_matches('/').to_string()
    }

    fn view_url(&self, method: &str, params: &[(String, String)], censored: bool) -> String {
        let query_parts: Vec<String> = self
            .auth_params(censored)
            .into_iter()
            .chain(params.iter().cloned())
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
            .collect();
        format!(
            "{}/rest/{}.view?{}",
            self.auth.endpoint,
            method,
            query_parts.join("&")
        )
    }

    fn request(
        &self,
        method: &str,
        params: &[(String, String)],
    ) -> Result<SubsonicResponse, ApiError> {
        let mut params = params.to_vec();
        params.push(("f".to_string(), "json".to_string()));
        debug!("GET {}", self.view_url(method, &params, true));

        let response = self
            .http_client
            .get(&self.view_url(method, &params, false))
            .call()
            .map_err(|err| ApiError::Transport {
                method: method.to_string(),
                reason: err.to_string(),
            })?;
        let document: ResponseDocument = response.into_json().map_err(|err| ApiError::Decode {
            method: method.to_string(),
            reason: err.to_string(),
        })?;
        Ok(document.response)
    }

    fn id_param(id: &str) -> Vec<(String, String)> {
        vec![("id".to_string(), id.to_string())]
    }
}

impl SubsonicApi for OpenSubsonicClient {
    fn ping(&self) -> Result<SubsonicResponse, ApiError> {
        self.request("ping", &[])
    }

    fn search(&self, query: &str, caps: SearchCaps) -> Result<SubsonicResponse, ApiError> {
        self.request(
            "search3",
            &[
                ("query".to_string(), query.to_string()),
                ("artistCount".to_string(), caps.artists.to_string()),
                ("artistOffset".to_string(), "0".to_string()),
                ("albumCount".to_string(), caps.albums.to_string()),
                ("albumOffset".to_string(), "0".to_string()),
                ("songCount".to_string(), caps.songs.to_string()),
                ("songOffset".to_string(), "0".to_string()),
            ],
        )
    }

    fn get_indexes(&self) -> Result<SubsonicResponse, ApiError> {
        self.request("getIndexes", &[])
    }

    fn get_artists(&self) -> Result<SubsonicResponse, ApiError> {
        self.request("getArtists", &[])
    }

    fn get_artist(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.request("getArtist", &Self::id_param(id))
    }

    fn get_album(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.request("getAlbum", &Self::id_param(id))
    }

    fn get_song(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.request("getSong", &Self::id_param(id))
    }

    fn get_music_directory(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.request("getMusicDirectory", &Self::id_param(id))
    }

    fn get_playlists(&self) -> Result<SubsonicResponse, ApiError> {
        self.request("getPlaylists", &[])
    }

    fn get_playlist(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.request("getPlaylist", &Self::id_param(id))
    }

    fn create_playlist(
        &self,
        target: PlaylistTarget<'_>,
        song_ids: &[String],
    ) -> Result<SubsonicResponse, ApiError> {
        let mut params = match target {
            PlaylistTarget::New { name } => vec![("name".to_string(), name.to_string())],
            PlaylistTarget::Replace { playlist_id } => {
                vec![("playlistId".to_string(), playlist_id.to_string())]
            }
        };
        for song_id in song_ids {
            params.push(("songId".to_string(), song_id.clone()));
        }
        self.request("createPlaylist", &params)
    }

    fn delete_playlist(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.request("deletePlaylist", &Self::id_param(id))
    }

    fn get_album_list(
        &self,
        list_type: &str,
        size: u32,
        offset: u32,
    ) -> Result<SubsonicResponse, ApiError> {
        self.request(
            "getAlbumList2",
            &[
                ("type".to_string(), list_type.to_string()),
                ("size".to_string(), size.to_string()),
                ("offset".to_string(), offset.to_string()),
            ],
        )
    }

    fn get_random_songs(&self, size: u32) -> Result<SubsonicResponse, ApiError> {
        self.request(
            "getRandomSongs",
            &[("size".to_string(), size.to_string())],
        )
    }

    fn stream_url(&self, song_id: &str, censored: bool) -> String {
        self.view_url("stream", &Self::id_param(song_id), censored)
    }

    fn cover_art_url(&self, cover_id: &str, censored: bool) -> String {
        self.view_url("getCoverArt", &Self::id_param(cover_id), censored)
    }

    fn endpoint(&self) -> &str {
        &self.auth.endpoint
    }
}
