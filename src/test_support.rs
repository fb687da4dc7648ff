//! In-memory Subsonic server used by unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::backends::records::{
    AlbumListRecord, AlbumRecord, ArtistRecord, ChildRecord, DirectoryRecord, ErrorRecord,
    IndexRecord, IndexesRecord, PlaylistRecord, PlaylistsRecord, SearchResultRecord,
    SongsRecord, SubsonicResponse,
};
use crate::backends::{PlaylistTarget, SearchCaps, SubsonicApi};
use crate::catalog::{CatalogGateway, CatalogSettings};
use crate::error::ApiError;

#[derive(Default)]
struct FakeState {
    artists: Vec<ArtistRecord>,
    albums: BTreeMap<String, AlbumRecord>,
    songs: BTreeMap<String, ChildRecord>,
    directories: BTreeMap<String, DirectoryRecord>,
    root_folders: Vec<ArtistRecord>,
    listed_albums: Vec<AlbumRecord>,
    random_songs: Vec<ChildRecord>,
    playlists: Vec<PlaylistRecord>,
    next_playlist_id: u32,
    echo_created_playlist: bool,
    failing: HashSet<String>,
    rejecting: HashSet<String>,
    calls: Vec<(String, Vec<String>)>,
}

/// Scripted `SubsonicApi` with a call log. Clones share state.
#[derive(Clone, Default)]
pub(crate) struct FakeSubsonic {
    state: Arc<Mutex<FakeState>>,
}

pub(crate) fn gateway_with(fake: &FakeSubsonic) -> CatalogGateway {
    gateway_with_settings(fake, CatalogSettings::default())
}

pub(crate) fn gateway_with_settings(
    fake: &FakeSubsonic,
    settings: CatalogSettings,
) -> CatalogGateway {
    CatalogGateway::new(Arc::new(fake.clone()), settings)
}

pub(crate) fn song(id: &str, title: &str, album_id: &str, track: u32) -> ChildRecord {
    ChildRecord {
        id: id.to_string(),
        title: Some(title.to_string()),
        album_id: Some(album_id.to_string()),
        track: Some(track),
        duration: Some(200),
        ..ChildRecord::default()
    }
}

impl FakeSubsonic {
    pub(crate) fn new() -> Self {
        let fake = Self::default();
        fake.state().echo_created_playlist = true;
        fake
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state lock poisoned")
    }

    /// Makes every call to `method` fail at the transport level.
    pub(crate) fn fail(&self, method: &str) {
        self.state().failing.insert(method.to_string());
    }

    /// Makes every call to `method` answer with a failed status.
    pub(crate) fn reject(&self, method: &str) {
        self.state().rejecting.insert(method.to_string());
    }

    pub(crate) fn set_echo_created_playlist(&self, echo: bool) {
        self.state().echo_created_playlist = echo;
    }

    pub(crate) fn add_artist(&self, id: &str, name: &str, album_ids: &[&str]) {
        let albums = album_ids
            .iter()
            .map(|album_id| AlbumRecord {
                id: album_id.to_string(),
                ..AlbumRecord::default()
            })
            .collect();
        self.state().artists.push(ArtistRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            album_count: Some(album_ids.len() as u32),
            album: albums,
        });
    }

    pub(crate) fn add_album(&self, id: &str, name: &str, artist_id: &str, songs: &[(&str, &str)]) {
        let records: Vec<ChildRecord> = songs
            .iter()
            .enumerate()
            .map(|(index, (song_id, title))| song(song_id, title, id, index as u32 + 1))
            .collect();
        let mut state = self.state();
        for record in &records {
            state.songs.insert(record.id.clone(), record.clone());
        }
        state.albums.insert(
            id.to_string(),
            AlbumRecord {
                id: id.to_string(),
                name: Some(name.to_string()),
                artist_id: Some(artist_id.to_string()),
                song_count: Some(records.len() as u32),
                song: records,
                ..AlbumRecord::default()
            },
        );
    }

    /// Adds a directory whose children are `(name, is_dir, track)`; child ids equal names.
    pub(crate) fn add_directory(&self, id: &str, children: &[(&str, bool, Option<u32>)]) {
        let child = children
            .iter()
            .map(|(name, is_dir, track)| ChildRecord {
                id: name.to_string(),
                parent: Some(id.to_string()),
                is_dir: *is_dir,
                title: Some(name.to_string()),
                track: *track,
                ..ChildRecord::default()
            })
            .collect();
        self.state().directories.insert(
            id.to_string(),
            DirectoryRecord {
                id: id.to_string(),
                name: Some(id.to_string()),
                parent: None,
                child,
            },
        );
    }

    pub(crate) fn add_root_folder(&self, id: &str, name: &str) {
        self.state().root_folders.push(ArtistRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            ..ArtistRecord::default()
        });
    }

    /// Adds `count` albums named `Album <n>` to the paged album list.
    pub(crate) fn add_listed_albums(&self, count: usize) {
        let mut state = self.state();
        for index in 0..count {
            state.listed_albums.push(AlbumRecord {
                id: format!("al-{index}"),
                name: Some(format!("Album {index}")),
                ..AlbumRecord::default()
            });
        }
    }

    pub(crate) fn set_random_songs(&self, titles: &[&str]) {
        self.state().random_songs = titles
            .iter()
            .enumerate()
            .map(|(index, title)| song(&format!("r{index}"), title, "random", 1))
            .collect();
    }

    pub(crate) fn add_playlist(&self, id: &str, name: &str, song_ids: &[&str]) {
        let mut state = self.state();
        let entry = song_ids
            .iter()
            .filter_map(|song_id| state.songs.get(*song_id).cloned())
            .collect();
        state.playlists.push(PlaylistRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            song_count: Some(song_ids.len() as u32),
            entry,
        });
    }

    pub(crate) fn call_count(&self, method: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|(called, _)| called == method)
            .count()
    }

    pub(crate) fn calls_for(&self, method: &str) -> Vec<Vec<String>> {
        self.state()
            .calls
            .iter()
            .filter(|(called, _)| called == method)
            .map(|(_, args)| args.clone())
            .collect()
    }

    pub(crate) fn methods_called(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    fn answer<F>(&self, method: &str, args: &[&str], build: F) -> Result<SubsonicResponse, ApiError>
    where
        F: FnOnce(&mut FakeState) -> SubsonicResponse,
    {
        let mut state = self.state();
        state.calls.push((
            method.to_string(),
            args.iter().map(|arg| arg.to_string()).collect(),
        ));
        if state.failing.contains(method) {
            return Err(ApiError::Transport {
                method: method.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        if state.rejecting.contains(method) {
            return Ok(SubsonicResponse {
                status: "failed".to_string(),
                error: Some(ErrorRecord {
                    code: 0,
                    message: Some("rejected by fake".to_string()),
                }),
                ..SubsonicResponse::default()
            });
        }
        Ok(build(&mut *state))
    }

    fn alphabetical_index(artists: &[ArtistRecord]) -> IndexesRecord {
        let mut letters: BTreeMap<String, Vec<ArtistRecord>> = BTreeMap::new();
        for artist in artists {
            let letter = artist
                .name
                .as_deref()
                .and_then(|name| name.chars().next())
                .map(|ch| ch.to_uppercase().to_string())
                .unwrap_or_else(|| "#".to_string());
            letters.entry(letter).or_default().push(artist.clone());
        }
        IndexesRecord {
            index: letters
                .into_iter()
                .map(|(name, artist)| IndexRecord {
                    name: Some(name),
                    artist,
                })
                .collect(),
            child: Vec::new(),
        }
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|text| text.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

impl SubsonicApi for FakeSubsonic {
    fn ping(&self) -> Result<SubsonicResponse, ApiError> {
        self.answer("ping", &[], |_| SubsonicResponse::ok())
    }

    fn search(&self, query: &str, caps: SearchCaps) -> Result<SubsonicResponse, ApiError> {
        let counts = [
            caps.artists.to_string(),
            caps.albums.to_string(),
            caps.songs.to_string(),
        ];
        self.answer(
            "search3",
            &[query, counts[0].as_str(), counts[1].as_str(), counts[2].as_str()],
            |state| {
                let artist = state
                    .artists
                    .iter()
                    .filter(|artist| contains_ignore_case(artist.name.as_deref(), query))
                    .take(caps.artists as usize)
                    .cloned()
                    .collect();
                let album = state
                    .albums
                    .values()
                    .filter(|album| contains_ignore_case(album.name.as_deref(), query))
                    .take(caps.albums as usize)
                    .map(|album| AlbumRecord {
                        song: Vec::new(),
                        ..album.clone()
                    })
                    .collect();
                let song = state
                    .songs
                    .values()
                    .filter(|song| contains_ignore_case(song.title.as_deref(), query))
                    .take(caps.songs as usize)
                    .cloned()
                    .collect();
                SubsonicResponse {
                    search_result3: Some(SearchResultRecord {
                        artist,
                        album,
                        song,
                    }),
                    ..SubsonicResponse::ok()
                }
            },
        )
    }

    fn get_indexes(&self) -> Result<SubsonicResponse, ApiError> {
        self.answer("getIndexes", &[], |state| SubsonicResponse {
            indexes: Some(Self::alphabetical_index(&state.root_folders)),
            ..SubsonicResponse::ok()
        })
    }

    fn get_artists(&self) -> Result<SubsonicResponse, ApiError> {
        self.answer("getArtists", &[], |state| SubsonicResponse {
            artists: Some(Self::alphabetical_index(&state.artists)),
            ..SubsonicResponse::ok()
        })
    }

    fn get_artist(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.answer("getArtist", &[id], |state| {
            let artist = state.artists.iter().find(|artist| artist.id == id).map(|artist| {
                let album = artist
                    .album
                    .iter()
                    .map(|stub| {
                        state
                            .albums
                            .get(&stub.id)
                            .map(|album| AlbumRecord {
                                song: Vec::new(),
                                ..album.clone()
                            })
                            .unwrap_or_else(|| stub.clone())
                    })
                    .collect();
                ArtistRecord {
                    album,
                    ..artist.clone()
                }
            });
            SubsonicResponse {
                artist,
                ..SubsonicResponse::ok()
            }
        })
    }

    fn get_album(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.answer("getAlbum", &[id], |state| SubsonicResponse {
            album: state.albums.get(id).cloned(),
            ..SubsonicResponse::ok()
        })
    }

    fn get_song(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.answer("getSong", &[id], |state| SubsonicResponse {
            song: state.songs.get(id).cloned(),
            ..SubsonicResponse::ok()
        })
    }

    fn get_music_directory(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.answer("getMusicDirectory", &[id], |state| SubsonicResponse {
            directory: state.directories.get(id).cloned(),
            ..SubsonicResponse::ok()
        })
    }

    fn get_playlists(&self) -> Result<SubsonicResponse, ApiError> {
        self.answer("getPlaylists", &[], |state| SubsonicResponse {
            playlists: Some(PlaylistsRecord {
                playlist: state
                    .playlists
                    .iter()
                    .map(|playlist| PlaylistRecord {
                        entry: Vec::new(),
                        ..playlist.clone()
                    })
                    .collect(),
            }),
            ..SubsonicResponse::ok()
        })
    }

    fn get_playlist(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.answer("getPlaylist", &[id], |state| SubsonicResponse {
            playlist: state.playlists.iter().find(|p| p.id == id).cloned(),
            ..SubsonicResponse::ok()
        })
    }

    fn create_playlist(
        &self,
        target: PlaylistTarget<'_>,
        song_ids: &[String],
    ) -> Result<SubsonicResponse, ApiError> {
        let mut args: Vec<&str> = match target {
            PlaylistTarget::New { name } => vec!["name", name],
            PlaylistTarget::Replace { playlist_id } => vec!["playlistId", playlist_id],
        };
        args.extend(song_ids.iter().map(String::as_str));
        self.answer("createPlaylist", &args, |state| {
            let entry: Vec<ChildRecord> = song_ids
                .iter()
                .filter_map(|song_id| state.songs.get(song_id).cloned())
                .collect();
            let playlist = match target {
                PlaylistTarget::New { name } => {
                    state.next_playlist_id += 1;
                    let created = PlaylistRecord {
                        id: format!("new-{}", state.next_playlist_id),
                        name: Some(name.to_string()),
                        song_count: Some(entry.len() as u32),
                        entry,
                    };
                    state.playlists.push(created.clone());
                    created
                }
                PlaylistTarget::Replace { playlist_id } => {
                    match state.playlists.iter_mut().find(|p| p.id == playlist_id) {
                        Some(existing) => {
                            existing.song_count = Some(entry.len() as u32);
                            existing.entry = entry;
                            existing.clone()
                        }
                        None => {
                            return SubsonicResponse {
                                status: "failed".to_string(),
                                error: Some(ErrorRecord {
                                    code: 70,
                                    message: Some("Playlist not found".to_string()),
                                }),
                                ..SubsonicResponse::default()
                            }
                        }
                    }
                }
            };
            SubsonicResponse {
                playlist: state.echo_created_playlist.then_some(playlist),
                ..SubsonicResponse::ok()
            }
        })
    }

    fn delete_playlist(&self, id: &str) -> Result<SubsonicResponse, ApiError> {
        self.answer("deletePlaylist", &[id], |state| {
            state.playlists.retain(|playlist| playlist.id != id);
            SubsonicResponse::ok()
        })
    }

    fn get_album_list(
        &self,
        list_type: &str,
        size: u32,
        offset: u32,
    ) -> Result<SubsonicResponse, ApiError> {
        let size_text = size.to_string();
        let offset_text = offset.to_string();
        self.answer(
            "getAlbumList2",
            &[list_type, size_text.as_str(), offset_text.as_str()],
            |state| SubsonicResponse {
                album_list2: Some(AlbumListRecord {
                    album: state
                        .listed_albums
                        .iter()
                        .skip(offset as usize)
                        .take(size as usize)
                        .cloned()
                        .collect(),
                }),
                ..SubsonicResponse::ok()
            },
        )
    }

    fn get_random_songs(&self, size: u32) -> Result<SubsonicResponse, ApiError> {
        let size_text = size.to_string();
        self.answer("getRandomSongs", &[size_text.as_str()], |state| SubsonicResponse {
            random_songs: Some(SongsRecord {
                song: state
                    .random_songs
                    .iter()
                    .take(size as usize)
                    .cloned()
                    .collect(),
            }),
            ..SubsonicResponse::ok()
        })
    }

    fn stream_url(&self, song_id: &str, censored: bool) -> String {
        let user = if censored { "*****" } else { "alice" };
        format!("http://fake.local/rest/stream.view?u={user}&id={song_id}")
    }

    fn cover_art_url(&self, cover_id: &str, censored: bool) -> String {
        let user = if censored { "*****" } else { "alice" };
        format!("http://fake.local/rest/getCoverArt.view?u={user}&id={cover_id}")
    }

    fn endpoint(&self) -> &str {
        "http://fake.local"
    }
}
