//! Backend entry point wiring the catalog components for a host.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::info;

use crate::backends::opensubsonic::OpenSubsonicClient;
use crate::backends::SubsonicApi;
use crate::catalog::CatalogGateway;
use crate::config::{Config, LibraryConfig};
use crate::error::InitError;
use crate::library::virtual_dirs::VirtualDirectories;
use crate::library::LibraryResolver;
use crate::models::{Entity, Ref, SearchResult};
use crate::playback::PlaybackResolver;
use crate::playlists::PlaylistManager;
use crate::search::{SearchEngine, SearchQuery};

/// One connected backend instance. Instances share no mutable state.
pub struct SubidyBackend {
    library: Arc<LibraryResolver>,
    search: SearchEngine,
    playlists: PlaylistManager,
    playback: PlaybackResolver,
}

impl SubidyBackend {
    /// Connects to the configured server and probes it once.
    pub fn connect(config: &Config, password: String) -> Result<Self, InitError> {
        let client = OpenSubsonicClient::new(config.subsonic.server_auth(password));
        Self::from_api(Arc::new(client), &config.library)
    }

    /// Builds a backend over any API implementation after a successful probe.
    pub fn from_api(api: Arc<dyn SubsonicApi>, library: &LibraryConfig) -> Result<Self, InitError> {
        probe(api.as_ref())?;
        info!("Connected to subsonic server at {}", api.endpoint());

        let gateway = Arc::new(CatalogGateway::new(api, library.catalog_settings()));
        let virtual_dirs = Arc::new(VirtualDirectories::new(library.show_random));
        let resolver = Arc::new(LibraryResolver::new(gateway.clone(), virtual_dirs));
        Ok(Self {
            search: SearchEngine::new(gateway.clone(), resolver.clone()),
            playlists: PlaylistManager::new(gateway.clone()),
            playback: PlaybackResolver::new(gateway),
            library: resolver,
        })
    }

    pub fn root_uri(&self) -> &str {
        self.library.root_uri()
    }

    pub fn browse(&self, uri: &str) -> Vec<Ref> {
        self.library.browse(uri)
    }

    pub fn lookup(&self, uri: &str) -> Vec<Entity> {
        self.library.lookup(uri)
    }

    pub fn lookup_many(&self, uris: &[String]) -> BTreeMap<String, Vec<Entity>> {
        self.library.lookup_many(uris)
    }

    pub fn search(&self, query: &SearchQuery, exact: bool) -> SearchResult {
        self.search.search(query, exact)
    }

    pub fn get_distinct(&self, field: &str, query: &SearchQuery) -> Vec<String> {
        self.search.get_distinct(field, query)
    }

    pub fn playlists(&self) -> &PlaylistManager {
        &self.playlists
    }

    pub fn resolve_stream_uri(&self, song_uri: &str) -> Option<String> {
        self.playback.resolve_stream_uri(song_uri)
    }

    pub fn resolve_cover_art_uri(&self, cover_id: &str) -> Option<String> {
        self.playback.resolve_cover_art_uri(cover_id)
    }
}

/// Connectivity probe. Any failure here is reported instead of degraded.
fn probe(api: &dyn SubsonicApi) -> Result<(), InitError> {
    let response = api.ping().map_err(|source| InitError::Unreachable {
        url: api.endpoint().to_string(),
        source,
    })?;
    if response.is_ok() {
        return Ok(());
    }
    let (code, message) = response
        .error
        .map(|error| (error.code, error.message.unwrap_or_default()))
        .unwrap_or((0, format!("status '{}'", response.status)));
    Err(InitError::Rejected {
        url: api.endpoint().to_string(),
        code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeSubsonic;

    fn backend(fake: &FakeSubsonic) -> Result<SubidyBackend, InitError> {
        SubidyBackend::from_api(Arc::new(fake.clone()), &LibraryConfig::default())
    }

    #[test]
    fn test_unreachable_server_is_an_init_error() {
        let fake = FakeSubsonic::new();
        fake.fail("ping");
        assert!(matches!(
            backend(&fake),
            Err(InitError::Unreachable { url, .. }) if url == "http://fake.local"
        ));
    }

    #[test]
    fn test_rejected_probe_reports_remote_reason() {
        let fake = FakeSubsonic::new();
        fake.reject("ping");
        match backend(&fake) {
            Err(InitError::Rejected { code, message, .. }) => {
                assert_eq!(code, 0);
                assert_eq!(message, "rejected by fake");
            }
            _ => panic!("expected a rejected probe"),
        }
    }

    #[test]
    fn test_connected_backend_serves_every_operation() {
        let fake = FakeSubsonic::new();
        fake.add_artist("ar1", "Artist", &["al1"]);
        fake.add_album("al1", "Album", "ar1", &[("s1", "Song")]);
        fake.add_playlist("p1", "Mix", &["s1"]);
        let backend = backend(&fake).expect("backend should connect");

        assert_eq!(backend.browse(backend.root_uri()).len(), 4);
        assert_eq!(backend.lookup("subidy:song:s1").len(), 1);
        assert_eq!(backend.lookup_many(&["subidy:album:al1".to_string()]).len(), 1);
        assert_eq!(backend.search(&SearchQuery::new(), false).artists.len(), 1);
        assert_eq!(
            backend.get_distinct("artist", &SearchQuery::new()),
            vec!["Artist"]
        );
        assert_eq!(backend.playlists().as_list().len(), 1);
        assert!(backend.resolve_stream_uri("subidy:song:s1").is_some());
        assert!(backend.resolve_cover_art_uri("al1").is_some());
        assert_eq!(fake.calls_for("ping").len(), 1);
    }
}
