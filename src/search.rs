//! Field-constrained search composed from cascading strategies.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::backends::SearchCaps;
use crate::catalog::{translate, CatalogGateway};
use crate::library::virtual_dirs::VirtualDirectoryId;
use crate::library::LibraryResolver;
use crate::models::{SearchResult, Track};
use crate::uri;

/// Field name to the values requested for it. Only the first value of a field is used.
pub type SearchQuery = BTreeMap<String, Vec<String>>;

pub const FIELD_ARTIST: &str = "artist";
pub const FIELD_ALBUM: &str = "album";
pub const FIELD_TRACK_NAME: &str = "track_name";
pub const FIELD_COMMENT: &str = "comment";
pub const FIELD_ANY: &str = "any";

const RANDOM_COMMENT: &str = "random";

/// Strategy picked for a query, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Strategy<'q> {
    ArtistAlbumTrack {
        artist: &'q str,
        album: &'q str,
        track: &'q str,
    },
    ArtistAlbum {
        artist: &'q str,
        album: &'q str,
    },
    Artist(&'q str),
    Random,
    Any(&'q str),
    AllArtists,
}

fn first<'q>(query: &'q SearchQuery, field: &str) -> Option<&'q str> {
    query
        .get(field)
        .and_then(|values| values.first())
        .map(String::as_str)
}

impl<'q> Strategy<'q> {
    fn select(query: &'q SearchQuery) -> Self {
        let artist = first(query, FIELD_ARTIST);
        let album = first(query, FIELD_ALBUM);
        let track = first(query, FIELD_TRACK_NAME);
        match (artist, album, track) {
            (Some(artist), Some(album), Some(track)) => {
                return Strategy::ArtistAlbumTrack {
                    artist,
                    album,
                    track,
                }
            }
            (Some(artist), Some(album), None) => return Strategy::ArtistAlbum { artist, album },
            (Some(artist), _, _) => return Strategy::Artist(artist),
            _ => {}
        }
        if first(query, FIELD_COMMENT) == Some(RANDOM_COMMENT) {
            return Strategy::Random;
        }
        match first(query, FIELD_ANY) {
            Some(any) => Strategy::Any(any),
            None => Strategy::AllArtists,
        }
    }
}

/// Runs searches and distinct-value projections against the catalog.
pub struct SearchEngine {
    gateway: Arc<CatalogGateway>,
    resolver: Arc<LibraryResolver>,
}

impl SearchEngine {
    pub fn new(gateway: Arc<CatalogGateway>, resolver: Arc<LibraryResolver>) -> Self {
        Self { gateway, resolver }
    }

    /// Runs the highest-priority strategy the query qualifies for.
    ///
    /// Name matching in the artist/album strategies is a case-sensitive substring test.
    /// `exact` only affects the artist-only strategy.
    pub fn search(&self, query: &SearchQuery, exact: bool) -> SearchResult {
        let strategy = Strategy::select(query);
        debug!("Searching with {:?} (exact: {})", strategy, exact);
        match strategy {
            Strategy::ArtistAlbumTrack {
                artist,
                album,
                track,
            } => self
                .tracks_by_artist_and_album(artist, album)
                .into_iter()
                .find(|candidate| candidate.name.contains(track))
                .map(|found| SearchResult::from_tracks(vec![found]))
                .unwrap_or_default(),
            Strategy::ArtistAlbum { artist, album } => {
                SearchResult::from_tracks(self.tracks_by_artist_and_album(artist, album))
            }
            Strategy::Artist(artist) => self.search_by_artist(artist, exact),
            Strategy::Random => SearchResult::from_tracks(self.gateway.get_random_songs_as_tracks()),
            Strategy::Any(any) => self
                .gateway
                .find_as_search_result(any, self.gateway.search_caps())
                .unwrap_or_default(),
            Strategy::AllArtists => SearchResult::from_artists(self.gateway.get_artists_as_artists()),
        }
    }

    /// Every track of every album matching `album` under every artist matching `artist`.
    fn tracks_by_artist_and_album(&self, artist: &str, album: &str) -> Vec<Track> {
        let mut tracks = Vec::new();
        for artist_record in self
            .gateway
            .get_raw_artists()
            .iter()
            .filter(|record| translate::artist_name(record).contains(artist))
        {
            for album_record in self
                .gateway
                .get_raw_artist_albums(&artist_record.id)
                .iter()
                .filter(|record| translate::album_name(record).contains(album))
            {
                tracks.extend(self.gateway.get_songs_as_tracks(&album_record.id));
            }
        }
        tracks
    }

    fn search_by_artist(&self, artist: &str, exact: bool) -> SearchResult {
        let caps = SearchCaps::artists_only(self.gateway.settings().search_max_results);
        let Some(found) = self.gateway.find_raw(artist, caps) else {
            return SearchResult::default();
        };
        let mut result = SearchResult {
            uri: Some(uri::search_uri(artist)),
            ..SearchResult::default()
        };
        for record in found
            .artist
            .iter()
            .filter(|record| !exact || translate::artist_name(record) == artist)
        {
            result.artists.push(translate::artist_to_artist(record));
            result
                .tracks
                .extend(self.gateway.get_artist_tracks(&record.id));
        }
        result
    }

    /// Projects a full search onto one field.
    ///
    /// `track`, `title` and `track_name` list track names, `album` album names and
    /// `artist` artist names, falling back to every browsable artist when the search
    /// found none. Unknown fields list nothing.
    pub fn get_distinct(&self, field: &str, query: &SearchQuery) -> Vec<String> {
        let result = self.search(query, false);
        match field {
            "track" | "title" | FIELD_TRACK_NAME => {
                result.tracks.into_iter().map(|track| track.name).collect()
            }
            FIELD_ALBUM => result.albums.into_iter().map(|album| album.name).collect(),
            FIELD_ARTIST if result.artists.is_empty() => {
                let artists_uri = uri::vdir_uri(VirtualDirectoryId::Artists);
                self.resolver
                    .browse(&artists_uri)
                    .into_iter()
                    .map(|artist| artist.name)
                    .collect()
            }
            FIELD_ARTIST => result.artists.into_iter().map(|artist| artist.name).collect(),
            _ => {
                debug!("No distinct values for unknown field {}", field);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::virtual_dirs::VirtualDirectories;
    use crate::test_support::{gateway_with, FakeSubsonic};

    fn engine(fake: &FakeSubsonic) -> SearchEngine {
        let gateway = Arc::new(gateway_with(fake));
        let resolver = Arc::new(LibraryResolver::new(
            gateway.clone(),
            Arc::new(VirtualDirectories::new(true)),
        ));
        SearchEngine::new(gateway, resolver)
    }

    fn query(fields: &[(&str, &str)]) -> SearchQuery {
        let mut query = SearchQuery::new();
        for (field, value) in fields {
            query
                .entry(field.to_string())
                .or_default()
                .push(value.to_string());
        }
        query
    }

    fn track_names(result: &SearchResult) -> Vec<&str> {
        result.tracks.iter().map(|track| track.name.as_str()).collect()
    }

    fn catalog() -> FakeSubsonic {
        let fake = FakeSubsonic::new();
        fake.add_artist("ar1", "Miles Davis", &["al1", "al2"]);
        fake.add_artist("ar2", "Miles Davis Quintet", &["al3"]);
        fake.add_artist("ar3", "John Coltrane", &["al4"]);
        fake.add_album(
            "al1",
            "Kind of Blue",
            "ar1",
            &[("s1", "So What"), ("s2", "Freddie Freeloader"), ("s3", "Blue in Green")],
        );
        fake.add_album("al2", "Bitches Brew", "ar1", &[("s4", "Spanish Key")]);
        fake.add_album("al3", "Blue Haze", "ar2", &[("s5", "Four")]);
        fake.add_album("al4", "Blue Train", "ar3", &[("s6", "Moment's Notice")]);
        fake
    }

    #[test]
    fn test_strategy_priority() {
        let full = query(&[("artist", "a"), ("album", "b"), ("track_name", "c"), ("any", "d")]);
        assert!(matches!(
            Strategy::select(&full),
            Strategy::ArtistAlbumTrack { .. }
        ));
        assert!(matches!(
            Strategy::select(&query(&[("artist", "a"), ("album", "b"), ("comment", "random")])),
            Strategy::ArtistAlbum { .. }
        ));
        assert_eq!(
            Strategy::select(&query(&[("artist", "a"), ("any", "d")])),
            Strategy::Artist("a")
        );
        assert_eq!(
            Strategy::select(&query(&[("comment", "random"), ("any", "d")])),
            Strategy::Random
        );
        assert_eq!(
            Strategy::select(&query(&[("comment", "other"), ("any", "d")])),
            Strategy::Any("d")
        );
        assert_eq!(
            Strategy::select(&query(&[("album", "b")])),
            Strategy::AllArtists
        );
        let mut empty_values = SearchQuery::new();
        empty_values.insert("artist".to_string(), Vec::new());
        assert_eq!(Strategy::select(&empty_values), Strategy::AllArtists);
    }

    #[test]
    fn test_artist_album_track_returns_at_most_one_track() {
        let fake = catalog();
        let engine = engine(&fake);
        let result = engine.search(
            &query(&[("artist", "Miles"), ("album", "Blue"), ("track_name", "F")]),
            false,
        );
        assert_eq!(track_names(&result), vec!["Freddie Freeloader"]);
        assert!(!fake.methods_called().iter().any(|method| method == "search3"));

        let missing = engine.search(
            &query(&[("artist", "Miles"), ("album", "Blue"), ("track_name", "Nope")]),
            false,
        );
        assert!(missing.is_empty());
    }

    #[test]
    fn test_artist_album_concatenates_every_match() {
        let fake = catalog();
        let engine = engine(&fake);
        let result = engine.search(&query(&[("artist", "Miles"), ("album", "Blue")]), false);
        assert_eq!(
            track_names(&result),
            vec!["So What", "Freddie Freeloader", "Blue in Green", "Four"]
        );
    }

    #[test]
    fn test_artist_album_match_is_case_sensitive() {
        let fake = catalog();
        let engine = engine(&fake);
        let result = engine.search(&query(&[("artist", "miles"), ("album", "Blue")]), false);
        assert!(result.is_empty());
    }

    #[test]
    fn test_artist_search_expands_tracks() {
        let fake = catalog();
        let engine = engine(&fake);
        let result = engine.search(&query(&[("artist", "Miles Davis")]), false);
        assert_eq!(result.artists.len(), 2);
        assert_eq!(result.tracks.len(), 5);
        assert_eq!(result.uri.as_deref(), Some("subidy:search:Miles Davis"));
        assert_eq!(
            fake.calls_for("search3"),
            vec![vec!["Miles Davis", "100", "0", "0"]]
        );
    }

    #[test]
    fn test_exact_artist_search_keeps_equal_names_only() {
        let fake = catalog();
        let engine = engine(&fake);
        let result = engine.search(&query(&[("artist", "Miles Davis")]), true);
        assert_eq!(result.artists.len(), 1);
        assert_eq!(result.artists[0].name, "Miles Davis");
        assert_eq!(result.tracks.len(), 4);
    }

    #[test]
    fn test_random_comment_returns_random_tracks() {
        let fake = catalog();
        fake.set_random_songs(&["One", "Two"]);
        let engine = engine(&fake);
        let result = engine.search(&query(&[("comment", "random")]), false);
        assert_eq!(track_names(&result), vec!["One", "Two"]);
        assert_eq!(fake.methods_called(), vec!["getRandomSongs"]);
    }

    #[test]
    fn test_any_runs_one_combined_search() {
        let fake = catalog();
        let engine = engine(&fake);
        let result = engine.search(&query(&[("any", "blue")]), false);
        assert_eq!(fake.methods_called(), vec!["search3"]);
        assert_eq!(result.albums.len(), 3);
        assert_eq!(track_names(&result), vec!["Blue in Green"]);
    }

    #[test]
    fn test_no_recognized_field_lists_all_artists() {
        let fake = catalog();
        let engine = engine(&fake);
        let result = engine.search(&SearchQuery::new(), false);
        assert_eq!(result.artists.len(), 3);
        assert!(result.tracks.is_empty());
        assert_eq!(fake.methods_called(), vec!["getArtists"]);
    }

    #[test]
    fn test_failing_branch_yields_empty_result() {
        let fake = catalog();
        fake.fail("search3");
        let engine = engine(&fake);
        assert!(engine.search(&query(&[("any", "blue")]), false).is_empty());
        assert!(engine.search(&query(&[("artist", "Miles")]), false).is_empty());
    }

    #[test]
    fn test_distinct_projects_one_field() {
        let fake = catalog();
        let engine = engine(&fake);
        assert_eq!(
            engine.get_distinct("track", &query(&[("artist", "Miles"), ("album", "Brew")])),
            vec!["Spanish Key"]
        );
        assert_eq!(
            engine.get_distinct("album", &query(&[("any", "Train")])),
            vec!["Blue Train"]
        );
        assert_eq!(
            engine.get_distinct("artist", &query(&[("any", "Coltrane")])),
            vec!["John Coltrane"]
        );
        assert!(engine.get_distinct("genre", &SearchQuery::new()).is_empty());
    }

    #[test]
    fn test_distinct_artist_falls_back_to_browsed_artists() {
        let fake = catalog();
        let engine = engine(&fake);
        let artists = engine.get_distinct("artist", &query(&[("any", "zzz")]));
        assert_eq!(
            artists,
            vec!["John Coltrane", "Miles Davis", "Miles Davis Quintet"]
        );
    }
}
