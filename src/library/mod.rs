//! Browse and lookup resolution keyed on URI kind.

pub mod virtual_dirs;

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::catalog::CatalogGateway;
use crate::models::{Entity, Ref};
use crate::uri::{self, UriKind};
use virtual_dirs::{VirtualDirectories, VirtualDirectoryId};

/// Resolves URIs to child listings or entities.
pub struct LibraryResolver {
    gateway: Arc<CatalogGateway>,
    virtual_dirs: Arc<VirtualDirectories>,
}

impl LibraryResolver {
    pub fn new(gateway: Arc<CatalogGateway>, virtual_dirs: Arc<VirtualDirectories>) -> Self {
        Self {
            gateway,
            virtual_dirs,
        }
    }

    pub fn root_uri(&self) -> &str {
        &self.virtual_dirs.root().uri
    }

    /// Lists the children of `uri`. Unknown or foreign URIs list nothing.
    pub fn browse(&self, uri: &str) -> Vec<Ref> {
        let Some(decoded) = uri::decode(uri) else {
            debug!("Browse of unrecognized uri {}", uri);
            return Vec::new();
        };
        match decoded.kind {
            UriKind::VirtualDirectory => match VirtualDirectoryId::parse(&decoded.id) {
                Some(vdir) => self.browse_virtual(vdir),
                None => Vec::new(),
            },
            UriKind::Directory if !decoded.id.is_empty() => {
                self.gateway.get_diritems_as_refs(&decoded.id)
            }
            UriKind::Artist if !decoded.id.is_empty() => {
                self.gateway.get_albums_as_refs(Some(&decoded.id))
            }
            UriKind::Album if !decoded.id.is_empty() => {
                self.gateway.get_songs_as_refs(&decoded.id)
            }
            _ => {
                debug!("Nothing to browse below {}", uri);
                Vec::new()
            }
        }
    }

    fn browse_virtual(&self, vdir: VirtualDirectoryId) -> Vec<Ref> {
        match vdir {
            VirtualDirectoryId::Root => self.virtual_dirs.root_listing(),
            VirtualDirectoryId::RootDirectories => self.gateway.get_rootdirs_as_refs(),
            VirtualDirectoryId::Artists => self.gateway.get_artists_as_refs(),
            VirtualDirectoryId::Albums => self.gateway.get_albums_as_refs(None),
            VirtualDirectoryId::Random => self.gateway.get_random_songs_as_refs(),
        }
    }

    /// Resolves `uri` to entities. Absent or unknown items resolve to an empty list.
    pub fn lookup(&self, uri: &str) -> Vec<Entity> {
        let Some(decoded) = uri::decode(uri) else {
            debug!("Lookup of unrecognized uri {}", uri);
            return Vec::new();
        };
        if decoded.id.is_empty() {
            return Vec::new();
        }
        let id = decoded.id.as_str();
        match decoded.kind {
            UriKind::Artist => self
                .gateway
                .get_artist_by_id(id)
                .map(Entity::Artist)
                .into_iter()
                .collect(),
            UriKind::Album => tracks(self.gateway.get_songs_as_tracks(id)),
            UriKind::Directory => self
                .gateway
                .flatten_directory_to_tracks(id)
                .map(Entity::Track)
                .collect(),
            UriKind::Song => self
                .gateway
                .get_song_by_id(id)
                .map(Entity::Track)
                .into_iter()
                .collect(),
            UriKind::Playlist => self
                .gateway
                .get_playlist_as_playlist(id)
                .map(|playlist| tracks(playlist.tracks))
                .unwrap_or_default(),
            UriKind::VirtualDirectory | UriKind::Search => Vec::new(),
        }
    }

    /// Resolves every URI independently, keyed by the input URI.
    pub fn lookup_many(&self, uris: &[String]) -> BTreeMap<String, Vec<Entity>> {
        uris.iter()
            .map(|uri| (uri.clone(), self.lookup(uri)))
            .collect()
    }
}

fn tracks(tracks: Vec<crate::models::Track>) -> Vec<Entity> {
    tracks.into_iter().map(Entity::Track).collect()
}
