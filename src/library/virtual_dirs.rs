//! Synthetic top-level browse directories with no remote identifier.

use crate::models::Ref;
use crate::uri;

/// Closed set of virtual directory identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualDirectoryId {
    Root,
    Artists,
    Albums,
    RootDirectories,
    Random,
}

impl VirtualDirectoryId {
    pub const ALL: [VirtualDirectoryId; 5] = [
        VirtualDirectoryId::Root,
        VirtualDirectoryId::Artists,
        VirtualDirectoryId::Albums,
        VirtualDirectoryId::RootDirectories,
        VirtualDirectoryId::Random,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VirtualDirectoryId::Root => "root",
            VirtualDirectoryId::Artists => "artists",
            VirtualDirectoryId::Albums => "albums",
            VirtualDirectoryId::RootDirectories => "rootdirs",
            VirtualDirectoryId::Random => "random",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|vdir| vdir.as_str() == id)
    }

    fn display_name(self) -> &'static str {
        match self {
            VirtualDirectoryId::Root => "Subsonic",
            VirtualDirectoryId::Artists => "Artists",
            VirtualDirectoryId::Albums => "Albums",
            VirtualDirectoryId::RootDirectories => "Directories",
            VirtualDirectoryId::Random => "Random",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDirectory {
    pub id: VirtualDirectoryId,
    pub name: &'static str,
    pub uri: String,
}

impl VirtualDirectory {
    pub fn to_ref(&self) -> Ref {
        Ref::directory(self.uri.clone(), self.name)
    }
}

/// Immutable table of virtual directories, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct VirtualDirectories {
    entries: Vec<VirtualDirectory>,
    root_children: Vec<VirtualDirectoryId>,
}

impl VirtualDirectories {
    /// Builds the table. `show_random` adds the Random entry under root.
    pub fn new(show_random: bool) -> Self {
        let entries = VirtualDirectoryId::ALL
            .into_iter()
            .map(|id| VirtualDirectory {
                id,
                name: id.display_name(),
                uri: uri::vdir_uri(id),
            })
            .collect();
        let mut root_children = vec![
            VirtualDirectoryId::RootDirectories,
            VirtualDirectoryId::Artists,
            VirtualDirectoryId::Albums,
        ];
        if show_random {
            root_children.push(VirtualDirectoryId::Random);
        }
        Self {
            entries,
            root_children,
        }
    }

    pub fn get(&self, id: VirtualDirectoryId) -> &VirtualDirectory {
        // `entries` follows declaration order of the enum.
        &self.entries[id as usize]
    }

    pub fn root(&self) -> &VirtualDirectory {
        self.get(VirtualDirectoryId::Root)
    }

    /// Refs listed under root, sorted by display name.
    pub fn root_listing(&self) -> Vec<Ref> {
        let mut children: Vec<&VirtualDirectory> = self
            .root_children
            .iter()
            .map(|id| self.get(*id))
            .collect();
        children.sort_by_key(|vdir| vdir.name);
        children.into_iter().map(VirtualDirectory::to_ref).collect()
    }
}
