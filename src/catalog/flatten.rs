//! Depth-first, lazily fetched track sequence of a directory subtree.

use std::collections::HashSet;

use crate::backends::records::ChildRecord;
use crate::catalog::{translate, CatalogGateway};
use crate::models::Track;

/// Iterator over every track below a directory, in per-directory sorted order.
///
/// Traversal uses an explicit stack of pending sibling lists, so depth is bounded by
/// heap rather than call stack. Each sub-directory is fetched only when the iterator
/// reaches it; dropping the iterator stops the traversal. A directory id is expanded
/// at most once.
pub struct DirectoryTracks<'a> {
    gateway: &'a CatalogGateway,
    pending: Vec<std::vec::IntoIter<ChildRecord>>,
    expanded: HashSet<String>,
}

impl<'a> DirectoryTracks<'a> {
    pub(crate) fn new(gateway: &'a CatalogGateway, directory_id: &str) -> Self {
        let root = ChildRecord {
            id: directory_id.to_string(),
            is_dir: true,
            ..ChildRecord::default()
        };
        Self {
            gateway,
            pending: vec![vec![root].into_iter()],
            expanded: HashSet::new(),
        }
    }
}

impl Iterator for DirectoryTracks<'_> {
    type Item = Track;

    fn next(&mut self) -> Option<Track> {
        loop {
            let siblings = self.pending.last_mut()?;
            match siblings.next() {
                None => {
                    self.pending.pop();
                }
                Some(child) if child.is_dir => {
                    if self.expanded.insert(child.id.clone()) {
                        let children = self.gateway.get_raw_dir_children(&child.id);
                        self.pending.push(children.into_iter());
                    }
                }
                Some(song) => return Some(translate::song_to_track(&song)),
            }
        }
    }
}
