//! Natural ordering for directory listings.

use std::cmp::Ordering;

use crate::backends::records::ChildRecord;

/// One run of a natural sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Text(String),
    Number(u128),
}

/// Case-insensitive, numeric-aware key: `"Track 2" < "Track 10"`.
///
/// The key always starts with a text run (possibly empty) and alternates, so runs at
/// the same position always have the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

impl NaturalKey {
    pub fn new(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut run = String::new();
        let mut in_digits = false;
        for ch in text.chars() {
            let is_digit = ch.is_ascii_digit();
            if is_digit != in_digits {
                segments.push(Self::finish_run(&run, in_digits));
                run.clear();
                in_digits = is_digit;
            }
            run.push(ch);
        }
        segments.push(Self::finish_run(&run, in_digits));
        Self(segments)
    }

    fn finish_run(run: &str, digits: bool) -> Segment {
        if digits {
            Segment::Number(run.parse().unwrap_or(u128::MAX))
        } else {
            Segment::Text(run.to_lowercase())
        }
    }
}

/// Sort key of a directory entry: sub-directories first by natural name, then songs
/// by track number (1 when absent).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKey {
    Directory(NaturalKey),
    Song(u32),
}

impl EntryKey {
    pub fn of(child: &ChildRecord) -> Self {
        if child.is_dir {
            EntryKey::Directory(NaturalKey::new(child.title.as_deref().unwrap_or_default()))
        } else {
            EntryKey::Song(child.track.unwrap_or(1))
        }
    }
}

/// Sorts directory children in place. Stable, so ties keep server order.
pub fn sort_entries(children: &mut [ChildRecord]) {
    children.sort_by_cached_key(EntryKey::of);
}

/// Natural comparison of two display names.
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    NaturalKey::new(left).cmp(&NaturalKey::new(right))
}
