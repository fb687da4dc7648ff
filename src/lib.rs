//! Subsonic music catalog backend: browse, lookup, search and playlists over a
//! remote Subsonic server, addressed through `subidy:` URIs.

pub mod backend;
pub mod backends;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod library;
pub mod models;
pub mod playback;
pub mod playlists;
pub mod search;
pub mod uri;

#[cfg(test)]
mod test_support;

pub use backend::SubidyBackend;
pub use config::Config;
pub use error::{ApiError, ConfigError, InitError};
pub use search::SearchQuery;
