//! Persistent configuration model, defaults, and loading.

use std::path::{Path, PathBuf};

use log::info;

use crate::backends::ServerAuth;
use crate::catalog::CatalogSettings;
use crate::error::ConfigError;

const CONFIG_DIR_NAME: &str = "subidy";
const CONFIG_FILE_NAME: &str = "config.toml";
const MAX_PAGE_SIZE: u32 = 500;

/// Root configuration persisted to `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// Server connection settings.
    #[serde(default)]
    pub subsonic: SubsonicConfig,
    /// Browse and search tunables.
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Subsonic server connection settings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SubsonicConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    /// Empty means the password is read from the system keyring.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub legacy_auth: bool,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_client_name")]
    pub client_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct LibraryConfig {
    #[serde(default = "default_album_page_size")]
    pub album_page_size: u32,
    #[serde(default = "default_random_songs")]
    pub random_songs: u32,
    #[serde(default = "default_search_max_results")]
    pub search_max_results: u32,
    /// List the Random virtual directory under root.
    #[serde(default = "default_true")]
    pub show_random: bool,
}

impl Default for SubsonicConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            legacy_auth: false,
            api_version: default_api_version(),
            client_name: default_client_name(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            album_page_size: default_album_page_size(),
            random_songs: default_random_songs(),
            search_max_results: default_search_max_results(),
            show_random: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_api_version() -> String {
    "1.16.1".to_string()
}

fn default_client_name() -> String {
    "subidy".to_string()
}

fn default_album_page_size() -> u32 {
    500
}

fn default_random_songs() -> u32 {
    50
}

fn default_search_max_results() -> u32 {
    100
}

impl SubsonicConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.username.is_empty()
    }

    /// Connection details with the given resolved password.
    pub fn server_auth(&self, password: String) -> ServerAuth {
        ServerAuth {
            endpoint: self.url.clone(),
            username: self.username.clone(),
            password,
            legacy_auth: self.legacy_auth,
            api_version: self.api_version.clone(),
            client_name: self.client_name.clone(),
        }
    }
}

impl LibraryConfig {
    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            album_page_size: self.album_page_size,
            random_songs: self.random_songs,
            search_max_results: self.search_max_results,
        }
    }
}

/// Clamps numeric settings into supported ranges and normalizes the server URL.
pub fn sanitize_config(config: Config) -> Config {
    let url = config.subsonic.url.trim().trim_end_matches('/').to_string();
    let api_version = if config.subsonic.api_version.trim().is_empty() {
        default_api_version()
    } else {
        config.subsonic.api_version.trim().to_string()
    };
    let client_name = if config.subsonic.client_name.trim().is_empty() {
        default_client_name()
    } else {
        config.subsonic.client_name.trim().to_string()
    };

    Config {
        subsonic: SubsonicConfig {
            url,
            username: config.subsonic.username.trim().to_string(),
            api_version,
            client_name,
            ..config.subsonic
        },
        library: LibraryConfig {
            album_page_size: config.library.album_page_size.clamp(1, MAX_PAGE_SIZE),
            random_songs: config.library.random_songs.clamp(1, MAX_PAGE_SIZE),
            search_max_results: config.library.search_max_results.max(1),
            show_random: config.library.show_random,
        },
    }
}

/// `<config_dir>/subidy/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Reads and sanitizes the config at `path`, writing a default file first when missing.
pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let default_text = toml::to_string(&Config::default())?;
        std::fs::write(path, default_text).map_err(io_error)?;
        info!("Wrote default config to {}", path.display());
    }
    let config_text = std::fs::read_to_string(path).map_err(io_error)?;
    parse_config(&config_text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn parse_config(config_text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(config_text).map(sanitize_config)
}
