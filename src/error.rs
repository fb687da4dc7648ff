//! Typed errors for the remote client, startup, and configuration loading.
//!
//! Catalog absence is never an error: the gateway converts every [`ApiError`]
//! into an empty or absent result before it reaches a consumer.

use thiserror::Error;

/// Failure of a single remote request before a response envelope was obtained.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("subsonic request failed ({method}): {reason}")]
    Transport { method: String, reason: String },

    #[error("subsonic response parse failed ({method}): {reason}")]
    Decode { method: String, reason: String },
}

/// Failure while bringing a backend instance up.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("unable to reach subsonic server at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("subsonic server at {url} rejected the connection (code {code}): {message}")]
    Rejected {
        url: String,
        code: i64,
        message: String,
    },

    #[error("no password configured for {account} and none stored in the system keyring")]
    MissingPassword { account: String },

    #[error("{0}")]
    Keyring(String),

    #[error("subsonic url and username must be set in {0}")]
    Unconfigured(String),
}

/// Failure while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} is not valid TOML: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no platform config directory available")]
    NoConfigDir,
}
