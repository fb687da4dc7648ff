//! Keyring storage for the Subsonic password.

use keyring::Entry;

use crate::config::SubsonicConfig;
use crate::error::InitError;

const SUBSONIC_SERVICE_NAME: &str = "subidy.subsonic";

/// Keyring account name for a server login.
pub fn account_name(config: &SubsonicConfig) -> String {
    format!("{}@{}", config.username, config.url)
}

fn subsonic_entry(account: &str) -> Result<Entry, InitError> {
    Entry::new(SUBSONIC_SERVICE_NAME, account)
        .map_err(|err| InitError::Keyring(format!("failed to create keyring entry: {err}")))
}

/// Saves the password for a server login into the OS keyring.
pub fn set_password(config: &SubsonicConfig, password: &str) -> Result<(), InitError> {
    subsonic_entry(&account_name(config))?
        .set_password(password)
        .map_err(|err| InitError::Keyring(format!("failed to set keyring password: {err}")))
}

/// Loads the password for a server login from the OS keyring.
pub fn get_password(config: &SubsonicConfig) -> Result<Option<String>, InitError> {
    match subsonic_entry(&account_name(config))?.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(InitError::Keyring(format!(
            "failed to get keyring password: {err}"
        ))),
    }
}

/// Password from config when set, otherwise from the keyring.
pub fn resolve_password(config: &SubsonicConfig) -> Result<String, InitError> {
    if !config.password.is_empty() {
        return Ok(config.password.clone());
    }
    get_password(config)?.ok_or_else(|| InitError::MissingPassword {
        account: account_name(config),
    })
}
