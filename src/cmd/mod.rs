//! Subcommand implementations

pub mod discover;
pub mod firmware;
pub mod init;

use color_eyre::eyre::{eyre, Result};

/// Environment variable carrying the BMC username
pub const USER_ENV: &str = "REDFISH_USER";
/// Environment variable carrying the BMC password
pub const PASSWORD_ENV: &str = "REDFISH_PASSWORD";

/// Read BMC credentials from the environment.
///
/// Checked before any network call so a missing variable fails fast, and
/// each variable gets its own error message.
pub fn redfish_credentials() -> Result<(String, String)> {
    let user = std::env::var(USER_ENV).unwrap_or_default();
    if user.is_empty() {
        return Err(eyre!("{USER_ENV} environment variable is required"));
    }
    let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
    if password.is_empty() {
        return Err(eyre!("{PASSWORD_ENV} environment variable is required"));
    }
    Ok((user, password))
}
