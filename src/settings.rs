//! Settings — parse .drivekit.toml with per-section defaults.
//!
//! Every section and every field is optional; a missing config file yields
//! the defaults wholesale. Credential and token paths are stored as written
//! and resolved against the config file's directory via [`crate::resolve`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::resolve;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub drive: DriveSettings,
    #[serde(default)]
    pub check: CheckSettings,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub watch: WatchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// OAuth client secrets file (Google Cloud Console download).
    #[serde(default = "default_credentials")]
    pub credentials: String,
    /// Cached OAuth token.
    #[serde(default = "default_token")]
    pub token: String,
    /// Service-account key file.
    #[serde(default = "default_service_account")]
    pub service_account: String,
    /// Redirect preset: oob, localhost or server.
    #[serde(default = "default_redirect")]
    pub redirect: String,
}

fn default_credentials() -> String {
    "credentials.json".to_string()
}
fn default_token() -> String {
    "token.json".to_string()
}
fn default_service_account() -> String {
    "service-account-credentials.json".to_string()
}
fn default_redirect() -> String {
    "oob".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            credentials: default_credentials(),
            token: default_token(),
            service_account: default_service_account(),
            redirect: default_redirect(),
        }
    }
}

impl AuthSettings {
    pub fn credentials_path(&self, base: &Path) -> PathBuf {
        resolve::resolve_in(base, &self.credentials)
    }

    pub fn token_path(&self, base: &Path) -> PathBuf {
        resolve::resolve_in(base, &self.token)
    }

    pub fn service_account_path(&self, base: &Path) -> PathBuf {
        resolve::resolve_in(base, &self.service_account)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveSettings {
    /// Slash-separated destination folder chain for uploads.
    #[serde(default = "default_folder_path")]
    pub folder_path: String,
    /// Shared Drive name; empty means the service account's own drive.
    #[serde(default)]
    pub shared_drive: String,
}

fn default_folder_path() -> String {
    "Shop-Backups/Weekly-Backups".to_string()
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            folder_path: default_folder_path(),
            shared_drive: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSettings {
    /// Base URL of the shop API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Postgres connection string; falls back to DATABASE_URL.
    #[serde(default)]
    pub database_url: String,
    /// Host substring that marks a URL as CDN-hosted.
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,
    /// Path prefix that marks a URL as stored locally.
    #[serde(default = "default_local_prefix")]
    pub local_prefix: String,
    /// Products sampled by `check db`.
    #[serde(default = "default_sample_limit")]
    pub sample_limit: i64,
}

fn default_api_base() -> String {
    "http://localhost:5000".to_string()
}
fn default_cdn_host() -> String {
    "cloudinary.com".to_string()
}
fn default_local_prefix() -> String {
    "/uploads/".to_string()
}
fn default_sample_limit() -> i64 {
    5
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            database_url: String::new(),
            cdn_host: default_cdn_host(),
            local_prefix: default_local_prefix(),
            sample_limit: default_sample_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Directory the backend writes uploads into.
    #[serde(default = "default_sync_source")]
    pub source: String,
    /// Mirror directory served to the frontend.
    #[serde(default = "default_sync_target")]
    pub target: String,
}

fn default_sync_source() -> String {
    "backend/uploads".to_string()
}
fn default_sync_target() -> String {
    "uploads".to_string()
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            source: default_sync_source(),
            target: default_sync_target(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    #[serde(default)]
    pub notify: bool,
}

fn default_poll_interval() -> u64 {
    300
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            poll_interval: 300,
            notify: false,
        }
    }
}

/// Load settings, returning them with the directory relative paths
/// resolve against.
///
/// A missing file is not an error; defaults apply.
pub fn load(path: Option<&Path>) -> Result<(Settings, PathBuf)> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => resolve::config_path(),
    };
    let base = resolve::base_dir(&path);
    if !path.exists() {
        return Ok((Settings::default(), base));
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Invalid config at {}", path.display()))?;
    Ok((settings, base))
}
