//! Shared test fixtures and helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary project directory with a .drivekit.toml inside it.
/// Returns the tempdir and the config file path.
pub fn temp_project() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let config = tmp.path().join(".drivekit.toml");
    std::fs::write(&config, "").unwrap();
    (tmp, config)
}

/// Write a .drivekit.toml with the given content, returning its path.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join(".drivekit.toml");
    std::fs::write(&path, content).unwrap();
    path
}

/// Write a Google-format client secrets file pointing at the given
/// token endpoint.
pub fn write_client_secrets(dir: &Path, token_uri: &str) {
    let content = format!(
        r#"{{
  "installed": {{
    "client_id": "test-client.apps.googleusercontent.com",
    "client_secret": "test-secret",
    "auth_uri": "https://accounts.google.com/o/oauth2/auth",
    "token_uri": "{token_uri}"
  }}
}}"#
    );
    std::fs::write(dir.join("credentials.json"), content).unwrap();
}

/// Write a cached token expiring the given number of seconds from now
/// (negative for already expired).
pub fn write_token(dir: &Path, expires_in_secs: i64, with_refresh: bool) {
    let expires_at = chrono::Utc::now() + chrono::Duration::seconds(expires_in_secs);
    let refresh = if with_refresh {
        r#""1//test-refresh""#
    } else {
        "null"
    };
    let content = format!(
        r#"{{
  "access_token": "ya29.cached",
  "refresh_token": {refresh},
  "token_type": "Bearer",
  "expires_at": "{}"
}}"#,
        expires_at.to_rfc3339()
    );
    std::fs::write(dir.join("token.json"), content).unwrap();
}
