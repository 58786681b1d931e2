//! Installed-app OAuth2 flow against Google's endpoints.
//!
//! Builds the authorization URL from a downloaded client-secrets file and
//! exchanges authorization codes / refresh tokens for access tokens. All
//! HTTP is synchronous; a failed call is reported and the command exits.

use anyhow::{Context, Result, bail};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::path::Path;

use super::token::StoredToken;

/// Only files the app itself created are touched.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Redirect URI presets the original tooling shipped separate scripts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// Out-of-band: Google shows the code for the user to copy.
    Oob,
    /// Loopback on port 8080; the code arrives on a local listener.
    Localhost,
    /// The shop backend's own OAuth callback route.
    Server,
}

impl Redirect {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "oob" => Ok(Self::Oob),
            "localhost" => Ok(Self::Localhost),
            "server" => Ok(Self::Server),
            other => bail!("Unknown redirect preset: {} (use oob, localhost or server)", other),
        }
    }

    pub fn uri(&self) -> &'static str {
        match self {
            Self::Oob => "urn:ietf:wg:oauth:2.0:oob",
            Self::Localhost => "http://localhost:8080",
            Self::Server => "http://localhost:5000/api/auth/google/callback",
        }
    }
}

/// Client secrets in Google's download format: the fields live under an
/// `installed` (desktop app) or `web` wrapper object.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}
fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "{} not found. Download it from Google Cloud Console (APIs & Services, \
                 Credentials, your OAuth client) and save it there.",
                path.display()
            )
        })?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid client secrets at {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(content)?;
        file.installed
            .or(file.web)
            .ok_or_else(|| anyhow::anyhow!("expected an 'installed' or 'web' section"))
    }
}

/// Build the authorization URL the user opens in a browser.
///
/// `access_type=offline` plus `prompt=consent` makes Google issue a refresh
/// token even when the app was authorized before.
pub fn authorization_url(secrets: &ClientSecrets, redirect: Redirect) -> Result<String> {
    let url = url::Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect.uri()),
            ("response_type", "code"),
            ("scope", DRIVE_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .with_context(|| format!("Invalid auth_uri: {}", secrets.auth_uri))?;
    Ok(url.to_string())
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_stored(self, fallback_refresh: Option<String>) -> StoredToken {
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(fallback_refresh),
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at: Utc::now() + Duration::seconds(self.expires_in.unwrap_or(3600)),
        }
    }
}

fn token_request(
    secrets: &ClientSecrets,
    form: &[(&str, &str)],
    what: &str,
) -> Result<TokenResponse> {
    match ureq::post(&secrets.token_uri).send_form(form) {
        Ok(response) => response
            .into_json::<TokenResponse>()
            .with_context(|| format!("{what}: unreadable token endpoint response")),
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            bail!("{what} failed: HTTP {code}: {}", body.trim());
        }
        Err(e) => Err(e).with_context(|| format!("{what}: request to token endpoint failed")),
    }
}

/// Exchange an authorization code for tokens. The redirect URI must match
/// the one the authorization URL carried.
pub fn exchange_code(
    secrets: &ClientSecrets,
    code: &str,
    redirect: Redirect,
) -> Result<StoredToken> {
    let response = token_request(
        secrets,
        &[
            ("code", code),
            ("client_id", &secrets.client_id),
            ("client_secret", &secrets.client_secret),
            ("redirect_uri", redirect.uri()),
            ("grant_type", "authorization_code"),
        ],
        "Code exchange",
    )?;
    Ok(response.into_stored(None))
}

/// Trade a refresh token for a fresh access token. Google may omit the
/// refresh token from the response; the old one is kept in that case.
pub fn refresh(secrets: &ClientSecrets, refresh_token: &str) -> Result<StoredToken> {
    let response = token_request(
        secrets,
        &[
            ("refresh_token", refresh_token),
            ("client_id", &secrets.client_id),
            ("client_secret", &secrets.client_secret),
            ("grant_type", "refresh_token"),
        ],
        "Token refresh",
    )?;
    Ok(response.into_stored(Some(refresh_token.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTALLED: &str = r#"{
        "installed": {
            "client_id": "abc123.apps.googleusercontent.com",
            "client_secret": "shhh",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token"
        }
    }"#;

    #[test]
    fn test_parse_installed_secrets() {
        let secrets = ClientSecrets::from_json(INSTALLED).unwrap();
        assert_eq!(secrets.client_id, "abc123.apps.googleusercontent.com");
        assert_eq!(secrets.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn test_parse_web_secrets() {
        let secrets = ClientSecrets::from_json(
            r#"{"web": {"client_id": "id", "client_secret": "s"}}"#,
        )
        .unwrap();
        assert_eq!(secrets.client_id, "id");
        // defaults fill the endpoint fields
        assert_eq!(secrets.auth_uri, DEFAULT_AUTH_URI);
    }

    #[test]
    fn test_parse_rejects_bare_object() {
        assert!(ClientSecrets::from_json(r#"{"client_id": "id"}"#).is_err());
    }

    #[test]
    fn test_redirect_presets() {
        assert_eq!(Redirect::parse("oob").unwrap().uri(), "urn:ietf:wg:oauth:2.0:oob");
        assert_eq!(Redirect::parse("localhost").unwrap().uri(), "http://localhost:8080");
        assert_eq!(
            Redirect::parse("server").unwrap().uri(),
            "http://localhost:5000/api/auth/google/callback"
        );
        assert!(Redirect::parse("popup").is_err());
    }

    #[test]
    fn test_authorization_url_contents() {
        let secrets = ClientSecrets::from_json(INSTALLED).unwrap();
        let url = authorization_url(&secrets, Redirect::Oob).unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(url.contains("client_id=abc123.apps.googleusercontent.com"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("urn%3Aietf%3Awg%3Aoauth%3A2.0%3Aoob"));
    }
}
