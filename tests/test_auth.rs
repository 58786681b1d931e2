//! OAuth flow tests against a mock token endpoint.

mod common;

use drivekit::auth::oauth::{self, ClientSecrets, Redirect};
use drivekit::auth::token::StoredToken;
use mockito::Matcher;
use pretty_assertions::assert_eq;

fn secrets_for(server: &mockito::Server) -> ClientSecrets {
    ClientSecrets::from_json(&format!(
        r#"{{
            "installed": {{
                "client_id": "test-client.apps.googleusercontent.com",
                "client_secret": "test-secret",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "{}/token"
            }}
        }}"#,
        server.url()
    ))
    .unwrap()
}

#[test]
fn test_exchange_code_stores_tokens() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("code".into(), "4/abc".into()),
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded(
                "redirect_uri".into(),
                "urn:ietf:wg:oauth:2.0:oob".into(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"access_token": "ya29.fresh", "refresh_token": "1//r", "expires_in": 3599, "token_type": "Bearer"}"#,
        )
        .create();

    let secrets = secrets_for(&server);
    let token = oauth::exchange_code(&secrets, "4/abc", Redirect::Oob).unwrap();
    mock.assert();

    assert_eq!(token.access_token, "ya29.fresh");
    assert_eq!(token.refresh_token.as_deref(), Some("1//r"));
    assert!(!token.is_expired());
}

#[test]
fn test_exchange_rejected_code_reports_body() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create();

    let secrets = secrets_for(&server);
    let err = oauth::exchange_code(&secrets, "bad", Redirect::Oob).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("HTTP 400"), "got: {message}");
    assert!(message.contains("invalid_grant"), "got: {message}");
}

#[test]
fn test_refresh_keeps_old_refresh_token() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/token")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "refresh_token".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "ya29.refreshed", "expires_in": 3600}"#)
        .create();

    let secrets = secrets_for(&server);
    let token = oauth::refresh(&secrets, "1//old").unwrap();
    mock.assert();

    assert_eq!(token.access_token, "ya29.refreshed");
    // the endpoint omitted the refresh token; the old one survives
    assert_eq!(token.refresh_token.as_deref(), Some("1//old"));
}

#[test]
fn test_token_cache_round_trip_on_disk() {
    let (tmp, _config) = common::temp_project();
    common::write_token(tmp.path(), 3600, true);

    let token = StoredToken::load(&tmp.path().join("token.json")).unwrap();
    assert_eq!(token.access_token, "ya29.cached");
    assert!(!token.is_expired());

    let rewritten = tmp.path().join("rewritten.json");
    token.save(&rewritten).unwrap();
    let reloaded = StoredToken::load(&rewritten).unwrap();
    assert_eq!(reloaded.access_token, token.access_token);
}

#[test]
fn test_secrets_file_loading() {
    let (tmp, _config) = common::temp_project();
    common::write_client_secrets(tmp.path(), "https://oauth2.googleapis.com/token");

    let secrets = ClientSecrets::from_file(&tmp.path().join("credentials.json")).unwrap();
    assert_eq!(secrets.client_id, "test-client.apps.googleusercontent.com");

    let url = oauth::authorization_url(&secrets, Redirect::Localhost).unwrap();
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080"));
}
