//! OAuth commands: print the authorization URL, exchange a pasted code,
//! run the combined login flow, inspect the cached token.

pub mod oauth;
pub mod token;

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::settings;
use crate::util;
use oauth::{ClientSecrets, Redirect};
use token::StoredToken;

fn pick_redirect(arg: Option<&str>, configured: &str) -> Result<Redirect> {
    Redirect::parse(arg.unwrap_or(configured))
}

/// drivekit auth url
pub fn url(redirect: Option<&str>, config: Option<&Path>) -> Result<()> {
    let (cfg, base) = settings::load(config)?;
    let secrets = ClientSecrets::from_file(&cfg.auth.credentials_path(&base))?;
    let redirect = pick_redirect(redirect, &cfg.auth.redirect)?;
    let auth_url = oauth::authorization_url(&secrets, redirect)?;

    println!("1. Open this URL in a browser:");
    println!("   {}", auth_url);
    println!();
    println!("2. Sign in and approve access");
    match redirect {
        Redirect::Oob => println!("3. Copy the code Google shows you"),
        Redirect::Localhost | Redirect::Server => {
            println!("3. Copy the 'code' parameter from the redirect URL")
        }
    }
    println!("4. Run: drivekit auth code <CODE>");
    Ok(())
}

/// drivekit auth code
pub fn code(code: Option<&str>, redirect: Option<&str>, config: Option<&Path>) -> Result<()> {
    let (cfg, base) = settings::load(config)?;
    let secrets = ClientSecrets::from_file(&cfg.auth.credentials_path(&base))?;
    let redirect = pick_redirect(redirect, &cfg.auth.redirect)?;

    let code = match code {
        Some(c) => c.trim().to_string(),
        None => util::prompt("Enter authorization code: ")?,
    };
    if code.is_empty() {
        bail!("No authorization code entered");
    }

    exchange_and_save(&secrets, &code, redirect, &cfg.auth.token_path(&base))
}

/// drivekit auth login
pub fn login(redirect: Option<&str>, browser: bool, config: Option<&Path>) -> Result<()> {
    let (cfg, base) = settings::load(config)?;
    let secrets = ClientSecrets::from_file(&cfg.auth.credentials_path(&base))?;
    let redirect = pick_redirect(redirect, &cfg.auth.redirect)?;
    let auth_url = oauth::authorization_url(&secrets, redirect)?;

    println!("Open this URL in a browser and approve access:");
    println!("  {}", auth_url);
    if browser {
        if let Err(e) = open::that(&auth_url) {
            eprintln!("Could not open a browser ({}); open the URL manually.", e);
        }
    }
    println!();

    let code = match redirect {
        Redirect::Localhost => wait_for_code()?,
        Redirect::Oob | Redirect::Server => util::prompt("Enter authorization code: ")?,
    };
    if code.is_empty() {
        bail!("No authorization code entered");
    }

    exchange_and_save(&secrets, &code, redirect, &cfg.auth.token_path(&base))
}

/// drivekit auth status
pub fn status(config: Option<&Path>) -> Result<()> {
    let (cfg, base) = settings::load(config)?;
    let path = cfg.auth.token_path(&base);
    if !path.exists() {
        println!("No token cached at {}", path.display());
        println!("Run 'drivekit auth login' to authorize.");
        return Ok(());
    }
    let token = StoredToken::load(&path)?;
    println!("Token cache: {}", path.display());
    println!("  expires:  {}", token.expires_at.to_rfc3339());
    println!(
        "  state:    {}",
        if token.is_expired() { "expired" } else { "valid" }
    );
    println!(
        "  refresh:  {}",
        if token.refresh_token.is_some() {
            "available"
        } else {
            "missing (re-run 'drivekit auth login')"
        }
    );
    Ok(())
}

fn exchange_and_save(
    secrets: &ClientSecrets,
    code: &str,
    redirect: Redirect,
    token_path: &Path,
) -> Result<()> {
    let token = oauth::exchange_code(secrets, code, redirect)
        .context("Check the code and try again")?;
    token.save(token_path)?;
    println!("Authentication successful.");
    println!("Token saved to {}", token_path.display());
    println!("Backups can now run unattended.");
    Ok(())
}

/// Catch the OAuth redirect on the loopback listener the `localhost`
/// preset points at. Ignores stray requests (favicon and the like) until
/// a code or an error parameter shows up.
fn wait_for_code() -> Result<String> {
    let server = tiny_http::Server::http("127.0.0.1:8080")
        .map_err(|e| anyhow::anyhow!("Failed to listen on 127.0.0.1:8080: {}", e))?;
    println!("Waiting for the redirect on http://localhost:8080 ...");

    for request in server.incoming_requests() {
        let full = format!("http://localhost:8080{}", request.url());
        let Ok(parsed) = url::Url::parse(&full) else {
            let _ = request.respond(tiny_http::Response::from_string("Bad request"));
            continue;
        };

        let mut code = None;
        let mut error = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(code) = code {
            let _ = request.respond(tiny_http::Response::from_string(
                "Authorization received. You can close this tab.",
            ));
            return Ok(code);
        }
        if let Some(error) = error {
            let _ = request.respond(tiny_http::Response::from_string(
                "Authorization failed. You can close this tab.",
            ));
            bail!("Authorization was denied: {}", error);
        }
        let _ = request.respond(tiny_http::Response::from_string("Waiting for authorization..."));
    }

    bail!("Listener closed before a code arrived")
}
