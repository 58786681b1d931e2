//! Upload a backup file into the Drive folder structure.
//!
//! Folder segments are resolved find-or-create, the file itself is an
//! update-or-insert on its name. Two runs racing each other can still
//! create duplicate names; nothing here detects or repairs that.

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::auth::oauth::{self, ClientSecrets, DRIVE_SCOPE};
use crate::auth::token::StoredToken;
use crate::drive::{DriveClient, DriveFile, service_account};
use crate::settings;
use crate::util;

pub fn run(
    file: &Path,
    name: Option<&str>,
    dest: Option<&str>,
    shared_drive: Option<&str>,
    user: bool,
    config: Option<&Path>,
) -> Result<()> {
    let (cfg, base) = settings::load(config)?;

    if !file.is_file() {
        bail!("File not found: {}", file.display());
    }
    let data = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let remote_name = match name {
        Some(n) => n.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "backup".to_string()),
    };
    let mime_type = util::guess_mime(file);

    let access_token = if user {
        user_access_token(&cfg, &base)?
    } else {
        let key =
            service_account::ServiceAccountKey::from_file(&cfg.auth.service_account_path(&base))?;
        let token = service_account::access_token(&key, DRIVE_SCOPE)?;
        println!("Service account authenticated as {}", key.client_email);
        token
    };

    let drive_name = match shared_drive {
        Some(n) => Some(n.to_string()),
        None if !cfg.drive.shared_drive.is_empty() => Some(cfg.drive.shared_drive.clone()),
        None => None,
    };

    let mut client = DriveClient::new(&access_token);
    let mut parent: Option<String> = None;
    if let Some(drive_name) = &drive_name {
        client = client.all_drives(true);
        let drive = client.find_shared_drive(drive_name)?.ok_or_else(|| {
            anyhow::anyhow!(
                "Shared Drive '{}' not found. Create it in Google Drive and add the \
                 service account as a member.",
                drive_name
            )
        })?;
        println!("Shared Drive: {} ({})", drive.name, drive.id);
        parent = Some(drive.id);
    }

    let dest = dest.unwrap_or(&cfg.drive.folder_path);
    let folder_id = resolve_folder_path(&client, dest, parent.as_deref())?;

    println!(
        "Uploading {} ({}) as {}",
        file.display(),
        util::format_size(data.len() as u64),
        remote_name
    );
    let (uploaded, updated) = upsert_file(&client, &remote_name, &folder_id, &mime_type, &data)?;
    if updated {
        println!("Updated: {} (id {})", uploaded.name, uploaded.id);
    } else {
        println!("Uploaded: {} (id {})", uploaded.name, uploaded.id);
    }
    Ok(())
}

/// Walk a slash-separated folder path, creating missing segments,
/// and return the final folder's id.
pub fn resolve_folder_path(
    client: &DriveClient,
    path: &str,
    root_parent: Option<&str>,
) -> Result<String> {
    let mut parent: Option<String> = root_parent.map(|p| p.to_string());
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let id = find_or_create_folder(client, segment, parent.as_deref())?;
        parent = Some(id);
    }
    parent.ok_or_else(|| anyhow::anyhow!("Empty destination folder path"))
}

/// Locate a folder by name under a parent, creating it when absent.
pub fn find_or_create_folder(
    client: &DriveClient,
    name: &str,
    parent_id: Option<&str>,
) -> Result<String> {
    if let Some(existing) = client.find_folder(name, parent_id)? {
        return Ok(existing.id);
    }
    let created = client.create_folder(name, parent_id)?;
    println!("Created folder: {}", name);
    Ok(created.id)
}

/// Update the file in place when one of this name exists, create it
/// otherwise. Returns the file and whether it was an update.
pub fn upsert_file(
    client: &DriveClient,
    name: &str,
    folder_id: &str,
    mime_type: &str,
    data: &[u8],
) -> Result<(DriveFile, bool)> {
    match client.find_file(name, folder_id)? {
        Some(existing) => {
            let updated = client.update_content(&existing.id, mime_type, data)?;
            Ok((updated, true))
        }
        None => {
            let created = client.upload_new(name, folder_id, mime_type, data)?;
            Ok((created, false))
        }
    }
}

/// Access token from the cached OAuth token, refreshing through the client
/// secrets when it is about to expire.
fn user_access_token(cfg: &settings::Settings, base: &Path) -> Result<String> {
    let token_path = cfg.auth.token_path(base);
    let token = StoredToken::load(&token_path)?;
    if !token.is_expired() {
        return Ok(token.access_token);
    }
    let Some(refresh_token) = &token.refresh_token else {
        bail!(
            "Cached token is expired and has no refresh token. Run 'drivekit auth login'."
        );
    };
    let secrets = ClientSecrets::from_file(&cfg.auth.credentials_path(base))?;
    let refreshed = oauth::refresh(&secrets, refresh_token)?;
    refreshed.save(&token_path)?;
    println!("Access token refreshed.");
    Ok(refreshed.access_token)
}
