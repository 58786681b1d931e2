//! Google Drive v3 REST client.
//!
//! Covers exactly the calls the backup flow needs: metadata queries,
//! folder creation, multipart file creation, in-place content updates and
//! Shared Drive listing. Calls run sequentially with no retry; any API
//! failure surfaces as an error with the HTTP status and response body.

pub mod service_account;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::util::escape_query;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

const MULTIPART_BOUNDARY: &str = "drivekit_boundary";

#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharedDrive {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveList {
    #[serde(default)]
    drives: Vec<SharedDrive>,
}

pub struct DriveClient {
    agent: ureq::Agent,
    api_base: String,
    upload_base: String,
    authorization: String,
    all_drives: bool,
}

impl DriveClient {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_urls(access_token, DRIVE_API_BASE, DRIVE_UPLOAD_BASE)
    }

    /// Point the client at non-default endpoints (tests).
    pub fn with_base_urls(access_token: &str, api_base: &str, upload_base: &str) -> Self {
        Self {
            agent: ureq::agent(),
            api_base: api_base.to_string(),
            upload_base: upload_base.to_string(),
            authorization: format!("Bearer {}", access_token),
            all_drives: false,
        }
    }

    /// Send Shared Drive support flags with every call.
    pub fn all_drives(mut self, enabled: bool) -> Self {
        self.all_drives = enabled;
        self
    }

    /// Find a non-trashed folder by name under a parent ('root' when none).
    pub fn find_folder(&self, name: &str, parent_id: Option<&str>) -> Result<Option<DriveFile>> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and '{}' in parents and trashed = false",
            escape_query(name),
            FOLDER_MIME,
            parent_id.unwrap_or("root"),
        );
        self.query_files(&query, "Folder lookup")
            .map(|files| files.into_iter().next())
    }

    /// Find a non-trashed file by name under a folder.
    pub fn find_file(&self, name: &str, parent_id: &str) -> Result<Option<DriveFile>> {
        let query = format!(
            "name = '{}' and '{}' in parents and trashed = false",
            escape_query(name),
            parent_id,
        );
        self.query_files(&query, "File lookup")
            .map(|files| files.into_iter().next())
    }

    /// Create a folder under a parent (the drive root when none).
    pub fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<DriveFile> {
        let mut metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
        });
        if let Some(parent) = parent_id {
            metadata["parents"] = serde_json::json!([parent]);
        }

        let mut request = self
            .agent
            .post(&format!("{}/files", self.api_base))
            .set("Authorization", &self.authorization)
            .query("fields", "id, name");
        if self.all_drives {
            request = request.query("supportsAllDrives", "true");
        }
        check(request.send_json(metadata), "Folder creation")
    }

    /// Create a new file with content (multipart upload: metadata + media).
    pub fn upload_new(
        &self,
        name: &str,
        parent_id: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<DriveFile> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent_id],
        });
        let body = multipart_body(&metadata.to_string(), mime_type, data);

        let mut request = self
            .agent
            .post(&format!(
                "{}/files?uploadType=multipart",
                self.upload_base
            ))
            .set("Authorization", &self.authorization)
            .set(
                "Content-Type",
                &format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
            )
            .query("fields", "id, name");
        if self.all_drives {
            request = request.query("supportsAllDrives", "true");
        }
        check(request.send_bytes(&body), "File upload")
    }

    /// Replace an existing file's content in place.
    pub fn update_content(&self, file_id: &str, mime_type: &str, data: &[u8]) -> Result<DriveFile> {
        let mut request = self
            .agent
            .request(
                "PATCH",
                &format!("{}/files/{}", self.upload_base, file_id),
            )
            .set("Authorization", &self.authorization)
            .set("Content-Type", mime_type)
            .query("uploadType", "media")
            .query("fields", "id, name");
        if self.all_drives {
            request = request.query("supportsAllDrives", "true");
        }
        check(request.send_bytes(data), "File update")
    }

    /// List the Shared Drives visible to the credential.
    pub fn list_shared_drives(&self) -> Result<Vec<SharedDrive>> {
        let request = self
            .agent
            .get(&format!("{}/drives", self.api_base))
            .set("Authorization", &self.authorization)
            .query("fields", "drives(id, name)");
        let list: DriveList = check(request.call(), "Shared Drive listing")?;
        Ok(list.drives)
    }

    /// Find a Shared Drive by exact name.
    pub fn find_shared_drive(&self, name: &str) -> Result<Option<SharedDrive>> {
        Ok(self
            .list_shared_drives()?
            .into_iter()
            .find(|drive| drive.name == name))
    }

    fn query_files(&self, query: &str, what: &str) -> Result<Vec<DriveFile>> {
        let mut request = self
            .agent
            .get(&format!("{}/files", self.api_base))
            .set("Authorization", &self.authorization)
            .query("q", query)
            .query("fields", "files(id, name)");
        if self.all_drives {
            request = request
                .query("supportsAllDrives", "true")
                .query("includeItemsFromAllDrives", "true");
        }
        let list: FileList = check(request.call(), what)?;
        Ok(list.files)
    }
}

fn multipart_body(metadata_json: &str, mime_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + metadata_json.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata_json.as_bytes());
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{}--", MULTIPART_BOUNDARY).as_bytes());
    body
}

fn check<T: serde::de::DeserializeOwned>(
    response: Result<ureq::Response, ureq::Error>,
    what: &str,
) -> Result<T> {
    match response {
        Ok(r) => r
            .into_json()
            .with_context(|| format!("{what}: unreadable Drive API response")),
        Err(ureq::Error::Status(code, r)) => {
            let body = r.into_string().unwrap_or_default();
            match code {
                401 => bail!("{what} failed: credential rejected (HTTP 401)"),
                403 => bail!("{what} failed: access denied (HTTP 403): {}", body.trim()),
                _ => bail!("{what} failed: HTTP {code}: {}", body.trim()),
            }
        }
        Err(e) => Err(e).with_context(|| format!("{what}: Drive API request failed")),
    }
}
