//! On-disk OAuth token cache.
//!
//! The cache is read wholesale at start and overwritten wholesale after a
//! successful exchange or refresh. There is no locking; concurrent writers
//! are out of scope.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl StoredToken {
    /// Expired, or within 5 minutes of expiring.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now() + Duration::minutes(5)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Token cache not found at {}. Run 'drivekit auth login' first.",
                path.display()
            )
        })?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid token cache at {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write token cache to {}", path.display()))
    }
}
