//! Mirror the backend's uploads directory into the frontend-served one.
//!
//! Copy-if-absent only: files already in the target are left alone;
//! subdirectories and anything named `hd` (the variants entry) are skipped.

use anyhow::{Context, Result};
use std::path::Path;

use crate::settings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub copied: usize,
    pub skipped: usize,
    pub total: usize,
}

/// drivekit sync
pub fn run(config: Option<&Path>) -> Result<()> {
    let (cfg, base) = settings::load(config)?;
    let source = crate::resolve::resolve_in(&base, &cfg.sync.source);
    let target = crate::resolve::resolve_in(&base, &cfg.sync.target);

    println!("Syncing uploads");
    println!("  source: {}", source.display());
    println!("  target: {}", target.display());

    let report = sync_once(&source, &target)?;

    println!("\nResult:");
    println!("  copied:  {}", report.copied);
    println!("  skipped: {}", report.skipped);
    println!("  total:   {}", report.total);
    Ok(())
}

/// One sync pass. Creates the target directory when missing.
pub fn sync_once(source: &Path, target: &Path) -> Result<SyncReport> {
    if !target.exists() {
        std::fs::create_dir_all(target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
    }

    let entries = std::fs::read_dir(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let mut report = SyncReport::default();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let Some(file_name) = path.file_name() else {
            continue;
        };
        // the hd variants entry is skipped by name, whatever it is
        if path.is_dir() || file_name == "hd" {
            continue;
        }
        report.total += 1;
        let destination = target.join(file_name);
        if destination.exists() {
            report.skipped += 1;
            continue;
        }

        match std::fs::copy(&path, &destination) {
            Ok(_) => {
                println!("  copied: {}", file_name.to_string_lossy());
                report.copied += 1;
            }
            Err(e) => {
                eprintln!("  failed to copy {}: {}", file_name.to_string_lossy(), e);
            }
        }
    }
    Ok(report)
}
