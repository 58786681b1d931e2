//! Uploads polling daemon — runs a sync pass on an interval.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::settings;
use crate::sync::sync_once;

/// Desktop notification (best-effort).
fn notify(title: &str, body: &str) {
    #[cfg(target_os = "macos")]
    {
        let _ = std::process::Command::new("osascript")
            .arg("-e")
            .arg(format!(
                "display notification \"{}\" with title \"{}\"",
                body, title
            ))
            .output();
    }
    #[cfg(target_os = "linux")]
    {
        let _ = std::process::Command::new("notify-send")
            .arg(title)
            .arg(body)
            .output();
    }
}

/// One sync cycle. Returns the number of files copied.
fn poll_once(source: &Path, target: &Path, notify_enabled: bool) -> usize {
    let report = match sync_once(source, target) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Sync failed: {}", e);
            return 0;
        }
    };

    if report.copied > 0 {
        println!("{} new file(s) mirrored", report.copied);
        if notify_enabled {
            notify("drivekit", &format!("{} new file(s) mirrored", report.copied));
        }
    }
    report.copied
}

/// drivekit watch [--interval N]
#[tokio::main]
pub async fn run(interval_override: Option<u64>, config: Option<&Path>) -> Result<()> {
    let (cfg, base) = settings::load(config)?;
    let interval = interval_override.unwrap_or(cfg.watch.poll_interval);
    let source: PathBuf = crate::resolve::resolve_in(&base, &cfg.sync.source);
    let target: PathBuf = crate::resolve::resolve_in(&base, &cfg.sync.target);

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    // Handle Ctrl-C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        println!("\nReceived signal, shutting down...");
        shutdown_clone.store(true, Ordering::Relaxed);
    });

    println!(
        "drivekit watch: mirroring {} every {}s (Ctrl-C to stop)",
        source.display(),
        interval
    );

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        // Run the sync pass in a blocking context
        let notify_enabled = cfg.watch.notify;
        let source = source.clone();
        let target = target.clone();
        tokio::task::spawn_blocking(move || {
            poll_once(&source, &target, notify_enabled);
        })
        .await?;

        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        tokio::time::sleep(tokio::time::Duration::from_secs(interval)).await;
    }

    println!("drivekit watch: stopped");
    Ok(())
}
