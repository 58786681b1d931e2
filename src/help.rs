//! Command reference for drivekit.

use anyhow::Result;

const COMMANDS: &[(&str, &str)] = &[
    ("auth url [--redirect MODE]", "Print the OAuth authorization URL"),
    ("auth code [CODE]", "Exchange an authorization code for a token"),
    ("auth login [--browser]", "Full OAuth flow: URL, code, cached token"),
    ("auth status", "Show the cached token's state"),
    ("upload FILE [NAME]", "Upload a backup to Google Drive (upsert)"),
    ("upload FILE --shared-drive NAME", "Upload into a Shared Drive"),
    ("upload FILE --user", "Upload with the cached OAuth token"),
    ("check db [--limit N]", "Classify image URLs straight from Postgres"),
    ("check api", "Classify image URLs through the shop API"),
    ("sync", "Mirror backend/uploads into uploads"),
    ("watch [--interval N]", "Run sync on an interval"),
    ("help", "Show this reference"),
];

const DEV_COMMANDS: &[(&str, &str)] = &[
    ("cargo test", "Run tests"),
    ("cargo clippy", "Lint"),
    ("cargo fmt", "Format"),
];

pub fn run(filter: Option<&str>) -> Result<()> {
    if let Some(filter) = filter {
        if filter != "--dev" {
            let all_cmds: Vec<(&str, &str)> = COMMANDS
                .iter()
                .chain(DEV_COMMANDS.iter())
                .copied()
                .collect();
            let matches: Vec<_> = all_cmds
                .iter()
                .filter(|(name, _)| name.contains(filter))
                .copied()
                .collect();
            if matches.is_empty() {
                println!("No command matching '{}'", filter);
                std::process::exit(1);
            }
            print_table(&matches);
            return Ok(());
        }
    }

    println!("drivekit commands\n");
    print_table(COMMANDS);

    if filter == Some("--dev") || filter.is_none() {
        println!("\ndev commands\n");
        print_table(DEV_COMMANDS);
    }

    Ok(())
}

fn print_table(rows: &[(&str, &str)]) {
    let name_w = rows.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (name, desc) in rows {
        println!("  {:<width$}  {}", name, desc, width = name_w);
    }
}
