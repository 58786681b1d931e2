use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drivekit", version, about = "Back up shop files to Google Drive, check where product images live", disable_help_subcommand = true)]
pub struct Cli {
    /// Path to .drivekit.toml (default: auto-detect)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Google Drive OAuth commands
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Upload a backup file to Google Drive
    Upload {
        /// File to upload
        file: PathBuf,

        /// Remote file name (default: the file's basename)
        name: Option<String>,

        /// Destination folder path, slash-separated
        #[arg(long)]
        dest: Option<String>,

        /// Upload into the named Shared Drive
        #[arg(long = "shared-drive")]
        shared_drive: Option<String>,

        /// Authenticate with the cached OAuth token instead of the service account
        #[arg(long)]
        user: bool,
    },

    /// Image URL diagnostics
    #[command(subcommand)]
    Check(CheckCommands),

    /// Copy new files from the uploads source directory into the mirror
    Sync,

    /// Run sync on an interval
    Watch {
        /// Poll interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Show command reference
    Help {
        /// Filter commands by name
        filter: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Print the authorization URL to open in a browser
    Url {
        /// Redirect URI preset (default: from config)
        #[arg(long, value_parser = ["oob", "localhost", "server"])]
        redirect: Option<String>,
    },

    /// Exchange an authorization code for a token and cache it
    Code {
        /// Authorization code (prompted for when omitted)
        code: Option<String>,

        /// Redirect URI preset (must match the one used for the URL)
        #[arg(long, value_parser = ["oob", "localhost", "server"])]
        redirect: Option<String>,
    },

    /// Full flow: print the URL, collect the code, cache the token
    Login {
        /// Redirect URI preset (default: from config)
        #[arg(long, value_parser = ["oob", "localhost", "server"])]
        redirect: Option<String>,

        /// Open the authorization URL in the default browser
        #[arg(long)]
        browser: bool,
    },

    /// Show the cached token's state
    Status,
}

#[derive(Subcommand)]
pub enum CheckCommands {
    /// Sample products straight from Postgres and classify their image URLs
    Db {
        /// Number of products to sample
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Fetch products through the shop API and report CDN-hosted images
    Api,
}
