use anyhow::Result;
use clap::Parser;

use drivekit::cli::{AuthCommands, CheckCommands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Auth(cmd) => match cmd {
            AuthCommands::Url { redirect } => drivekit::auth::url(redirect.as_deref(), config),
            AuthCommands::Code { code, redirect } => {
                drivekit::auth::code(code.as_deref(), redirect.as_deref(), config)
            }
            AuthCommands::Login { redirect, browser } => {
                drivekit::auth::login(redirect.as_deref(), browser, config)
            }
            AuthCommands::Status => drivekit::auth::status(config),
        },
        Commands::Upload {
            file,
            name,
            dest,
            shared_drive,
            user,
        } => drivekit::upload::run(
            &file,
            name.as_deref(),
            dest.as_deref(),
            shared_drive.as_deref(),
            user,
            config,
        ),
        Commands::Check(cmd) => match cmd {
            CheckCommands::Db { limit } => drivekit::check::db::run(limit, config),
            CheckCommands::Api => drivekit::check::api::run(config),
        },
        Commands::Sync => drivekit::sync::run(config),
        Commands::Watch { interval } => drivekit::watch::run(interval, config),
        Commands::Help { filter } => drivekit::help::run(filter.as_deref()),
    }
}
