use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::Runtime;

#[derive(Parser)]
#[command(name = "postbox")]
#[command(about = "Postbox - terminal front-end for the Postbox mail backend", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding state.json (defaults to the platform config directory)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Backend base URL, overriding config and POSTBOX_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with IMAP/SMTP credentials
    Login(commands::auth::LoginArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Check that the backend is reachable
    Health,
    /// Manage the color theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Sync a folder from the mail server and list it
    Refresh(commands::mail::FolderArgs),
    /// List cached messages in a folder
    List(commands::mail::ListArgs),
    /// Search cached messages
    Search {
        query: String,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Show a message and mark it read
    Open { id: String },
    /// Mark a message read
    Read { id: String },
    /// Mark a message unread
    Unread { id: String },
    /// Delete a message
    Delete { id: String },
    /// List folders with message counts
    Folders,
    /// Send a message
    Send(commands::mail::SendArgs),
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// List available themes
    List,
    /// Show the active theme
    Show,
    /// Switch to a theme by id
    Set { id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config.toml if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = Runtime::open(cli.config, cli.state_dir, cli.api_url).await?;

    match cli.command {
        Commands::Login(args) => commands::auth::login(&runtime, args).await?,
        Commands::Logout => commands::auth::logout(&runtime).await?,
        Commands::Whoami => commands::auth::whoami(&runtime),
        Commands::Health => commands::mail::health(&runtime).await?,
        Commands::Theme { action } => match action {
            ThemeAction::List => commands::theme::list(&runtime),
            ThemeAction::Show => commands::theme::show(&runtime)?,
            ThemeAction::Set { id } => commands::theme::set(&runtime, &id).await?,
        },
        Commands::Refresh(args) => commands::mail::refresh(&runtime, args).await?,
        Commands::List(args) => commands::mail::list(&runtime, args).await?,
        Commands::Search { query, limit } => {
            commands::mail::search(&runtime, &query, limit).await?
        }
        Commands::Open { id } => commands::mail::open(&runtime, &id).await?,
        Commands::Read { id } => commands::mail::set_read(&runtime, &id, true).await?,
        Commands::Unread { id } => commands::mail::set_read(&runtime, &id, false).await?,
        Commands::Delete { id } => commands::mail::delete(&runtime, &id).await?,
        Commands::Folders => commands::mail::folders(&runtime).await?,
        Commands::Send(args) => commands::mail::send(&runtime, args).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&runtime)?,
            ConfigAction::Init => commands::config::init(&runtime)?,
        },
    }

    Ok(())
}
