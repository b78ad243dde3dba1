use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaultsync::cli::{handle_backup_command, handle_sync_command, handle_vaults_command, BackupCommands};
use vaultsync::config::{Settings, VaultSyncPaths};
use vaultsync::error::VaultSyncResult;

#[derive(Parser)]
#[command(
    name = "vaultsync",
    version,
    about = "Synchronize Obsidian vault settings between vaults",
    long_about = "vaultsync copies settings files, plugin lists, themes, and snippets \
                  from one Obsidian vault to another, taking a verified backup of the \
                  target before every change. Backups rotate automatically and can be \
                  restored at any time."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync settings from a source vault to a target vault
    Sync {
        /// Source vault path
        #[arg(short, long)]
        source: PathBuf,

        /// Target vault path
        #[arg(short, long)]
        target: PathBuf,

        /// Only sync these item names (e.g. app.json, themes)
        #[arg(short, long, value_delimiter = ',')]
        items: Option<Vec<String>>,

        /// Report what would be synced without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Continue past per-item failures instead of aborting
        #[arg(long)]
        ignore_errors: bool,

        /// Print the sync result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Backup management commands
    Backup {
        /// Vault to operate on
        #[arg(short, long)]
        vault: PathBuf,

        #[command(subcommand)]
        command: BackupCommands,
    },

    /// Discover vaults under the given directories
    Vaults {
        /// Root directories to search (default: current directory)
        roots: Vec<PathBuf>,

        /// Maximum search depth
        #[arg(short, long, default_value = "3")]
        depth: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().without_time())
        .with(filter)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        process::exit(err.exit_code());
    }
}

fn run() -> VaultSyncResult<()> {
    let cli = Cli::parse();

    let paths = VaultSyncPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Commands::Sync {
            source,
            target,
            items,
            dry_run,
            ignore_errors,
            json,
        } => {
            let mut settings = settings;
            // CLI flags tighten the configured policy, never loosen it
            settings.dry_run = settings.dry_run || dry_run;
            settings.ignore_errors = settings.ignore_errors || ignore_errors;
            handle_sync_command(&source, &target, items, &settings, json)?;
        }
        Commands::Backup { vault, command } => {
            handle_backup_command(&vault, &settings, command)?;
        }
        Commands::Vaults { roots, depth } => {
            handle_vaults_command(roots, depth)?;
        }
        Commands::Config => {
            println!("vaultsync Configuration");
            println!("=======================");
            println!("Config file: {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Core settings:     {}", settings.sync_core_settings);
            println!("  Core plugins:      {}", settings.sync_core_plugins);
            println!("  Community plugins: {}", settings.sync_community_plugins);
            println!("  Themes:            {}", settings.sync_themes);
            println!("  Snippets:          {}", settings.sync_snippets);
            println!("  Item list mode:    {:?}", settings.item_list_mode);
            println!("  Ignore errors:     {}", settings.ignore_errors);
            println!("  Max backups:       {}", settings.max_backups);
            match &settings.backup_dir {
                Some(dir) => println!("  Backup directory:  {}", dir.display()),
                None => println!("  Backup directory:  <vault>/.vaultsync-backups"),
            }
        }
    }

    Ok(())
}
