//! CosmicLens terminal front end.
//!
//! Usage:
//!   cosmiclens scene [--json]
//!   cosmiclens inspect obj-3
//!   cosmiclens inspect "Crab Nebula"
//!   cosmiclens search boötes void
//!   cosmiclens suggestions
//!   cosmiclens key set <token> | key clear | key status
//!
//! Global flags: --config <toml>, --seed <u64>, --verbose.

mod render;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cosmiclens_core::credentials::KeySource;
use cosmiclens_core::{default_resolver, DefaultExplorer, Explorer, ExplorerConfig};
use cosmiclens_logic::archive::SUGGESTED_TOPICS;
use cosmiclens_logic::scene::EntityId;

#[derive(Debug, Parser)]
#[command(name = "cosmiclens", version, about = "Explore a procedurally generated sky")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true, env = "COSMICLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Scene seed, overriding the config.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a scene and list its objects.
    Scene {
        /// Dump the scene as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Generate a scene, then look up one object by id or name.
    Inspect { target: String },
    /// Search for a phenomenon.
    Search {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// List the topics available offline.
    Suggestions,
    /// Manage the provider API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Debug, Subcommand)]
enum KeyAction {
    /// Save a key to the credential file.
    Set { token: String },
    /// Remove the saved key.
    Clear,
    /// Show where the active key comes from.
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            log::info!("Using config {}", path.display());
            ExplorerConfig::load(path)?
        }
        None => {
            log::info!("No config file given, using defaults");
            ExplorerConfig::default()
        }
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    match config.seed {
        Some(seed) => log::info!("Scene seed {}", seed),
        None => log::info!("Scene seed drawn from the OS"),
    }

    let resolver = default_resolver(&config)?;
    let mut explorer = Explorer::with_seed(config.scene, resolver, config.seed);

    match cli.command {
        Command::Scene { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(explorer.scene())?);
            } else {
                print!("{}", render::scene_table(explorer.scene()));
            }
        }
        Command::Inspect { target } => inspect(&explorer, &target).await,
        Command::Search { query } => {
            let query = query.join(" ");
            match explorer.search(&query).await {
                Some(resolution) => print!("{}", render::resolution(&resolution)),
                None => eprintln!("Nothing to search for."),
            }
        }
        Command::Suggestions => {
            for topic in SUGGESTED_TOPICS {
                println!("{}", topic);
            }
        }
        Command::Key { action } => key(&mut explorer, action)?,
    }

    Ok(())
}

async fn inspect(explorer: &DefaultExplorer, target: &str) {
    let scene = explorer.scene();
    let entity = EntityId::parse(target)
        .and_then(|id| scene.get(id))
        .or_else(|| scene.find_by_name(target));

    let Some(entity) = entity else {
        log::warn!(
            "No object '{}' in this scene ({} objects). Try `cosmiclens scene`.",
            target,
            scene.len()
        );
        return;
    };

    println!(
        "{} [{}] {}",
        entity.id,
        entity.kind.label(),
        entity.display_name
    );
    if let Some(resolution) = explorer.inspect(entity.id).await {
        print!("{}", render::resolution(&resolution));
    }
}

fn key(explorer: &mut DefaultExplorer, action: KeyAction) -> Result<(), Box<dyn Error>> {
    match action {
        KeyAction::Set { token } => {
            explorer.save_credential(&token)?;
            println!("API key saved. Remote lookups are enabled.");
        }
        KeyAction::Clear => {
            explorer.clear_credential()?;
            println!("Saved API key removed.");
            report_key(explorer);
        }
        KeyAction::Status => report_key(explorer),
    }
    Ok(())
}

fn report_key(explorer: &DefaultExplorer) {
    let credentials = explorer.resolver().credentials();
    match credentials.active_source() {
        Some(KeySource::Environment) => {
            println!("Online: key from ${}", credentials.env().var())
        }
        Some(KeySource::Store) => println!(
            "Online: key from {}",
            credentials.store().path().display()
        ),
        None => println!("Offline: no API key configured"),
    }
}
