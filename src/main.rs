use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rotating_gear::commands::{self, ShellContext};
use rotating_gear::context::RotationConfig;
use rotating_gear::logging;
use rotating_gear::plugin::RotatingGear;
use rotating_gear::repl::readline;
use rotating_gear::sim::InMemoryServer;

/// Run the gear rotation plugin against a simulated server
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (defaults to the per-user config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the rolling log file
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Start without Gear Core installed
    #[arg(long)]
    no_gear_core: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let _log_guard = logging::init(args.log_dir.as_deref());

    let config_path = match args.config {
        Some(path) => path,
        None => RotationConfig::default_path().map_err(|e| e.to_string())?,
    };
    let config = RotationConfig::load(&config_path).map_err(|e| e.to_string())?;
    tracing::info!(path = %config_path.display(), "Configuration loaded");

    let server = InMemoryServer::with_gear_sets(RotationConfig::default().gear_sets);
    server.set_echo_messages(true);
    let services = if args.no_gear_core {
        server.services_without_gear_core()
    } else {
        server.services()
    };

    let mut plugin = RotatingGear::new(config, services).map_err(|e| e.to_string())?;
    plugin.init();
    if let Err(err) = plugin.on_server_initialized().await {
        println!("{err}");
    }

    let ctx = ShellContext::new(server, plugin);

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(no_binary_name = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect a player
    Join {
        #[arg(short, long)]
        id: u64,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Disconnect a player
    Leave {
        #[arg(short, long)]
        id: u64,
    },
    /// Exclude a player from rotation
    Grant {
        #[arg(short, long)]
        id: u64,
    },
    /// Include a player in rotation again
    Revoke {
        #[arg(short, long)]
        id: u64,
    },
    /// Define a gear set in the simulated Gear Core
    DefineGearSet {
        #[arg(short, long)]
        name: String,
    },
    /// Make equips fail for a player
    FailEquips {
        #[arg(short, long)]
        id: u64,
    },
    Players,
    Status,
    /// Run a rotation pass now
    Rotate,
    Exit,
}

async fn respond(line: &str, ctx: &ShellContext) -> Result<bool, String> {
    let args = shlex::split(line).ok_or("error: Invalid quoting")?;
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Join { id, name, lang }) => commands::join(ctx, *id, name, lang.as_deref()),
        Some(Commands::Leave { id }) => commands::leave(ctx, *id),
        Some(Commands::Grant { id }) => commands::set_bypass(ctx, *id, true),
        Some(Commands::Revoke { id }) => commands::set_bypass(ctx, *id, false),
        Some(Commands::DefineGearSet { name }) => commands::define_gear_set(ctx, name),
        Some(Commands::FailEquips { id }) => commands::fail_equips(ctx, *id),
        Some(Commands::Players) => commands::list_players(ctx),
        Some(Commands::Status) => commands::show_status(ctx).await,
        Some(Commands::Rotate) => commands::rotate_now(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit(ctx).await;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
