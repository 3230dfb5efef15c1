//! Interactive shell commands
//!
//! Each command acts on the simulated server or the plugin and prints its
//! result. Errors are returned as display strings for the REPL to show.

use std::io::Write;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::host::Player;
use crate::permissions::IGNORE;
use crate::plugin::RotatingGear;
use crate::sim::InMemoryServer;

/// Shared state for the shell
#[derive(Clone)]
pub struct ShellContext {
    pub server: InMemoryServer,
    pub plugin: Arc<Mutex<RotatingGear>>,
}

impl ShellContext {
    pub fn new(server: InMemoryServer, plugin: RotatingGear) -> Self {
        Self {
            server,
            plugin: Arc::new(Mutex::new(plugin)),
        }
    }
}

pub fn join(ctx: &ShellContext, id: u64, name: &str, lang: Option<&str>) {
    let mut player = Player::new(id, name);
    if let Some(lang) = lang {
        player = player.with_language(lang);
    }
    let player = ctx.server.connect_player(player);
    println!("{} ({}) connected", player.display_name, player.id);
}

pub fn leave(ctx: &ShellContext, id: u64) {
    if ctx.server.disconnect(id) {
        println!("{id} disconnected");
    } else {
        println!("No player with id {id}");
    }
}

pub fn set_bypass(ctx: &ShellContext, id: u64, granted: bool) {
    if granted {
        ctx.server.grant(id, IGNORE);
        println!("Granted {IGNORE} to {id}");
    } else {
        ctx.server.revoke(id, IGNORE);
        println!("Revoked {IGNORE} from {id}");
    }
}

pub fn define_gear_set(ctx: &ShellContext, name: &str) {
    if ctx.server.add_gear_set(name) {
        println!("Gear set {name} defined");
    } else {
        println!("Gear set {name} already exists");
    }
}

pub fn fail_equips(ctx: &ShellContext, id: u64) {
    ctx.server.fail_equips_for(id);
    println!("Equip calls for {id} will now fail");
}

pub fn list_players(ctx: &ShellContext) {
    let players = ctx.server.players();
    if players.is_empty() {
        println!("No players connected");
        return;
    }

    println!("{:<20} {:<24} Lang", "Id", "Name");
    println!("{}", "-".repeat(52));
    for player in players {
        println!(
            "{:<20} {:<24} {}",
            player.id,
            player.display_name,
            player.language.as_deref().unwrap_or("-")
        );
    }
}

pub async fn show_status(ctx: &ShellContext) {
    let plugin = ctx.plugin.lock().await;
    let config = &plugin.context().config;
    let running = plugin.context().tasks.lock().await.running();

    println!("State:        {:?}", plugin.state());
    println!("Rotation:     {}", if plugin.is_rotation_active() { "active" } else { "idle" });
    println!(
        "Interval:     {}s",
        config.duration_between_each_gear_rotation_seconds
    );
    println!(
        "Mode:         {}",
        if config.equip_random_gear_set { "random" } else { "sequential" }
    );
    println!("Gear sets:    {}", config.gear_sets.join(", "));
    if !config.equip_random_gear_set {
        println!("Next set:     {}", config.gear_sets[plugin.cursor() % config.gear_sets.len()]);
    }
    println!("Passes alive: {running}");
    println!("Equipped:     {}", ctx.server.equipped().len());
}

pub async fn rotate_now(ctx: &ShellContext) -> Result<(), String> {
    let name = ctx
        .plugin
        .lock()
        .await
        .rotate_now()
        .await
        .map_err(|e| e.to_string())?;
    println!("Started rotation pass {name}");
    Ok(())
}

pub async fn exit(ctx: &ShellContext) {
    ctx.plugin.lock().await.unload().await;
    write!(std::io::stdout(), "quitting...").ok();
    std::io::stdout().flush().ok();
}
