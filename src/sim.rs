//! In-memory game server
//!
//! Implements every host capability without a real server behind it. Backs
//! the interactive shell and the tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::host::{
    GearCore, GearProvider, HostServices, Messenger, PermissionStore, Player, PlayerDirectory,
    PlayerId,
};

#[derive(Debug, Default)]
struct ServerState {
    players: BTreeMap<PlayerId, Player>,
    registered_permissions: Vec<(String, String)>,
    grants: HashSet<(String, String)>,
    gear_sets: HashSet<String>,
    gear_core_loaded: bool,
    failing_players: HashSet<PlayerId>,
    equipped: Vec<(PlayerId, String)>,
    messages: Vec<(PlayerId, String)>,
    echo_messages: bool,
}

/// Shared handle to the simulated server. Clones see the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServer {
    state: Arc<Mutex<ServerState>>,
}

impl InMemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server with Gear Core loaded and the given gear sets defined
    pub fn with_gear_sets<I, S>(gear_sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let server = Self::new();
        {
            let mut state = server.lock();
            state.gear_core_loaded = true;
            state.gear_sets = gear_sets.into_iter().map(Into::into).collect();
        }
        server
    }

    /// Capability bundle for the plugin, with Gear Core resolved
    pub fn services(&self) -> HostServices {
        let shared = Arc::new(self.clone());
        HostServices {
            gear: GearCore::new(shared.clone()),
            permissions: shared.clone(),
            players: shared.clone(),
            messenger: shared,
        }
    }

    /// Capability bundle where Gear Core was never installed
    pub fn services_without_gear_core(&self) -> HostServices {
        HostServices {
            gear: GearCore::absent(),
            ..self.services()
        }
    }

    /// Print replies to stdout as they are sent.
    pub fn set_echo_messages(&self, echo: bool) {
        self.lock().echo_messages = echo;
    }

    pub fn connect(&self, id: u64, name: &str) -> Player {
        self.connect_player(Player::new(id, name))
    }

    pub fn connect_player(&self, player: Player) -> Player {
        self.lock().players.insert(player.id, player.clone());
        player
    }

    pub fn disconnect(&self, id: u64) -> bool {
        self.lock().players.remove(&PlayerId(id)).is_some()
    }

    pub fn players(&self) -> Vec<Player> {
        self.lock().players.values().cloned().collect()
    }

    pub fn grant(&self, id: u64, permission: &str) {
        self.lock()
            .grants
            .insert((PlayerId(id).to_string(), permission.to_string()));
    }

    pub fn revoke(&self, id: u64, permission: &str) {
        self.lock()
            .grants
            .remove(&(PlayerId(id).to_string(), permission.to_string()));
    }

    pub fn registered_permissions(&self) -> Vec<String> {
        self.lock()
            .registered_permissions
            .iter()
            .map(|(permission, _)| permission.clone())
            .collect()
    }

    pub fn set_gear_core_loaded(&self, loaded: bool) {
        self.lock().gear_core_loaded = loaded;
    }

    /// Define a gear set in the simulated Gear Core. Returns false if it
    /// already existed.
    pub fn add_gear_set(&self, name: &str) -> bool {
        self.lock().gear_sets.insert(name.to_string())
    }

    /// Make every equip call for this player fail.
    pub fn fail_equips_for(&self, id: u64) {
        self.lock().failing_players.insert(PlayerId(id));
    }

    /// Equip calls that succeeded, oldest first
    pub fn equipped(&self) -> Vec<(PlayerId, String)> {
        self.lock().equipped.clone()
    }

    /// Replies sent, oldest first
    pub fn messages(&self) -> Vec<(PlayerId, String)> {
        self.lock().messages.clone()
    }

    pub fn messages_for(&self, id: u64) -> Vec<String> {
        self.lock()
            .messages
            .iter()
            .filter(|(to, _)| *to == PlayerId(id))
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        // ignore poisoning
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl GearProvider for InMemoryServer {
    fn is_loaded(&self) -> bool {
        self.lock().gear_core_loaded
    }

    fn gear_set_exists(&self, gear_set: &str) -> bool {
        self.lock().gear_sets.contains(gear_set)
    }

    fn equip_gear_set(&self, player: &Player, gear_set: &str, clear_inventory: bool) -> bool {
        let mut state = self.lock();
        if !state.gear_sets.contains(gear_set) || state.failing_players.contains(&player.id) {
            return false;
        }
        tracing::trace!(player = %player.id, gear_set, clear_inventory, "Gear set equipped");
        state.equipped.push((player.id, gear_set.to_string()));
        true
    }
}

impl PermissionStore for InMemoryServer {
    fn register_permission(&self, permission: &str, owner: &str) {
        self.lock()
            .registered_permissions
            .push((permission.to_string(), owner.to_string()));
    }

    fn user_has_permission(&self, user_id: &str, permission: &str) -> bool {
        self.lock()
            .grants
            .contains(&(user_id.to_string(), permission.to_string()))
    }
}

impl PlayerDirectory for InMemoryServer {
    fn active_players(&self) -> Vec<PlayerId> {
        self.lock().players.keys().copied().collect()
    }

    fn find_player(&self, id: PlayerId) -> Option<Player> {
        self.lock().players.get(&id).cloned()
    }
}

impl Messenger for InMemoryServer {
    fn send_reply(&self, player: &Player, message: &str) {
        let mut state = self.lock();
        if state.echo_messages {
            println!("[to {}] {}", player.display_name, message);
        }
        state.messages.push((player.id, message.to_string()));
    }
}
