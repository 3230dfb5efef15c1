//! Host server capabilities consumed by the plugin
//!
//! The plugin never owns players or gear. Everything it needs from the game
//! server is reached through these traits, injected as `Arc<dyn _>`.

mod gear_core;

use std::fmt;
use std::sync::Arc;

pub use gear_core::{GEAR_CORE_NAME, GEAR_CORE_URL, GearCore};

/// Platform user id of a connected player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only view of a connected player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    /// Preferred message language (e.g. "en"); None uses the default
    pub language: Option<String>,
}

impl Player {
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id),
            display_name: display_name.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// User id as the permission store expects it
    pub fn user_id_string(&self) -> String {
        self.id.to_string()
    }
}

/// External gear-management service
pub trait GearProvider: Send + Sync {
    fn is_loaded(&self) -> bool;

    fn gear_set_exists(&self, gear_set: &str) -> bool;

    /// Returns true when the gear set was applied to the player.
    fn equip_gear_set(&self, player: &Player, gear_set: &str, clear_inventory: bool) -> bool;
}

pub trait PermissionStore: Send + Sync {
    fn register_permission(&self, permission: &str, owner: &str);

    fn user_has_permission(&self, user_id: &str, permission: &str) -> bool;
}

/// Source of the connected player list.
pub trait PlayerDirectory: Send + Sync {
    /// Ids of players connected right now. Re-read on every pass.
    fn active_players(&self) -> Vec<PlayerId>;

    /// None once the player has disconnected.
    fn find_player(&self, id: PlayerId) -> Option<Player>;
}

/// Chat delivery to a single player
pub trait Messenger: Send + Sync {
    fn send_reply(&self, player: &Player, message: &str);
}

/// The set of host capabilities handed to the plugin at construction
#[derive(Clone)]
pub struct HostServices {
    pub gear: GearCore,
    pub permissions: Arc<dyn PermissionStore>,
    pub players: Arc<dyn PlayerDirectory>,
    pub messenger: Arc<dyn Messenger>,
}
