use std::sync::Arc;

use super::{GearProvider, Player};

pub const GEAR_CORE_NAME: &str = "Gear Core";
pub const GEAR_CORE_URL: &str = "https://game4freak.io";

/// Plugin-side reference to the gear service.
///
/// Every call reports failure instead of reaching the service when it is
/// absent or unloaded.
#[derive(Clone, Default)]
pub struct GearCore {
    provider: Option<Arc<dyn GearProvider>>,
}

impl GearCore {
    pub fn new(provider: Arc<dyn GearProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A reference that never resolved to a loaded service
    pub fn absent() -> Self {
        Self { provider: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }

    pub fn gear_set_exists(&self, gear_set: &str) -> bool {
        self.loaded()
            .map(|p| p.gear_set_exists(gear_set))
            .unwrap_or(false)
    }

    pub fn equip_gear_set(&self, player: &Player, gear_set: &str, clear_inventory: bool) -> bool {
        self.loaded()
            .map(|p| p.equip_gear_set(player, gear_set, clear_inventory))
            .unwrap_or(false)
    }

    fn loaded(&self) -> Option<&Arc<dyn GearProvider>> {
        self.provider.as_ref().filter(|p| p.is_loaded())
    }
}
