use crate::host::{PermissionStore, Player};

/// Players holding this permission are left out of gear rotation
pub const IGNORE: &str = "rotatinggear.ignore";

const PERMISSIONS: &[&str] = &[IGNORE];

pub fn register_permissions(store: &dyn PermissionStore, owner: &str) {
    for permission in PERMISSIONS {
        store.register_permission(permission, owner);
    }
}

pub fn has_permission(store: &dyn PermissionStore, player: &Player, permission: &str) -> bool {
    store.user_has_permission(&player.user_id_string(), permission)
}
