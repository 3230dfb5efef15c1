pub mod commands;
pub mod context;
pub mod host;
pub mod lang;
pub mod logging;
pub mod permissions;
pub mod plugin;
pub mod repl;
pub mod rotation;
pub mod sim;

pub use context::{PluginError, RotationConfig, RotationContext};
pub use host::{GearProvider, HostServices, Messenger, PermissionStore, Player, PlayerDirectory};
pub use plugin::{PLUGIN_NAME, PluginState, RotatingGear};
