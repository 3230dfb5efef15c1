//! Plugin lifecycle
//!
//! The host drives the plugin through three hooks:
//! - `init` when the plugin is loaded
//! - `on_server_initialized` once the server has fully started
//! - `unload` on shutdown or when the plugin disables itself

use crate::context::{PluginError, RotationConfig, RotationContext};
use crate::host::{GEAR_CORE_NAME, GEAR_CORE_URL, HostServices};
use crate::lang::LangCatalog;
use crate::permissions;
use crate::rotation::{DriverState, RotationDriver};

pub const PLUGIN_NAME: &str = "RotatingGear";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Constructed, hooks not yet run
    Loaded,
    Initialized,
    /// Server started and rotation armed
    Running,
    Unloaded,
}

pub struct RotatingGear {
    ctx: RotationContext,
    driver: RotationDriver,
    state: PluginState,
}

impl RotatingGear {
    pub fn new(config: RotationConfig, host: HostServices) -> Result<Self, PluginError> {
        Self::with_lang(config, host, LangCatalog::with_defaults())
    }

    pub fn with_lang(
        config: RotationConfig,
        host: HostServices,
        lang: LangCatalog,
    ) -> Result<Self, PluginError> {
        let ctx = RotationContext::new(config, host, lang)?;
        Ok(Self {
            driver: RotationDriver::new(ctx.clone()),
            ctx,
            state: PluginState::Loaded,
        })
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    pub fn context(&self) -> &RotationContext {
        &self.ctx
    }

    pub fn is_rotation_active(&self) -> bool {
        self.driver.state() == DriverState::Active
    }

    /// Sequential index of the next gear set
    pub fn cursor(&self) -> usize {
        self.driver.cursor()
    }

    /// Register the plugin's permissions with the host.
    pub fn init(&mut self) {
        if self.state != PluginState::Loaded {
            return;
        }
        permissions::register_permissions(&*self.ctx.host.permissions, PLUGIN_NAME);
        self.state = PluginState::Initialized;
    }

    /// Arm the rotation timer, or unload if Gear Core is missing.
    pub async fn on_server_initialized(&mut self) -> Result<(), PluginError> {
        match self.state {
            PluginState::Loaded => return Err(PluginError::NotInitialized),
            PluginState::Unloaded => return Err(PluginError::Unloaded),
            PluginState::Running => return Ok(()),
            PluginState::Initialized => {}
        }

        if let Err(err) = self.check_dependencies() {
            tracing::error!("{err}");
            self.unload().await;
            return Err(err);
        }

        self.warn_unknown_gear_sets();
        if let Err(err) = self.driver.start() {
            tracing::error!("{err}");
            self.unload().await;
            return Err(err.into());
        }
        self.state = PluginState::Running;
        Ok(())
    }

    /// Run one pass immediately, outside the timer.
    pub async fn rotate_now(&self) -> Result<String, PluginError> {
        match self.state {
            PluginState::Running => Ok(self.driver.rotate_now().await),
            PluginState::Unloaded => Err(PluginError::Unloaded),
            _ => Err(PluginError::NotInitialized),
        }
    }

    /// Stop the timer and every pass still running.
    pub async fn unload(&mut self) {
        if self.state == PluginState::Unloaded {
            return;
        }
        self.driver.shutdown().await;
        self.state = PluginState::Unloaded;
        tracing::info!(plugin = PLUGIN_NAME, "Unloaded");
    }

    fn check_dependencies(&self) -> Result<(), PluginError> {
        if self.ctx.host.gear.is_loaded() {
            Ok(())
        } else {
            Err(PluginError::MissingDependency {
                name: GEAR_CORE_NAME,
                url: GEAR_CORE_URL,
            })
        }
    }

    fn warn_unknown_gear_sets(&self) {
        for gear_set in &self.ctx.config.gear_sets {
            if !self.ctx.host.gear.gear_set_exists(gear_set) {
                tracing::warn!(gear_set = %gear_set, "Configured gear set is not defined in Gear Core");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::IGNORE;
    use crate::sim::InMemoryServer;
    use std::time::Duration;

    fn config(sets: &[&str]) -> RotationConfig {
        RotationConfig {
            duration_between_each_gear_rotation_seconds: 1.0,
            gear_sets: sets.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn init_registers_ignore_permission() {
        let server = InMemoryServer::with_gear_sets(["A"]);
        let mut plugin = RotatingGear::new(config(&["A"]), server.services()).unwrap();

        plugin.init();

        assert_eq!(server.registered_permissions(), vec![IGNORE]);
        assert_eq!(plugin.state(), PluginState::Initialized);
    }

    #[test]
    fn empty_gear_sets_rejected_at_construction() {
        let server = InMemoryServer::with_gear_sets(["A"]);
        let result = RotatingGear::new(config(&[]), server.services());
        assert!(matches!(
            result,
            Err(PluginError::Config(crate::context::ConfigError::NoGearSets))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_gear_core_unloads_without_arming_timer() {
        let server = InMemoryServer::with_gear_sets(["A"]);
        server.connect(1, "alice");
        let mut plugin =
            RotatingGear::new(config(&["A"]), server.services_without_gear_core()).unwrap();
        plugin.init();

        let err = plugin.on_server_initialized().await.unwrap_err();

        assert!(matches!(err, PluginError::MissingDependency { .. }));
        assert!(err.to_string().contains("https://game4freak.io"));
        assert_eq!(plugin.state(), PluginState::Unloaded);
        assert!(!plugin.is_rotation_active());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(server.equipped().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unloaded_gear_core_counts_as_missing() {
        let server = InMemoryServer::with_gear_sets(["A"]);
        server.set_gear_core_loaded(false);
        let mut plugin = RotatingGear::new(config(&["A"]), server.services()).unwrap();
        plugin.init();

        assert!(plugin.on_server_initialized().await.is_err());
        assert!(matches!(
            plugin.rotate_now().await,
            Err(PluginError::Unloaded)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn server_initialized_before_init_is_rejected() {
        let server = InMemoryServer::with_gear_sets(["A"]);
        let mut plugin = RotatingGear::new(config(&["A"]), server.services()).unwrap();

        assert!(matches!(
            plugin.on_server_initialized().await,
            Err(PluginError::NotInitialized)
        ));
        assert!(!plugin.is_rotation_active());
    }

    #[tokio::test(start_paused = true)]
    async fn full_lifecycle_rotates_then_stops() {
        let server = InMemoryServer::with_gear_sets(["A", "B", "C"]);
        server.connect(1, "alice");
        let mut plugin = RotatingGear::new(config(&["A", "B", "C"]), server.services()).unwrap();
        plugin.init();
        plugin.on_server_initialized().await.unwrap();
        assert_eq!(plugin.state(), PluginState::Running);
        assert!(plugin.is_rotation_active());

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(server.equipped().len(), 2);
        assert_eq!(plugin.cursor(), 2);

        plugin.unload().await;
        assert!(plugin.context().tasks.lock().await.is_empty());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(server.equipped().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_gear_set_stays_in_pool_and_is_skipped() {
        let server = InMemoryServer::with_gear_sets(["A"]);
        server.connect(1, "alice");
        let mut plugin = RotatingGear::new(config(&["A", "Ghost"]), server.services()).unwrap();
        plugin.init();

        plugin.on_server_initialized().await.unwrap();
        assert_eq!(plugin.state(), PluginState::Running);
        assert_eq!(plugin.context().config.gear_sets, vec!["A", "Ghost"]);

        // Ticks at 1s (A) and 2s (Ghost)
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let sets: Vec<String> = server.equipped().into_iter().map(|(_, set)| set).collect();
        assert_eq!(sets, vec!["A"]);
        assert_eq!(server.messages_for(1).len(), 1);
        assert_eq!(plugin.cursor(), 0);

        plugin.unload().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unusable_interval_unloads_plugin() {
        let server = InMemoryServer::with_gear_sets(["A"]);
        let mut plugin = RotatingGear::new(config(&["A"]), server.services()).unwrap();
        // Bypasses validation in `new`
        let mut config = (*plugin.ctx.config).clone();
        config.duration_between_each_gear_rotation_seconds = 1e-12;
        plugin.ctx.config = std::sync::Arc::new(config);
        plugin.driver = RotationDriver::new(plugin.ctx.clone());
        plugin.init();

        let err = plugin.on_server_initialized().await.unwrap_err();

        assert!(matches!(
            err,
            PluginError::Config(crate::context::ConfigError::InvalidInterval { .. })
        ));
        assert_eq!(plugin.state(), PluginState::Unloaded);
        assert!(!plugin.is_rotation_active());
    }

    #[tokio::test(start_paused = true)]
    async fn rotate_now_runs_a_pass_immediately() {
        let server = InMemoryServer::with_gear_sets(["A", "B"]);
        server.connect(1, "alice");
        let mut plugin = RotatingGear::new(config(&["A", "B"]), server.services()).unwrap();
        plugin.init();
        plugin.on_server_initialized().await.unwrap();

        plugin.rotate_now().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(server.messages_for(1).len(), 1);
        assert_eq!(plugin.cursor(), 1);
    }
}
