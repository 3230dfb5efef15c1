mod background_tasks;
mod config;
mod error;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::host::HostServices;
use crate::lang::LangCatalog;

pub use background_tasks::BackgroundTasks;
pub use config::{APP_NAME, CURRENT_VERSION, RotationConfig};
pub use error::{ConfigError, PluginError};

/// Everything a rotation needs, passed explicitly to the driver and to
/// every pass. Cloning is cheap.
#[derive(Clone)]
pub struct RotationContext {
    pub config: Arc<RotationConfig>,
    pub host: HostServices,
    pub lang: Arc<LangCatalog>,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
}

impl RotationContext {
    /// Build a context around a validated configuration.
    pub fn new(
        config: RotationConfig,
        host: HostServices,
        lang: LangCatalog,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            host,
            lang: Arc::new(lang),
            tasks: Arc::new(Mutex::new(BackgroundTasks::new())),
        })
    }
}
