//! Rotation configuration
//!
//! The configuration is persisted as TOML through confy. It is versioned with
//! the crate version: a stale file is migrated once on load and written back.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// confy application name, also used for the log directory
pub const APP_NAME: &str = "rotating-gear";

/// Version stamped into every saved configuration
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configs older than this are replaced wholesale instead of being upgraded
const FULL_RESET_BELOW: &str = "1.0.0";

// ─────────────────────────────────────────────────────────────────────────────
// Serde Defaults
// ─────────────────────────────────────────────────────────────────────────────

fn default_interval_secs() -> f32 {
    300.0
}

fn default_gear_sets() -> Vec<String> {
    vec![
        "GearSet1".to_string(),
        "GearSet2".to_string(),
        "GearSet3".to_string(),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// RotationConfig
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RotationConfig {
    /// Missing in files written before versioning; treated as stale
    #[serde(default)]
    pub version: String,

    #[serde(default = "default_interval_secs")]
    pub duration_between_each_gear_rotation_seconds: f32,

    #[serde(default)]
    pub equip_random_gear_set: bool,

    #[serde(default = "default_gear_sets")]
    pub gear_sets: Vec<String>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            duration_between_each_gear_rotation_seconds: default_interval_secs(),
            equip_random_gear_set: false,
            gear_sets: default_gear_sets(),
        }
    }
}

impl RotationConfig {
    /// Default per-user location of the configuration file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, "config").map_err(ConfigError::ResolvePath)
    }

    /// Load, migrate, validate and write back the configuration at `path`.
    ///
    /// A missing file is created with defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = confy::load_path(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        if config.is_stale() {
            config.migrate();
        }

        config.validate()?;
        config.save(path)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(|source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn is_stale(&self) -> bool {
        compare_versions(&self.version, CURRENT_VERSION) == Ordering::Less
    }

    /// Bring a stale configuration up to the current version.
    pub fn migrate(&mut self) {
        let previous = std::mem::take(&mut self.version);
        tracing::warn!(from = %previous, "Config changes detected! Updating...");

        if compare_versions(&previous, FULL_RESET_BELOW) == Ordering::Less {
            *self = Self::default();
        }

        tracing::warn!(
            from = %previous,
            to = CURRENT_VERSION,
            "Config update complete!"
        );
        self.version = CURRENT_VERSION.to_string();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rotation_interval()?;

        if self.gear_sets.is_empty() {
            return Err(ConfigError::NoGearSets);
        }

        if let Some(index) = self.gear_sets.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::BlankGearSet { index });
        }

        Ok(())
    }

    /// Timer period. Fails for values a timer cannot run on: non-finite,
    /// non-positive, too large for a `Duration`, or rounding down to zero.
    pub fn rotation_interval(&self) -> Result<Duration, ConfigError> {
        let seconds = self.duration_between_each_gear_rotation_seconds;
        Duration::try_from_secs_f32(seconds)
            .ok()
            .filter(|period| !period.is_zero())
            .ok_or(ConfigError::InvalidInterval { seconds })
    }
}

/// Compare dotted numeric versions, padding the shorter one with zeros.
/// Unparseable components count as zero, so an empty version is the oldest.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.trim()
            .split('.')
            .map(|part| part.parse().unwrap_or(0))
            .collect()
    };
    let (a, b) = (parse(a), parse(b));
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn version_ordering() {
        assert_eq!(compare_versions("0.9.9", "1.0.0"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(compare_versions("", "0.0.1"), Ordering::Less);
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = RotationConfig::load(&path).unwrap();

        assert_eq!(config, RotationConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn current_config_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            &format!(
                r#"
Version = "{CURRENT_VERSION}"
DurationBetweenEachGearRotationSeconds = 1.0
EquipRandomGearSet = true
GearSets = ["A", "B"]
"#
            ),
        );

        let config = RotationConfig::load(&path).unwrap();

        assert!(config.equip_random_gear_set);
        assert_eq!(config.gear_sets, vec!["A", "B"]);
        assert_eq!(config.rotation_interval().unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn pre_release_config_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
Version = "0.4.2"
DurationBetweenEachGearRotationSeconds = 12.0
GearSets = ["Old"]
"#,
        );

        let config = RotationConfig::load(&path).unwrap();

        assert_eq!(config, RotationConfig::default());
    }

    #[test]
    fn unversioned_config_is_replaced_and_stamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "GearSets = [\"Legacy\"]\n");

        let config = RotationConfig::load(&path).unwrap();
        assert_eq!(config.version, CURRENT_VERSION);
        assert_eq!(config.gear_sets, default_gear_sets());

        let reloaded: RotationConfig = confy::load_path(&path).unwrap();
        assert_eq!(reloaded.version, CURRENT_VERSION);
    }

    #[test]
    fn empty_gear_sets_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            &format!("Version = \"{CURRENT_VERSION}\"\nGearSets = []\n"),
        );

        let err = RotationConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NoGearSets));
    }

    #[test]
    fn non_positive_interval_rejected() {
        let config = RotationConfig {
            duration_between_each_gear_rotation_seconds: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval { .. })
        ));

        let config = RotationConfig {
            duration_between_each_gear_rotation_seconds: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unrepresentable_interval_rejected() {
        let config = RotationConfig {
            duration_between_each_gear_rotation_seconds: 1e30,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval { .. })
        ));
        assert!(config.rotation_interval().is_err());
    }

    #[test]
    fn sub_nanosecond_interval_rejected() {
        let config = RotationConfig {
            duration_between_each_gear_rotation_seconds: 1e-12,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn huge_interval_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            &format!(
                "Version = \"{CURRENT_VERSION}\"\nDurationBetweenEachGearRotationSeconds = 1e30\n"
            ),
        );

        let err = RotationConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval { .. }));
    }

    #[test]
    fn blank_gear_set_name_rejected() {
        let config = RotationConfig {
            gear_sets: vec!["A".into(), "  ".into()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BlankGearSet { index: 1 })
        ));
    }
}
