use oasis_avatar::AvatarSettings;
use oasis_common::{DEFAULT_NOTIFICATION_MS, WorldId};
use oasis_input::KeyBindings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors loading a session config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Session settings. Every field has a default, so an empty document is a
/// valid config.
///
/// ```yaml
/// start_world: arcade
/// fade_seconds: 0.25
/// avatar:
///   walk_speed: 6.0
///   tuning:
///     jump_duration: 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// World loaded by `Session::start`.
    pub start_world: String,
    pub avatar: AvatarSettings,
    /// On-screen time for core notifications.
    pub notification_ms: u64,
    /// Length of the cosmetic fade after a transition.
    pub fade_seconds: f32,
    /// Viewport width over height, used to turn pointer positions into rays.
    pub aspect: f32,
    pub bindings: KeyBindings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_world: WorldId::Social.name().to_string(),
            avatar: AvatarSettings::default(),
            notification_ms: DEFAULT_NOTIFICATION_MS,
            fade_seconds: 0.5,
            aspect: 16.0 / 9.0,
            bindings: KeyBindings::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if WorldId::parse(&self.start_world).is_none() {
            return Err(ConfigError::Invalid(format!(
                "start_world '{}' is not a known world",
                self.start_world
            )));
        }
        if self.avatar.tuning.jump_duration.is_nan() || self.avatar.tuning.jump_duration <= 0.0 {
            return Err(ConfigError::Invalid("jump_duration must be positive".into()));
        }
        if self.aspect.is_nan() || self.aspect <= 0.0 {
            return Err(ConfigError::Invalid("aspect must be positive".into()));
        }
        if self.avatar.walk_speed < 0.0 || self.avatar.turn_rate < 0.0 || self.fade_seconds < 0.0 {
            return Err(ConfigError::Invalid(
                "speeds and durations cannot be negative".into(),
            ));
        }
        Ok(())
    }
}
